use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keyphrase::balance::Balance;
use keyphrase::config::Config;
use keyphrase::logger::init_tracing;
use keyphrase::quiz::Quiz;
use keyphrase::seed::{Keyphrase, generate_keyphrase};
use keyphrase::shamir::{ShareSet, split_mnemonic, split_secure, try_reconstruct};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Read;
use tracing::info;

#[derive(Parser)]
#[command(name = "keyphrase")]
#[command(about = "Casper wallet recovery phrases: generate, split into shares, recover, check", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a recovery phrase and its shares
    Generate {
        /// Number of words (12, 15, 18, 21 or 24)
        #[arg(long, env = "RECOVERY_WORDS")]
        words: Option<usize>,
    },

    /// Split an existing recovery phrase into shares
    Split {
        /// The recovery phrase, space separated
        phrase: String,
    },

    /// Recover the phrase from a share set file
    Reconstruct {
        /// JSON share set, or - for stdin
        #[arg(long)]
        shares: String,
    },

    /// Build the keyphrase check from a share set file
    Quiz {
        /// JSON share set, or - for stdin
        #[arg(long)]
        shares: String,

        /// Seed for a reproducible quiz
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Convert a hex mote balance to CSPR
    Balance {
        /// Balance in motes, hex encoded
        hex: String,
    },

    /// Show configuration
    Config,
}

fn read_shares(source: &str) -> Result<ShareSet> {
    let mut json = String::new();
    if source == "-" {
        std::io::stdin()
            .read_to_string(&mut json)
            .context("failed to read shares from stdin")?;
    } else {
        json = std::fs::read_to_string(source)
            .with_context(|| format!("failed to read shares from {}", source))?;
    }
    Ok(ShareSet::from_json(&json)?)
}

fn print_keyphrase(keyphrase: &Keyphrase) {
    for (position, word) in keyphrase.numbered_words() {
        println!("{:>2}. {}", position, word);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config from environment
    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    match cli.command {
        Commands::Generate { words } => {
            let words = words.unwrap_or(config.default_word_count);
            let mut rng = bc_rand::SecureRandomNumberGenerator;
            let mnemonic = generate_keyphrase(words, config.share_scheme.language, &mut rng)?;
            let shares = split_mnemonic(&mnemonic, &config.share_scheme, &mut rng)?;

            print_keyphrase(&Keyphrase::from(&mnemonic));
            println!();
            println!("{}", shares.to_json()?);
        }
        Commands::Split { phrase } => {
            let shares = split_secure(&phrase, &config.share_scheme)?;
            println!("{}", shares.to_json()?);
        }
        Commands::Reconstruct { shares } => {
            let shares = read_shares(&shares)?;
            let keyphrase = try_reconstruct(&shares)?;
            info!("Recovered {} words from {} shares", keyphrase.word_count(), shares.len());
            println!("{}", keyphrase.as_str());
        }
        Commands::Quiz { shares, seed } => {
            let shares = read_shares(&shares)?;
            let keyphrase = try_reconstruct(&shares)?;
            let quiz = match seed {
                Some(seed) => Quiz::generate(&keyphrase, &config.quiz, &mut StdRng::seed_from_u64(seed))?,
                None => Quiz::generate(&keyphrase, &config.quiz, &mut rand::thread_rng())?,
            };
            println!("{}", serde_json::to_string_pretty(quiz.items())?);
        }
        Commands::Balance { hex } => {
            let balance = Balance::from_hex(&hex)?;
            println!("{} CSPR ({} motes)", balance.display_balance, balance.mote);
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
