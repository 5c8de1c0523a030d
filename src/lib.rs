//! Keyphrase handling for the Casper wallet: BIP-39 recovery phrases split
//! into Shamir shares, the multiple-choice check the user passes before a
//! wallet is created, and the small balance and signer-event helpers the
//! wallet front-end relies on.

pub mod balance;
pub mod checklist;
pub mod config;
pub mod error;
pub mod events;
pub mod logger;
pub mod quiz;
pub mod seed;
pub mod session;
pub mod shamir;

pub use config::Config;
pub use error::{KeyphraseError, Result};
pub use quiz::{AnswerSheet, Quiz, QuizItem};
pub use seed::{Keyphrase, Wordlist, to_words};
pub use session::{CreateWalletSession, CreateWalletStep};
pub use shamir::{Share, ShareScheme, ShareSet, reconstruct, split, try_reconstruct};
