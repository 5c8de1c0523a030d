use crate::error::{KeyphraseError, Result};
use bc_rand::SecureRandomNumberGenerator;
use bip39::{Language, Mnemonic};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// Recovery phrase lengths offered when creating a wallet.
pub const RECOVERY_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// A space separated recovery phrase. The buffer is wiped on drop.
///
/// An empty keyphrase means "not reconstructible yet" and is what
/// [`crate::shamir::reconstruct`] hands back when too few shares are known.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Keyphrase(Zeroizing<String>);

impl Keyphrase {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self(Zeroizing::new(phrase.into()))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn words(&self) -> Vec<&str> {
        to_words(&self.0)
    }

    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }

    pub fn is_empty(&self) -> bool {
        self.word_count() == 0
    }

    /// Words paired with their 1-based position, as shown to the user.
    pub fn numbered_words(&self) -> Vec<(usize, &str)> {
        self.words()
            .into_iter()
            .enumerate()
            .map(|(i, w)| (i + 1, w))
            .collect()
    }
}

impl From<&Mnemonic> for Keyphrase {
    fn from(mnemonic: &Mnemonic) -> Self {
        Self::new(mnemonic.to_string())
    }
}

impl fmt::Debug for Keyphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keyphrase({} words)", self.word_count())
    }
}

/// Split a phrase into its words. Empty or blank input gives no words.
pub fn to_words(phrase: &str) -> Vec<&str> {
    phrase.split_whitespace().collect()
}

/// BIP-39 wordlist a phrase is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Wordlist {
    #[default]
    English,
    ChineseSimplified,
    ChineseTraditional,
    Czech,
    French,
    Italian,
    Japanese,
    Korean,
    Portuguese,
    Spanish,
}

impl Wordlist {
    pub fn language(self) -> Language {
        match self {
            Wordlist::English => Language::English,
            Wordlist::ChineseSimplified => Language::SimplifiedChinese,
            Wordlist::ChineseTraditional => Language::TraditionalChinese,
            Wordlist::Czech => Language::Czech,
            Wordlist::French => Language::French,
            Wordlist::Italian => Language::Italian,
            Wordlist::Japanese => Language::Japanese,
            Wordlist::Korean => Language::Korean,
            Wordlist::Portuguese => Language::Portuguese,
            Wordlist::Spanish => Language::Spanish,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Wordlist::English => "english",
            Wordlist::ChineseSimplified => "chinese-simplified",
            Wordlist::ChineseTraditional => "chinese-traditional",
            Wordlist::Czech => "czech",
            Wordlist::French => "french",
            Wordlist::Italian => "italian",
            Wordlist::Japanese => "japanese",
            Wordlist::Korean => "korean",
            Wordlist::Portuguese => "portuguese",
            Wordlist::Spanish => "spanish",
        }
    }
}

impl fmt::Display for Wordlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Wordlist {
    type Err = KeyphraseError;

    fn from_str(s: &str) -> Result<Self> {
        let wordlist = match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Wordlist::English,
            "chinese-simplified" | "zh-hans" => Wordlist::ChineseSimplified,
            "chinese-traditional" | "zh-hant" => Wordlist::ChineseTraditional,
            "czech" | "cs" => Wordlist::Czech,
            "french" | "fr" => Wordlist::French,
            "italian" | "it" => Wordlist::Italian,
            "japanese" | "ja" => Wordlist::Japanese,
            "korean" | "ko" => Wordlist::Korean,
            "portuguese" | "pt" => Wordlist::Portuguese,
            "spanish" | "es" => Wordlist::Spanish,
            other => return Err(KeyphraseError::UnsupportedLanguage(other.to_string())),
        };
        Ok(wordlist)
    }
}

pub fn check_word_count(words: usize) -> Result<()> {
    if RECOVERY_WORD_COUNTS.contains(&words) {
        Ok(())
    } else {
        Err(KeyphraseError::UnsupportedWordCount(words))
    }
}

/// Parse and checksum-validate a phrase against a wordlist.
pub fn parse_mnemonic(phrase: &str, wordlist: Wordlist) -> Result<Mnemonic> {
    Mnemonic::parse_in(wordlist.language(), phrase)
        .map_err(|e| KeyphraseError::InvalidMnemonic(e.to_string()))
}

/// Generate a new recovery phrase of `words` words from the given generator.
pub fn generate_keyphrase<R>(words: usize, wordlist: Wordlist, rng: &mut R) -> Result<Mnemonic>
where
    R: RngCore + CryptoRng,
{
    check_word_count(words)?;

    // 32 bits of entropy per 3 words
    let mut entropy = Zeroizing::new(vec![0u8; words / 3 * 4]);
    rng.fill_bytes(&mut entropy);
    Mnemonic::from_entropy_in(wordlist.language(), &entropy)
        .map_err(|e| KeyphraseError::InvalidMnemonic(e.to_string()))
}

pub fn generate_seed(words: usize) -> Result<Mnemonic> {
    let mut rng = SecureRandomNumberGenerator;
    generate_keyphrase(words, Wordlist::English, &mut rng)
}
