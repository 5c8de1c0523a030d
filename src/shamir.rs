use crate::error::{KeyphraseError, Result};
use crate::logger::{log_reconstruct_error, log_shares_split};
use crate::seed::{Keyphrase, Wordlist, parse_mnemonic};
use base64::{Engine, engine::general_purpose::STANDARD as B64};
use bc_rand::{RandomNumberGenerator, SecureRandomNumberGenerator};
use bc_shamir::{recover_secret, split_secret};
use bip39::Mnemonic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, Zeroizing};

/// bc-shamir supports up to 16 shares
pub const MAX_SHARES: usize = 16;

/// Encoding version written into every share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShareVersion {
    #[default]
    #[serde(rename = "v1")]
    V1,
}

impl fmt::Display for ShareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareVersion::V1 => f.write_str("v1"),
        }
    }
}

impl FromStr for ShareVersion {
    type Err = KeyphraseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "v1" | "V1" => Ok(ShareVersion::V1),
            other => Err(KeyphraseError::UnsupportedVersion(other.to_string())),
        }
    }
}

/// How a keyphrase is split: `threshold` of `total_shares` recover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareScheme {
    pub total_shares: usize,
    pub threshold: usize,
    pub version: ShareVersion,
    pub language: Wordlist,
}

impl Default for ShareScheme {
    fn default() -> Self {
        Self {
            total_shares: 3,
            threshold: 2,
            version: ShareVersion::V1,
            language: Wordlist::English,
        }
    }
}

impl ShareScheme {
    pub fn validate(&self) -> Result<()> {
        if self.threshold == 0
            || self.threshold > self.total_shares
            || self.total_shares > MAX_SHARES
        {
            return Err(KeyphraseError::InvalidScheme {
                threshold: self.threshold,
                total: self.total_shares,
            });
        }
        Ok(())
    }
}

/// One Shamir share of the keyphrase entropy, tagged with everything needed
/// to put the phrase back together.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub version: ShareVersion,
    pub language: Wordlist,
    pub threshold: u8,
    pub index: u8,
    data: Vec<u8>,
}

impl Share {
    pub fn new(
        version: ShareVersion,
        language: Wordlist,
        threshold: u8,
        index: u8,
        data: Vec<u8>,
    ) -> Self {
        Self {
            version,
            language,
            threshold,
            index,
            data,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// base64 of the bincode form, for storage next to the account.
    pub fn encode(&self) -> Result<String> {
        let bytes = Zeroizing::new(
            bincode::serialize(self).map_err(|e| KeyphraseError::InvalidShare(e.to_string()))?,
        );
        Ok(B64.encode(bytes.as_slice()))
    }

    pub fn decode(encoded: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            B64.decode(encoded.trim())
                .map_err(|e| KeyphraseError::InvalidShare(format!("bad base64: {}", e)))?,
        );
        let share: Share = bincode::deserialize(&bytes)
            .map_err(|e| KeyphraseError::InvalidShare(e.to_string()))?;
        if share.threshold == 0 || share.data.is_empty() {
            return Err(KeyphraseError::InvalidShare(format!(
                "share {} is empty",
                share.index
            )));
        }
        Ok(share)
    }

    fn same_split(&self, other: &Share) -> bool {
        self.version == other.version
            && self.language == other.language
            && self.threshold == other.threshold
            && self.data.len() == other.data.len()
    }
}

impl Drop for Share {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("version", &self.version)
            .field("language", &self.language)
            .field("threshold", &self.threshold)
            .field("index", &self.index)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Shares keyed by their id. Iteration is always in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareSet {
    shares: BTreeMap<u8, Share>,
}

impl ShareSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a share under its own index, replacing any share with that id.
    pub fn insert(&mut self, share: Share) -> Option<Share> {
        self.shares.insert(share.index, share)
    }

    pub fn remove(&mut self, id: u8) -> Option<Share> {
        self.shares.remove(&id)
    }

    pub fn get(&self, id: u8) -> Option<&Share> {
        self.shares.get(&id)
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    pub fn ids(&self) -> Vec<u8> {
        self.shares.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Share> {
        self.shares.values()
    }

    /// Threshold recorded in the shares, if there are any.
    pub fn threshold(&self) -> Option<usize> {
        self.shares.values().next().map(|s| s.threshold as usize)
    }

    /// Keep only the listed ids.
    pub fn subset(&self, ids: &[u8]) -> ShareSet {
        ShareSet {
            shares: self
                .shares
                .iter()
                .filter(|(id, _)| ids.contains(id))
                .map(|(id, s)| (*id, s.clone()))
                .collect(),
        }
    }

    pub fn to_encoded(&self) -> Result<BTreeMap<u8, String>> {
        let mut encoded = BTreeMap::new();
        for (id, share) in &self.shares {
            encoded.insert(*id, share.encode()?);
        }
        Ok(encoded)
    }

    pub fn from_encoded(encoded: &BTreeMap<u8, String>) -> Result<Self> {
        let mut set = ShareSet::new();
        for (id, value) in encoded {
            let share = Share::decode(value)?;
            if share.index != *id {
                return Err(KeyphraseError::InvalidShare(format!(
                    "share stored under id {} has index {}",
                    id, share.index
                )));
            }
            set.insert(share);
        }
        Ok(set)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_encoded()?)
            .map_err(|e| KeyphraseError::InvalidShare(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let encoded: BTreeMap<u8, String> =
            serde_json::from_str(json).map_err(|e| KeyphraseError::InvalidShare(e.to_string()))?;
        Self::from_encoded(&encoded)
    }
}

impl FromIterator<Share> for ShareSet {
    fn from_iter<I: IntoIterator<Item = Share>>(iter: I) -> Self {
        let mut set = ShareSet::new();
        for share in iter {
            set.insert(share);
        }
        set
    }
}

/// Split a keyphrase into `scheme.total_shares` shares.
pub fn split(
    phrase: &str,
    scheme: &ShareScheme,
    rng: &mut impl RandomNumberGenerator,
) -> Result<ShareSet> {
    scheme.validate()?;
    let mnemonic = parse_mnemonic(phrase, scheme.language)?;
    split_mnemonic(&mnemonic, scheme, rng)
}

pub fn split_secure(phrase: &str, scheme: &ShareScheme) -> Result<ShareSet> {
    let mut rng = SecureRandomNumberGenerator;
    split(phrase, scheme, &mut rng)
}

pub fn split_mnemonic(
    mnemonic: &Mnemonic,
    scheme: &ShareScheme,
    rng: &mut impl RandomNumberGenerator,
) -> Result<ShareSet> {
    scheme.validate()?;
    let secret = Zeroizing::new(mnemonic.to_entropy());
    let shares = Zeroizing::new(
        split_secret(scheme.threshold, scheme.total_shares, &secret, rng)
            .map_err(|e| KeyphraseError::Split(e.to_string()))?,
    );

    let set: ShareSet = shares
        .iter()
        .enumerate()
        .map(|(index, data)| {
            Share::new(
                scheme.version,
                scheme.language,
                scheme.threshold as u8,
                index as u8,
                data.clone(),
            )
        })
        .collect();

    log_shares_split(mnemonic.word_count(), scheme.total_shares, scheme.threshold);
    Ok(set)
}

/// Recover the keyphrase from the lowest-id `threshold` shares.
pub fn try_reconstruct(set: &ShareSet) -> Result<Keyphrase> {
    let first = match set.iter().next() {
        Some(share) => share,
        None => {
            return Err(KeyphraseError::InsufficientShares { needed: 1, have: 0 });
        }
    };
    if set.iter().any(|share| !share.same_split(first)) {
        return Err(KeyphraseError::MixedShares);
    }

    let needed = first.threshold as usize;
    if set.len() < needed {
        return Err(KeyphraseError::InsufficientShares {
            needed,
            have: set.len(),
        });
    }

    let chosen: Vec<&Share> = set.iter().take(needed).collect();
    let indexes: Vec<usize> = chosen.iter().map(|s| s.index as usize).collect();
    let data = Zeroizing::new(chosen.iter().map(|s| s.data.clone()).collect::<Vec<_>>());

    let secret = Zeroizing::new(
        recover_secret(&indexes, &data[..]).map_err(|e| KeyphraseError::Reconstruct(e.to_string()))?,
    );
    let mnemonic = Mnemonic::from_entropy_in(first.language.language(), &secret)
        .map_err(|e| KeyphraseError::Reconstruct(e.to_string()))?;
    Ok(Keyphrase::from(&mnemonic))
}

/// Like [`try_reconstruct`], but too few shares give an empty keyphrase
/// instead of an error. Callers treat empty as "not yet reconstructible".
pub fn reconstruct(set: &ShareSet) -> Result<Keyphrase> {
    match try_reconstruct(set) {
        Ok(keyphrase) => Ok(keyphrase),
        Err(KeyphraseError::InsufficientShares { .. }) => Ok(Keyphrase::empty()),
        Err(e) => {
            log_reconstruct_error(set.len(), &e.to_string());
            Err(e)
        }
    }
}

/// Reconstructed keyphrase as words; empty when not reconstructible.
pub fn reconstruct_words(set: &ShareSet) -> Result<Vec<String>> {
    Ok(reconstruct(set)?
        .words()
        .into_iter()
        .map(str::to_string)
        .collect())
}
