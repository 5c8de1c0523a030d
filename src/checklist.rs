use crate::error::{KeyphraseError, Result};
use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Options shown per quiz group: the correct word and two distractors.
pub const DEFAULT_OPTIONS_PER_GROUP: usize = 3;

/// Option word indices for one checked position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckEntry {
    pub options: Vec<usize>,
}

/// Word positions to quiz, in display order, and the options for each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub checklist: Vec<usize>,
    pub data: BTreeMap<usize, CheckEntry>,
}

impl Checklist {
    pub fn len(&self) -> usize {
        self.checklist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checklist.is_empty()
    }

    /// Checked positions with their entry, in display order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &CheckEntry)> {
        self.checklist
            .iter()
            .filter_map(|index| self.data.get(index).map(|entry| (*index, entry)))
    }
}

/// Pick `number_of_checks` distinct positions out of `total_words` and give
/// each one a shuffled set of options that holds the position exactly once.
pub fn generate_checklist<R: Rng + ?Sized>(
    total_words: usize,
    number_of_checks: usize,
    options_per_group: usize,
    rng: &mut R,
) -> Result<Checklist> {
    if number_of_checks > total_words {
        return Err(KeyphraseError::InvalidChecklistSize {
            checks: number_of_checks,
            total: total_words,
        });
    }

    let distractors = options_per_group.clamp(1, total_words.max(1)) - 1;
    let checklist = sample(rng, total_words, number_of_checks).into_vec();

    let mut data = BTreeMap::new();
    for &correct in &checklist {
        // Sample from the other total_words - 1 positions, skipping `correct`.
        let mut options: Vec<usize> = sample(rng, total_words - 1, distractors)
            .into_iter()
            .map(|i| if i >= correct { i + 1 } else { i })
            .collect();
        options.push(correct);
        options.shuffle(rng);
        data.insert(correct, CheckEntry { options });
    }

    Ok(Checklist { checklist, data })
}
