use crate::checklist::{CheckEntry, Checklist, generate_checklist};
use crate::config::QuizConfig;
use crate::error::{KeyphraseError, Result};
use crate::logger::{log_answer_recorded, log_quiz_created};
use crate::seed::Keyphrase;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub index: usize,
    pub word: String,
}

/// One multiple-choice group of the keyphrase check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub answer: Answer,
    pub options: Vec<String>,
    pub selected: Option<String>,
}

/// Resolve an entry's option indices to words, keeping the option order.
pub fn build_quiz_item(index: usize, entry: &CheckEntry, words: &[&str]) -> Result<QuizItem> {
    let word_at = |i: usize| {
        words
            .get(i)
            .map(|w| w.to_string())
            .ok_or(KeyphraseError::WordOutOfRange {
                index: i,
                total: words.len(),
            })
    };

    Ok(QuizItem {
        answer: Answer {
            index,
            word: word_at(index)?,
        },
        options: entry
            .options
            .iter()
            .map(|i| word_at(*i))
            .collect::<Result<Vec<_>>>()?,
        selected: None,
    })
}

pub fn is_correct(selected_word: &str, item: &QuizItem) -> bool {
    selected_word == item.answer.word
}

/// Store whether `selected_word` is right for the group and return it.
pub fn record_answer(
    sheet: &mut AnswerSheet,
    group_index: usize,
    selected_word: &str,
    item: &QuizItem,
) -> Result<bool> {
    let correct = is_correct(selected_word, item);
    sheet.set(group_index, correct)?;
    log_answer_recorded(group_index, correct);
    Ok(correct)
}

/// Per-group result: `None` until answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSheet(BTreeMap<usize, Option<bool>>);

impl AnswerSheet {
    pub fn new(groups: usize) -> Self {
        Self((0..groups).map(|group| (group, None)).collect())
    }

    pub fn from_checklist(checklist: &Checklist) -> Self {
        Self::new(checklist.len())
    }

    pub fn set(&mut self, group_index: usize, correct: bool) -> Result<()> {
        match self.0.get_mut(&group_index) {
            Some(slot) => {
                *slot = Some(correct);
                Ok(())
            }
            None => Err(KeyphraseError::UnknownGroup(group_index)),
        }
    }

    pub fn get(&self, group_index: usize) -> Option<bool> {
        self.0.get(&group_index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every group is answered correctly, or when `bypass` is set.
    /// An empty sheet is complete.
    pub fn is_complete(&self, bypass: bool) -> bool {
        bypass || self.0.values().all(|v| *v == Some(true))
    }
}

/// A generated keyphrase check with its answers so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    items: Vec<QuizItem>,
    sheet: AnswerSheet,
}

impl Quiz {
    pub fn generate<R: Rng + ?Sized>(
        keyphrase: &Keyphrase,
        config: &QuizConfig,
        rng: &mut R,
    ) -> Result<Self> {
        if keyphrase.is_empty() {
            return Err(KeyphraseError::NotReconstructible);
        }

        let words = keyphrase.words();
        let checklist = generate_checklist(
            words.len(),
            config.number_of_checks(words.len()),
            config.options_per_group,
            rng,
        )?;
        Self::from_checklist(&checklist, &words)
    }

    pub fn from_checklist(checklist: &Checklist, words: &[&str]) -> Result<Self> {
        let items = checklist
            .entries()
            .map(|(index, entry)| build_quiz_item(index, entry, words))
            .collect::<Result<Vec<_>>>()?;
        log_quiz_created(words.len(), items.len());

        Ok(Self {
            sheet: AnswerSheet::new(items.len()),
            items,
        })
    }

    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    pub fn answer_sheet(&self) -> &AnswerSheet {
        &self.sheet
    }

    /// Record the user's pick for a group.
    pub fn select(&mut self, group_index: usize, word: &str) -> Result<bool> {
        let item = self
            .items
            .get_mut(group_index)
            .ok_or(KeyphraseError::UnknownGroup(group_index))?;
        item.selected = Some(word.to_string());
        record_answer(&mut self.sheet, group_index, word, item)
    }

    pub fn is_complete(&self, bypass: bool) -> bool {
        self.sheet.is_complete(bypass)
    }
}
