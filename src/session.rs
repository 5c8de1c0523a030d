use crate::config::Config;
use crate::error::{KeyphraseError, Result};
use crate::logger::{log_step_changed, log_step_rejected};
use crate::quiz::Quiz;
use crate::seed::{Keyphrase, generate_keyphrase};
use crate::shamir::{ShareSet, reconstruct, split_mnemonic};
use bc_rand::RandomNumberGenerator;
use rand::Rng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateWalletStep {
    RecoveryPhrase,
    ValidateKeyphrase,
    Complete,
}

impl fmt::Display for CreateWalletStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CreateWalletStep::RecoveryPhrase => "recovery-phrase",
            CreateWalletStep::ValidateKeyphrase => "validate-keyphrase",
            CreateWalletStep::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Result of a finished flow: the phrase to derive the wallet from and the
/// shares to persist.
#[derive(Debug)]
pub struct CreatedWallet {
    pub keyphrase: Keyphrase,
    pub shares: ShareSet,
}

/// Wallet creation flow. Only the share set of the new keyphrase is kept
/// between steps; the plain phrase is rebuilt whenever it is needed.
#[derive(Debug)]
pub struct CreateWalletSession<'a> {
    config: &'a Config,
    step: CreateWalletStep,
    shares: Option<ShareSet>,
    quiz: Option<Quiz>,
}

impl<'a> CreateWalletSession<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            step: CreateWalletStep::RecoveryPhrase,
            shares: None,
            quiz: None,
        }
    }

    pub fn step(&self) -> CreateWalletStep {
        self.step
    }

    pub fn shares(&self) -> Option<&ShareSet> {
        self.shares.as_ref()
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    /// Generate a fresh keyphrase and keep its shares. Replaces any earlier one.
    pub fn generate_keyphrase<R>(&mut self, words: usize, rng: &mut R) -> Result<Keyphrase>
    where
        R: RandomNumberGenerator,
    {
        self.require(CreateWalletStep::RecoveryPhrase, "generate a keyphrase")?;

        let scheme = &self.config.share_scheme;
        let mnemonic = generate_keyphrase(words, scheme.language, rng)?;
        let shares = split_mnemonic(&mnemonic, scheme, rng)?;
        self.shares = Some(shares);
        self.quiz = None;
        Ok(Keyphrase::from(&mnemonic))
    }

    /// The keyphrase rebuilt from the kept shares; empty if there are none.
    pub fn keyphrase(&self) -> Result<Keyphrase> {
        match &self.shares {
            Some(shares) => reconstruct(shares),
            None => Ok(Keyphrase::empty()),
        }
    }

    pub fn next_step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<CreateWalletStep> {
        let next = match self.step {
            CreateWalletStep::RecoveryPhrase => {
                let keyphrase = self.keyphrase()?;
                if keyphrase.is_empty() {
                    log_step_rejected(&self.step.to_string(), "next");
                    return Err(KeyphraseError::NotReconstructible);
                }
                // A new quiz every time the check is entered.
                self.quiz = Some(Quiz::generate(&keyphrase, &self.config.quiz, rng)?);
                CreateWalletStep::ValidateKeyphrase
            }
            CreateWalletStep::ValidateKeyphrase => {
                let passed = self
                    .quiz
                    .as_ref()
                    .is_some_and(|quiz| quiz.is_complete(self.config.debug_bypass));
                if !passed {
                    log_step_rejected(&self.step.to_string(), "next");
                    return Err(self.invalid("continue before the keyphrase check passes"));
                }
                self.quiz = None;
                CreateWalletStep::Complete
            }
            CreateWalletStep::Complete => {
                return Err(self.invalid("continue past the last step"));
            }
        };

        log_step_changed(&self.step.to_string(), &next.to_string());
        self.step = next;
        Ok(next)
    }

    /// Go back to the recovery phrase, dropping the quiz but keeping the shares.
    pub fn previous_step(&mut self) -> Result<CreateWalletStep> {
        self.require(CreateWalletStep::ValidateKeyphrase, "go back")?;
        self.quiz = None;
        log_step_changed(&self.step.to_string(), "recovery-phrase");
        self.step = CreateWalletStep::RecoveryPhrase;
        Ok(self.step)
    }

    pub fn select_word(&mut self, group_index: usize, word: &str) -> Result<bool> {
        self.require(CreateWalletStep::ValidateKeyphrase, "answer the keyphrase check")?;
        match self.quiz.as_mut() {
            Some(quiz) => quiz.select(group_index, word),
            None => Err(KeyphraseError::UnknownGroup(group_index)),
        }
    }

    /// Throw away everything generated so far.
    pub fn abandon(&mut self) {
        if self.step != CreateWalletStep::RecoveryPhrase {
            log_step_changed(&self.step.to_string(), "recovery-phrase");
        }
        self.shares = None;
        self.quiz = None;
        self.step = CreateWalletStep::RecoveryPhrase;
    }

    pub fn finish(&mut self) -> Result<CreatedWallet> {
        self.require(CreateWalletStep::Complete, "finish")?;
        let keyphrase = self.keyphrase()?;
        let shares = self.shares.take().ok_or(KeyphraseError::NotReconstructible)?;
        if keyphrase.is_empty() {
            return Err(KeyphraseError::NotReconstructible);
        }
        self.abandon();
        Ok(CreatedWallet { keyphrase, shares })
    }

    fn require(&self, step: CreateWalletStep, action: &'static str) -> Result<()> {
        if self.step == step {
            Ok(())
        } else {
            log_step_rejected(&self.step.to_string(), action);
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> KeyphraseError {
        KeyphraseError::InvalidStep {
            action,
            step: self.step.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_rand::make_fake_random_number_generator;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_full_flow() {
        let config = Config::default();
        let mut session = CreateWalletSession::new(&config);
        let mut rng = make_fake_random_number_generator();
        let mut quiz_rng = StdRng::seed_from_u64(9);

        let keyphrase = session.generate_keyphrase(12, &mut rng).unwrap();
        assert_eq!(keyphrase.word_count(), 12);
        assert_eq!(session.keyphrase().unwrap(), keyphrase);
        assert_eq!(session.shares().unwrap().len(), 3);

        assert_eq!(
            session.next_step(&mut quiz_rng).unwrap(),
            CreateWalletStep::ValidateKeyphrase
        );
        assert!(session.next_step(&mut quiz_rng).is_err());

        let answers: Vec<String> = session
            .quiz()
            .unwrap()
            .items()
            .iter()
            .map(|item| item.answer.word.clone())
            .collect();
        assert_eq!(answers.len(), 4);
        for (group, word) in answers.iter().enumerate() {
            assert!(session.select_word(group, word).unwrap());
        }

        assert_eq!(
            session.next_step(&mut quiz_rng).unwrap(),
            CreateWalletStep::Complete
        );
        let created = session.finish().unwrap();
        assert_eq!(created.keyphrase, keyphrase);
        assert_eq!(created.shares.len(), 3);
        assert_eq!(session.step(), CreateWalletStep::RecoveryPhrase);
        assert!(session.shares().is_none());
    }

    #[test]
    fn test_next_without_keyphrase() {
        let config = Config::default();
        let mut session = CreateWalletSession::new(&config);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            session.next_step(&mut rng).unwrap_err(),
            KeyphraseError::NotReconstructible
        );
    }

    #[test]
    fn test_debug_bypass_skips_answers() {
        let config = Config {
            debug_bypass: true,
            ..Config::default()
        };
        let mut session = CreateWalletSession::new(&config);
        let mut rng = make_fake_random_number_generator();
        session.generate_keyphrase(24, &mut rng).unwrap();

        let mut quiz_rng = StdRng::seed_from_u64(2);
        session.next_step(&mut quiz_rng).unwrap();
        assert_eq!(session.quiz().unwrap().items().len(), 8);
        assert_eq!(
            session.next_step(&mut quiz_rng).unwrap(),
            CreateWalletStep::Complete
        );
    }

    #[test]
    fn test_going_back_regenerates_quiz() {
        let config = Config::default();
        let mut session = CreateWalletSession::new(&config);
        let mut rng = make_fake_random_number_generator();
        session.generate_keyphrase(12, &mut rng).unwrap();

        let mut quiz_rng = StdRng::seed_from_u64(3);
        session.next_step(&mut quiz_rng).unwrap();
        let first = session.quiz().unwrap().items()[0].answer.word.clone();
        session.select_word(0, &first).unwrap();

        session.previous_step().unwrap();
        assert!(session.quiz().is_none());
        session.next_step(&mut quiz_rng).unwrap();
        assert_eq!(session.quiz().unwrap().answer_sheet().get(0), None);
    }

    #[test]
    fn test_abandon_clears_keyphrase() {
        let config = Config::default();
        let mut session = CreateWalletSession::new(&config);
        let mut rng = make_fake_random_number_generator();
        session.generate_keyphrase(12, &mut rng).unwrap();
        session.abandon();
        assert!(session.keyphrase().unwrap().is_empty());
        assert!(matches!(
            session.finish(),
            Err(KeyphraseError::InvalidStep { .. })
        ));
    }

    #[test]
    fn test_answers_outside_validation_are_rejected() {
        let config = Config::default();
        let mut session = CreateWalletSession::new(&config);
        assert!(matches!(
            session.select_word(0, "legal"),
            Err(KeyphraseError::InvalidStep { .. })
        ));
    }
}
