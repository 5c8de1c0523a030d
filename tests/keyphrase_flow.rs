use bc_rand::make_fake_random_number_generator;
use keyphrase::checklist::generate_checklist;
use keyphrase::quiz::{AnswerSheet, Quiz, build_quiz_item, record_answer};
use keyphrase::seed::{RECOVERY_WORD_COUNTS, Wordlist, generate_keyphrase};
use keyphrase::shamir::{ShareScheme, reconstruct, split, try_reconstruct};
use keyphrase::{Config, CreateWalletSession, CreateWalletStep, KeyphraseError, to_words};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;

const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

#[test]
fn drop_any_one_share_and_recover() {
    let mut rng = make_fake_random_number_generator();
    let shares = split(PHRASE, &ShareScheme::default(), &mut rng).expect("Failed to split");
    assert_eq!(shares.len(), 3);

    for dropped in shares.ids() {
        let mut remaining = shares.clone();
        remaining.remove(dropped);
        let recovered = reconstruct(&remaining).expect("Failed to reconstruct");
        assert_eq!(recovered.words(), to_words(PHRASE));
    }
}

#[test]
fn below_threshold_is_empty_not_garbage() {
    let mut rng = make_fake_random_number_generator();
    let shares = split(PHRASE, &ShareScheme::default(), &mut rng).unwrap();

    for id in shares.ids() {
        let single = shares.subset(&[id]);
        assert!(reconstruct(&single).unwrap().words().is_empty());
        assert!(matches!(
            try_reconstruct(&single),
            Err(KeyphraseError::InsufficientShares { needed: 2, have: 1 })
        ));
    }
}

#[test]
fn every_length_round_trips_through_shares() {
    let mut rng = make_fake_random_number_generator();
    for words in RECOVERY_WORD_COUNTS {
        let mnemonic = generate_keyphrase(words, Wordlist::English, &mut rng).unwrap();
        let phrase = mnemonic.to_string();
        let shares = split(&phrase, &ShareScheme::default(), &mut rng).unwrap();
        assert_eq!(reconstruct(&shares.subset(&[0, 2])).unwrap().as_str(), phrase);
    }
}

#[test]
fn larger_scheme_needs_its_threshold() {
    let scheme = ShareScheme {
        total_shares: 5,
        threshold: 3,
        ..ShareScheme::default()
    };
    let mut rng = make_fake_random_number_generator();
    let shares = split(PHRASE, &scheme, &mut rng).unwrap();

    assert!(reconstruct(&shares.subset(&[1, 4])).unwrap().is_empty());
    assert_eq!(reconstruct(&shares.subset(&[1, 3, 4])).unwrap().as_str(), PHRASE);
}

#[test]
fn checklists_hold_their_invariants_across_seeds() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let checklist = generate_checklist(12, 4, 3, &mut rng).unwrap();
        let distinct: HashSet<_> = checklist.checklist.iter().copied().collect();
        assert_eq!(distinct.len(), 4);
        for (index, entry) in checklist.entries() {
            assert!(index < 12);
            assert_eq!(entry.options.iter().filter(|o| **o == index).count(), 1);
        }
    }
}

#[test]
fn answers_are_judged_against_the_phrase_words() {
    let words = to_words(PHRASE);
    let mut rng = StdRng::seed_from_u64(21);
    let checklist = generate_checklist(words.len(), 4, 3, &mut rng).unwrap();
    let mut sheet = AnswerSheet::from_checklist(&checklist);

    for (group, (index, entry)) in checklist.entries().enumerate() {
        let item = build_quiz_item(index, entry, &words).unwrap();
        for option in &item.options {
            let expected = *option == words[index];
            assert_eq!(record_answer(&mut sheet, group, option, &item).unwrap(), expected);
        }
        record_answer(&mut sheet, group, words[index], &item).unwrap();
    }
    assert!(sheet.is_complete(false));
}

#[test]
fn reconstructed_phrase_feeds_the_quiz() {
    let mut rng = make_fake_random_number_generator();
    let shares = split(PHRASE, &ShareScheme::default(), &mut rng).unwrap();
    let keyphrase = reconstruct(&shares.subset(&[1, 2])).unwrap();

    let quiz = Quiz::generate(
        &keyphrase,
        &Config::default().quiz,
        &mut StdRng::seed_from_u64(4),
    )
    .unwrap();
    assert_eq!(quiz.items().len(), 4);
    assert!(!quiz.is_complete(false));
}

#[test]
fn wallet_creation_end_to_end() {
    let config = Config::default();
    let mut session = CreateWalletSession::new(&config);
    let mut rng = make_fake_random_number_generator();
    let mut quiz_rng = StdRng::seed_from_u64(77);

    let generated = session.generate_keyphrase(18, &mut rng).unwrap();
    session.next_step(&mut quiz_rng).unwrap();

    let answers: Vec<String> = session
        .quiz()
        .unwrap()
        .items()
        .iter()
        .map(|item| item.answer.word.clone())
        .collect();
    assert_eq!(answers.len(), 6);

    // A wrong pick blocks the next step until corrected.
    let wrong = if answers[0] == "zoo" { "abandon" } else { "zoo" };
    assert!(!session.select_word(0, wrong).unwrap());
    for (group, word) in answers.iter().enumerate().skip(1) {
        session.select_word(group, word).unwrap();
    }
    assert!(session.next_step(&mut quiz_rng).is_err());
    session.select_word(0, &answers[0]).unwrap();
    assert_eq!(
        session.next_step(&mut quiz_rng).unwrap(),
        CreateWalletStep::Complete
    );

    let created = session.finish().unwrap();
    assert_eq!(created.keyphrase, generated);
    let stored = created.shares.to_json().unwrap();
    let restored = keyphrase::ShareSet::from_json(&stored).unwrap();
    assert_eq!(reconstruct(&restored).unwrap(), generated);
}
