use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use tempfile::TempDir;

use lexdrill::app::{App, AppEvent, Prompt};
use lexdrill::catalog::{Catalog, CatalogSource};
use lexdrill::config::{Config, PriorityWeights};
use lexdrill::engine::PracticeEngine;
use lexdrill::error::{EngineError, LoadError};
use lexdrill::session::drill::DrillMode;
use lexdrill::store::json_store::JsonStore;
use lexdrill::store::KeyValueStore;
use lexdrill::store::schema::STATS_KEY;

const WORDS_JSON: &str = r#"{
  "words": [
    { "id": 1, "bulgarian": "Здравей", "english": "Hello" },
    { "id": 2, "bulgarian": "здравей", "english": "hello" },
    { "id": 3, "bulgarian": "Благодаря", "english": "Thank you" },
    { "id": 4, "bulgarian": "Вода", "english": "Water" }
  ]
}"#;

const SENTENCES_JSON: &str = r#"[
  {
    "id": 10,
    "question_bg": "Аз ____ вода.",
    "translation_en": "I drink water.",
    "options": ["пия", "ям", "спя"],
    "answer": "пия"
  }
]"#;

fn write(dir: &Path, name: &str, contents: &str) -> CatalogSource {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    CatalogSource::File(path)
}

fn embedded_engine(seed: u64) -> PracticeEngine {
    PracticeEngine::seeded(Catalog::embedded().unwrap(), PriorityWeights::default(), seed)
}

#[test]
fn test_file_catalog_drops_case_insensitive_duplicates() {
    let dir = TempDir::new().unwrap();
    let words = write(dir.path(), "words.json", WORDS_JSON);
    let sentences = write(dir.path(), "sentences.json", SENTENCES_JSON);

    let catalog = Catalog::load(&words, &sentences).unwrap();
    assert_eq!(catalog.words().len(), 3);
    assert_eq!(catalog.words()[0].id, 1);
    assert_eq!(catalog.dropped_duplicates().len(), 1);
    assert_eq!(catalog.dropped_duplicates()[0].id, 2);
    assert_eq!(catalog.dropped_duplicates()[0].kept_id, 1);
    assert_eq!(catalog.sentences().len(), 1);
}

#[test]
fn test_missing_and_malformed_files_are_load_errors() {
    let dir = TempDir::new().unwrap();
    let sentences = write(dir.path(), "sentences.json", SENTENCES_JSON);

    let missing = CatalogSource::File(dir.path().join("nope.json"));
    assert!(matches!(
        Catalog::load(&missing, &sentences),
        Err(LoadError::Io { .. })
    ));

    let malformed = write(dir.path(), "words.json", "{\"words\": [");
    assert!(matches!(
        Catalog::load(&malformed, &sentences),
        Err(LoadError::Parse { .. })
    ));
}

#[test]
fn test_rotation_shows_every_embedded_word_once() {
    let mut engine = embedded_engine(21);
    let total = engine.catalog().words().len();
    engine.start_word_rotation();

    let now = Utc::now();
    let mut seen = HashSet::new();
    for i in 0..total {
        let id = engine.next_word_at(now).unwrap().id;
        assert!(seen.insert(id), "word {id} repeated within a rotation");
        engine.record_word_attempt_at(id, i % 3 != 0, now);
    }
    assert_eq!(seen.len(), total);
    assert_eq!(engine.session_stats().items_completed, total);

    // The next pick opens a fresh rotation.
    assert!(engine.next_word_at(now).is_some());
    assert_eq!(engine.session_stats().items_completed, 1);
}

#[test]
fn test_skip_counts_in_session_but_not_in_ledger() {
    let mut engine = embedded_engine(4);
    engine.start_word_rotation();
    let id = engine.next_word().unwrap().id;

    assert!(engine.skip_word(id));
    assert_eq!(engine.word_stats(id).attempts, 0);

    let stats = engine.session_stats();
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.total_attempts, 1);
    assert_eq!(stats.accuracy, 0);
}

#[test]
fn test_twenty_sentence_session() {
    let mut engine = embedded_engine(8);
    engine.start_sentence_session(20).unwrap();

    let mut ids = HashSet::new();
    for i in 0..20 {
        let p = engine.next_sentence_presentation().unwrap().unwrap();
        assert!(ids.insert(p.id));
        assert!(p.correct_index < p.options.len());
        assert!(p.blanked_sentence.contains("____"));
        assert!(!p.full_sentence.contains("____"));
        assert!(p.full_sentence.contains(&p.options[p.correct_index]));
        engine.record_sentence_result(i % 4 != 0);
    }
    assert_eq!(engine.next_sentence_presentation(), Ok(None));

    let results = engine.final_results().unwrap();
    assert_eq!(results.total_items, 20);
    assert_eq!(results.correct, 15);
    assert_eq!(results.incorrect, 5);
    assert_eq!(results.accuracy, 75);
}

#[test]
fn test_sentence_session_larger_than_catalog() {
    let mut engine = embedded_engine(8);
    let available = engine.catalog().sentences().len();
    let err = engine.start_sentence_session(available + 1).unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientItems {
            requested: available + 1,
            available
        }
    );
    assert!(engine.session().is_none());
}

#[test]
fn test_stats_survive_restart_through_json_store() {
    let dir = TempDir::new().unwrap();
    let now = Utc::now();

    {
        let mut store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut engine = embedded_engine(1);
        engine.record_word_attempt_at(3, true, now);
        engine.record_word_attempt_at(3, false, now);
        engine.persist_stats(&mut store).unwrap();
    }
    assert!(dir.path().join("word_stats.json").exists());

    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let mut engine = embedded_engine(2);
    assert_eq!(engine.restore_stats(&store), engine.catalog().words().len());
    let stats = engine.word_stats(3);
    assert_eq!(stats.attempts, 2);
    assert_eq!(stats.successes, 1);
    assert!(stats.last_shown_at.is_some());
}

#[test]
fn test_corrupt_stats_file_starts_cold() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("word_stats.json"), "{{ not json").unwrap();

    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let mut engine = embedded_engine(2);
    assert_eq!(engine.restore_stats(&store), 0);
    assert_eq!(engine.word_stats(1).attempts, 0);
}

#[test]
fn test_app_saves_after_each_word_and_advances() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let mut app = App::new(embedded_engine(5), Box::new(store), Config::default());

    let start = Instant::now();
    let Some(Prompt::Word(first)) = app.start(DrillMode::Words, start).unwrap().cloned() else {
        panic!("expected a word prompt");
    };
    assert!(app.store().get(STATS_KEY).is_none());

    assert!(app.answer_word(false, start));
    let saved = app.store().get(STATS_KEY).unwrap();
    assert!(saved.contains(&format!("\"{}\"", first.id)));

    let events = app.tick(start + Duration::from_millis(1500));
    let [AppEvent::Advanced(Prompt::Word(second))] = events.as_slice() else {
        panic!("expected the next word, got {events:?}");
    };
    assert_ne!(second.id, first.id);
}

#[test]
fn test_reveal_override_lasts_one_run() {
    let dir = TempDir::new().unwrap();

    {
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut app = App::new(embedded_engine(1), Box::new(store), Config::default());
        app.set_reveal_delay(3000);
        app.override_reveal_delay(1000);
        assert_eq!(app.reveal_delay_ms(), 1000);
    }

    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let app = App::new(embedded_engine(2), Box::new(store), Config::default());
    assert_eq!(app.reveal_delay_ms(), 3000);
}

#[test]
fn test_reveal_override_without_saved_preference_uses_config() {
    let dir = TempDir::new().unwrap();

    {
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut app = App::new(embedded_engine(1), Box::new(store), Config::default());
        app.override_reveal_delay(1000);
    }

    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let app = App::new(embedded_engine(2), Box::new(store), Config::default());
    assert_eq!(app.reveal_delay_ms(), 5000);
}
