pub mod fetch;
pub mod item;

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use icu_normalizer::ComposingNormalizerBorrowed;
use log::{info, warn};
use serde::Deserialize;

use crate::error::LoadError;
use item::{ItemId, Sentence, Word};

pub const WORDS_ASSET: &str = "words.json";
pub const SENTENCES_ASSET: &str = "sentences.json";

/// Where a catalog file comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    Embedded(&'static str),
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    fn read(&self) -> Result<String, LoadError> {
        match self {
            CatalogSource::Embedded(name) => fetch::read_embedded(name),
            CatalogSource::File(path) => fetch::read_file(path),
            CatalogSource::Url(url) => fetch::fetch_url(url),
        }
    }

    fn origin(&self) -> String {
        match self {
            CatalogSource::Embedded(name) => format!("embedded:{name}"),
            CatalogSource::File(path) => path.display().to_string(),
            CatalogSource::Url(url) => url.clone(),
        }
    }
}

#[derive(Deserialize)]
struct WordsFile {
    words: Vec<Word>,
}

/// A word dropped during load because an earlier entry had the same
/// case-insensitive (bulgarian, english) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppedDuplicate {
    pub id: ItemId,
    pub kept_id: ItemId,
    pub bulgarian: String,
    pub english: String,
}

/// The in-memory item store. Static content only; stats live in the ledger.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    words: Vec<Word>,
    sentences: Vec<Sentence>,
    dropped: Vec<DroppedDuplicate>,
}

impl Catalog {
    pub fn load(words: &CatalogSource, sentences: &CatalogSource) -> Result<Self, LoadError> {
        let words_json = words.read()?;
        let sentences_json = sentences.read()?;
        Self::from_json(
            &words_json,
            &words.origin(),
            &sentences_json,
            &sentences.origin(),
        )
    }

    pub fn embedded() -> Result<Self, LoadError> {
        Self::load(
            &CatalogSource::Embedded(WORDS_ASSET),
            &CatalogSource::Embedded(SENTENCES_ASSET),
        )
    }

    pub fn from_json(
        words_json: &str,
        words_origin: &str,
        sentences_json: &str,
        sentences_origin: &str,
    ) -> Result<Self, LoadError> {
        let file: WordsFile =
            serde_json::from_str(words_json).map_err(|source| LoadError::Parse {
                origin: words_origin.to_string(),
                source,
            })?;
        let sentences: Vec<Sentence> =
            serde_json::from_str(sentences_json).map_err(|source| LoadError::Parse {
                origin: sentences_origin.to_string(),
                source,
            })?;

        let catalog = Self::from_items(file.words, sentences)?;
        info!(
            "Loaded {} words ({} duplicates dropped) and {} sentences",
            catalog.words.len(),
            catalog.dropped.len(),
            catalog.sentences.len()
        );
        Ok(catalog)
    }

    /// Build a catalog from already-parsed items, deduplicating words.
    /// Sentences are taken as-is.
    pub fn from_items(words: Vec<Word>, sentences: Vec<Sentence>) -> Result<Self, LoadError> {
        let (words, dropped) = dedup_words(words);

        let mut ids = HashSet::with_capacity(words.len());
        for word in &words {
            if !ids.insert(word.id) {
                return Err(LoadError::DuplicateId {
                    kind: "word",
                    id: word.id,
                });
            }
        }

        Ok(Self {
            words,
            sentences,
            dropped,
        })
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn word(&self, id: ItemId) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn contains_word(&self, id: ItemId) -> bool {
        self.word(id).is_some()
    }

    pub fn dropped_duplicates(&self) -> &[DroppedDuplicate] {
        &self.dropped
    }
}

/// Case-insensitive composite key. Text is NFC-normalised first so composed
/// and decomposed spellings (e.g. "й" vs "и" + breve) collide.
pub fn dedup_key(bulgarian: &str, english: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    format!(
        "{}|{}",
        nfc.normalize(bulgarian).to_lowercase(),
        nfc.normalize(english).to_lowercase()
    )
}

fn dedup_words(words: Vec<Word>) -> (Vec<Word>, Vec<DroppedDuplicate>) {
    let mut seen: HashMap<String, ItemId> = HashMap::new();
    let mut kept = Vec::with_capacity(words.len());
    let mut dropped = Vec::new();

    for word in words {
        let key = dedup_key(&word.bulgarian, &word.english);
        if let Some(&kept_id) = seen.get(&key) {
            warn!("Duplicate word removed: {} - {}", word.bulgarian, word.english);
            dropped.push(DroppedDuplicate {
                id: word.id,
                kept_id,
                bulgarian: word.bulgarian,
                english: word.english,
            });
            continue;
        }
        seen.insert(key, word.id);
        kept.push(word);
    }

    (kept, dropped)
}
