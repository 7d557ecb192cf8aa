use log::{info, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::catalog::item::{ItemId, Sentence};
use crate::error::EngineError;

/// What the UI needs to show one multiple-choice sentence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SentencePresentation {
    pub id: ItemId,
    pub blanked_sentence: String,
    pub translation: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub full_sentence: String,
}

impl SentencePresentation {
    pub fn build(sentence: &Sentence) -> Result<Self, EngineError> {
        let Some(correct_index) = sentence.answer_index() else {
            warn!(
                "Sentence {} has answer {:?} missing from its options",
                sentence.id, sentence.answer
            );
            return Err(EngineError::AnswerNotInOptions {
                id: sentence.id,
                answer: sentence.answer.clone(),
            });
        };

        Ok(Self {
            id: sentence.id,
            blanked_sentence: sentence.prompt_template.clone(),
            translation: sentence.translation.clone(),
            options: sentence.options.clone(),
            correct_index,
            full_sentence: sentence.filled(),
        })
    }

    pub fn is_correct(&self, chosen: usize) -> bool {
        chosen == self.correct_index
    }
}

/// A fixed, pre-shuffled batch consumed front to back exactly once.
#[derive(Clone, Debug, Default)]
pub struct SentenceBatch {
    items: Vec<Sentence>,
    cursor: usize,
}

impl SentenceBatch {
    /// Shuffle the whole catalog (Fisher-Yates via the injected rng) and
    /// keep the first `size` sentences.
    pub fn start<R: Rng + ?Sized>(
        catalog: &[Sentence],
        size: usize,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        if catalog.len() < size {
            return Err(EngineError::InsufficientItems {
                requested: size,
                available: catalog.len(),
            });
        }

        let mut shuffled = catalog.to_vec();
        shuffled.shuffle(rng);
        shuffled.truncate(size);
        info!("Started new sentence session with {} sentences", shuffled.len());

        Ok(Self {
            items: shuffled,
            cursor: 0,
        })
    }

    /// Advance and present the next sentence. `Ok(None)` once the batch is
    /// exhausted. The cursor moves past a sentence even when its
    /// presentation fails, so one bad record cannot stall the session.
    pub fn next(&mut self) -> Result<Option<SentencePresentation>, EngineError> {
        if self.is_complete() {
            return Ok(None);
        }
        let sentence = &self.items[self.cursor];
        self.cursor += 1;
        SentencePresentation::build(sentence).map(Some)
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn items(&self) -> &[Sentence] {
        &self.items
    }
}
