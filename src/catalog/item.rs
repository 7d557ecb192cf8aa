use serde::{Deserialize, Serialize};

pub type ItemId = u32;

/// Marker replaced by the answer when a sentence is filled in.
pub const BLANK_MARKER: &str = "____";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: ItemId,
    pub bulgarian: String,
    pub english: String,
}

impl Word {
    /// (prompt, translation) for the current display direction.
    /// Bulgarian is shown first unless the language toggle is on.
    pub fn prompt_pair(&self, english_first: bool) -> (&str, &str) {
        if english_first {
            (&self.english, &self.bulgarian)
        } else {
            (&self.bulgarian, &self.english)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: ItemId,
    #[serde(rename = "question_bg", alias = "prompt_template")]
    pub prompt_template: String,
    #[serde(rename = "translation_en", alias = "translation")]
    pub translation: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl Sentence {
    pub fn answer_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.answer)
    }

    pub fn filled(&self) -> String {
        self.prompt_template.replace(BLANK_MARKER, &self.answer)
    }
}
