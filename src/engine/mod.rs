pub mod ledger;
pub mod practice;
pub mod priority;
pub mod sentence_selector;
pub mod word_scheduler;

pub use practice::PracticeEngine;
