pub mod app;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod session;
pub mod store;
pub mod timer;

pub use app::{App, AppEvent, Prompt};
pub use catalog::{Catalog, CatalogSource};
pub use engine::PracticeEngine;
pub use error::{EngineError, LoadError};
