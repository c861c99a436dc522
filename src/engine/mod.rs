//! Transliteration engine seam.
//!
//! Handlers only see two traits:
//! - [`Transliterator`]: converts text given a [`ConvertOptions`].
//! - [`EngineLoader`]: builds and initializes a transliterator (dictionary download).
//!
//! [`EngineHandle`] memoizes the loaded engine for the life of the process. The
//! bundled implementation is [`DictionaryEngine`], loaded by [`DictionaryLoader`].

mod dictionary;
mod handle;
pub mod kana;
mod render;

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::convert::UnknownVariant;
use crate::models::{Mode, Target};

pub use dictionary::{DictionaryLoader, ReadingDictionary};
pub use handle::EngineHandle;
pub use render::DictionaryEngine;

/// Errors raised by engine initialization or conversion.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("dictionary fetch failed: {0}")]
    Fetch(String),
    #[error("dictionary at {0} contains no entries")]
    EmptyDictionary(String),
    #[error(transparent)]
    Unsupported(#[from] UnknownVariant),
    #[error("conversion failed: {0}")]
    Conversion(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        EngineError::Fetch(e.to_string())
    }
}

/// Validated conversion options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvertOptions {
    pub to: Target,
    pub mode: Mode,
}

impl ConvertOptions {
    pub fn new(to: Target, mode: Mode) -> Self {
        Self { to, mode }
    }

    /// Validate raw option strings; unknown values are rejected the way the engine
    /// rejects any other malformed option.
    pub fn parse(to: &str, mode: &str) -> Result<Self, EngineError> {
        Ok(Self {
            to: to.parse()?,
            mode: mode.parse()?,
        })
    }
}

#[async_trait]
pub trait Transliterator: Send + Sync {
    async fn convert(&self, text: &str, options: &ConvertOptions) -> Result<String, EngineError>;
}

#[async_trait]
pub trait EngineLoader: Send + Sync {
    /// Construct and fully initialize an engine.
    async fn load(&self) -> Result<Arc<dyn Transliterator>, EngineError>;
}
