//! Text generation for QuantumChain.
//!
//! Two flows sit behind [`TextGenerator`]: a structured analysis of a job
//! submission (title, complexity, one-line summary, one-line optimization)
//! and a free-form chat with a fixed assistant persona. [`GeminiClient`]
//! implements both against the Google Generative Language API;
//! [`StaticGenerator`] answers from canned values.
//!
//! Callers are expected to degrade gracefully: [`analyse_or_skip`] drops the
//! analysis on failure and [`chat_or_apologise`] substitutes a fixed message.

pub mod error;
pub mod gemini;
pub mod generator;
pub mod prompt;

pub use error::{AiError, AiResult};
pub use gemini::GeminiClient;
pub use generator::{StaticGenerator, TextGenerator, analyse_or_skip, chat_or_apologise};
pub use prompt::CHAT_FALLBACK;
