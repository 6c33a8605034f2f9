//! gapfill-core - Gap-fill to cloze conversion and Moodle XML export
//!
//! This crate rewrites gap-fill questions into embedded-answer (cloze)
//! questions and serializes question records as Moodle XML fragments,
//! ready to be embedded in a `<quiz>` document assembled by the caller.

pub mod error;
pub mod types;
pub mod config;
pub mod question;
pub mod convert;
pub mod export;

pub use error::{FormatError, Result};
pub use types::*;
