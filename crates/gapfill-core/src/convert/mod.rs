//! Gap-fill to cloze conversion
//!
//! Rewrites the delimited gaps of a gap-fill question (`The [cat] sat`)
//! into embedded-answer spans (`The {:SA:=cat} sat`) and retags the question
//! as `multianswer`.

mod cloze;

pub use cloze::{rewrite_gaps, ClozeConverter, ClozeSpan};
