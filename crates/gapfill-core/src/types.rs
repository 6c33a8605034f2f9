//! Core type definitions for gapfill-core

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a question in the host question bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the context that owns a question's files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(pub u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Markup language of a rich-text field, stored as its integer code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum TextFormat {
    /// Code 0
    #[default]
    Moodle,
    /// Code 1
    Html,
    /// Code 2
    Plain,
    /// Code 3
    Wiki,
    /// Code 4
    Markdown,
    /// Any other code
    Unknown(i64),
}

impl TextFormat {
    /// Integer code of the format
    pub fn code(&self) -> i64 {
        match self {
            TextFormat::Moodle => 0,
            TextFormat::Html => 1,
            TextFormat::Plain => 2,
            TextFormat::Wiki => 3,
            TextFormat::Markdown => 4,
            TextFormat::Unknown(code) => *code,
        }
    }

    /// Name used in the `format` attribute
    pub fn xml_name(&self) -> &'static str {
        match self {
            TextFormat::Moodle => "moodle_auto_format",
            TextFormat::Html => "html",
            TextFormat::Plain => "plain_text",
            TextFormat::Wiki => "wiki_like",
            TextFormat::Markdown => "markdown",
            TextFormat::Unknown(_) => "unknown",
        }
    }

    /// Render as an XML attribute, e.g. `format="html"`
    pub fn attribute(&self) -> String {
        format!("format=\"{}\"", self.xml_name())
    }
}

impl From<i64> for TextFormat {
    fn from(code: i64) -> Self {
        match code {
            0 => TextFormat::Moodle,
            1 => TextFormat::Html,
            2 => TextFormat::Plain,
            3 => TextFormat::Wiki,
            4 => TextFormat::Markdown,
            other => TextFormat::Unknown(other),
        }
    }
}

impl From<TextFormat> for i64 {
    fn from(format: TextFormat) -> Self {
        format.code()
    }
}

/// Text paired with its format code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RichText {
    pub text: String,
    pub format: TextFormat,
}

impl RichText {
    /// Create rich text with an explicit format
    pub fn new(text: impl Into<String>, format: TextFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }

    /// Create HTML rich text
    pub fn html(text: impl Into<String>) -> Self {
        Self::new(text, TextFormat::Html)
    }

    /// Create plain-text rich text
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, TextFormat::Plain)
    }
}

/// Question type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
    Category,
    TrueFalse,
    MultiChoice,
    ShortAnswer,
    Numerical,
    Match,
    Description,
    MultiAnswer,
    Essay,
    Calculated,
    CalculatedSimple,
    CalculatedMulti,
    Gapfill,
    /// Type provided by a plugin
    Other(String),
}

impl QuestionType {
    /// Tag used in the `type` attribute
    pub fn as_str(&self) -> &str {
        match self {
            QuestionType::Category => "category",
            QuestionType::TrueFalse => "truefalse",
            QuestionType::MultiChoice => "multichoice",
            QuestionType::ShortAnswer => "shortanswer",
            QuestionType::Numerical => "numerical",
            QuestionType::Match => "match",
            QuestionType::Description => "description",
            QuestionType::MultiAnswer => "multianswer",
            QuestionType::Essay => "essay",
            QuestionType::Calculated => "calculated",
            QuestionType::CalculatedSimple => "calculatedsimple",
            QuestionType::CalculatedMulti => "calculatedmulti",
            QuestionType::Gapfill => "gapfill",
            QuestionType::Other(name) => name,
        }
    }

    /// Whether this is one of the calculated variants
    pub fn is_calculated(&self) -> bool {
        matches!(
            self,
            QuestionType::Calculated | QuestionType::CalculatedSimple | QuestionType::CalculatedMulti
        )
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "category" => QuestionType::Category,
            "truefalse" => QuestionType::TrueFalse,
            "multichoice" => QuestionType::MultiChoice,
            "shortanswer" => QuestionType::ShortAnswer,
            "numerical" => QuestionType::Numerical,
            "match" => QuestionType::Match,
            "description" => QuestionType::Description,
            "multianswer" => QuestionType::MultiAnswer,
            "essay" => QuestionType::Essay,
            "calculated" => QuestionType::Calculated,
            "calculatedsimple" => QuestionType::CalculatedSimple,
            "calculatedmulti" => QuestionType::CalculatedMulti,
            "gapfill" => QuestionType::Gapfill,
            other => QuestionType::Other(other.to_string()),
        })
    }
}

impl From<String> for QuestionType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(qtype) => qtype,
            Err(never) => match never {},
        }
    }
}

impl From<QuestionType> for String {
    fn from(qtype: QuestionType) -> Self {
        qtype.as_str().to_string()
    }
}

/// Render a decimal the way the question bank stores it: rounded to
/// seven places, shortest form, no trailing zeros
pub fn format_decimal(value: f64) -> String {
    let rounded = (value * 1e7).round() / 1e7;
    if rounded == 0.0 {
        // Avoid "-0"
        return "0".to_string();
    }
    format!("{}", rounded)
}

/// Render a flag stored as an integer column
pub fn format_flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}
