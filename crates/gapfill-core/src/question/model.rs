//! Question data model

use crate::types::{ContextId, QuestionId, QuestionType, RichText, TextFormat};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One question to export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Question identifier
    pub id: QuestionId,
    /// Context owning the question's files
    #[serde(default)]
    pub context_id: ContextId,
    /// Type tag
    pub qtype: QuestionType,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Question text
    #[serde(default)]
    pub question_text: RichText,
    /// General feedback
    #[serde(default)]
    pub general_feedback: RichText,
    /// Default mark
    #[serde(default = "default_mark")]
    pub default_mark: f64,
    /// Penalty factor for each wrong try
    #[serde(default)]
    pub penalty: f64,
    /// Hidden flag
    #[serde(default)]
    pub hidden: bool,
    /// Category path, only set on category pseudo-questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Hints shown on later tries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
    /// Type-specific options
    #[serde(default)]
    pub options: QuestionOptions,
}

fn default_mark() -> f64 {
    1.0
}

impl Question {
    /// Whether this is a category pseudo-question
    pub fn is_category(&self) -> bool {
        self.qtype == QuestionType::Category
    }
}

/// Type-specific options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QuestionOptions {
    /// Category and description questions carry no options
    #[default]
    None,
    Gapfill(GapfillOptions),
    TrueFalse(TrueFalseOptions),
    MultiChoice(MultiChoiceOptions),
    ShortAnswer(ShortAnswerOptions),
    Numerical(NumericalOptions),
    Match(MatchOptions),
    MultiAnswer(MultiAnswerOptions),
    Essay(EssayOptions),
    Calculated(CalculatedOptions),
    /// Opaque payload for plugin question types
    Plugin { data: serde_json::Value },
}

impl QuestionOptions {
    /// Short name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            QuestionOptions::None => "none",
            QuestionOptions::Gapfill(_) => "gapfill",
            QuestionOptions::TrueFalse(_) => "truefalse",
            QuestionOptions::MultiChoice(_) => "multichoice",
            QuestionOptions::ShortAnswer(_) => "shortanswer",
            QuestionOptions::Numerical(_) => "numerical",
            QuestionOptions::Match(_) => "match",
            QuestionOptions::MultiAnswer(_) => "multianswer",
            QuestionOptions::Essay(_) => "essay",
            QuestionOptions::Calculated(_) => "calculated",
            QuestionOptions::Plugin { .. } => "plugin",
        }
    }
}

/// A single answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Answer identifier, used for file lookups
    pub id: u64,
    /// Answer text
    pub answer: String,
    /// Format of the answer text
    #[serde(default)]
    pub answer_format: TextFormat,
    /// Correctness weight, 0.0 to 1.0
    pub fraction: f64,
    /// Feedback shown when this answer is chosen
    #[serde(default)]
    pub feedback: RichText,
    /// Accepted error for numeric answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
}

impl Answer {
    /// Create an answer with empty HTML feedback
    pub fn new(id: u64, answer: impl Into<String>, fraction: f64) -> Self {
        Self {
            id,
            answer: answer.into(),
            answer_format: TextFormat::Moodle,
            fraction,
            feedback: RichText::html(""),
            tolerance: None,
        }
    }

    /// Set the feedback
    pub fn with_feedback(mut self, feedback: RichText) -> Self {
        self.feedback = feedback;
        self
    }

    /// Set the tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Set the answer format
    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.answer_format = format;
        self
    }

    /// Any non-zero fraction marks the answer as right
    pub fn is_right(&self) -> bool {
        self.fraction != 0.0
    }
}

/// How gaps are presented to the test-taker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnswerDisplay {
    /// Type-in blanks
    #[default]
    Gapfill,
    DragDrop,
    Dropdown,
    Other(String),
}

impl AnswerDisplay {
    pub fn as_str(&self) -> &str {
        match self {
            AnswerDisplay::Gapfill => "gapfill",
            AnswerDisplay::DragDrop => "dragdrop",
            AnswerDisplay::Dropdown => "dropdown",
            AnswerDisplay::Other(name) => name,
        }
    }
}

impl fmt::Display for AnswerDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for AnswerDisplay {
    fn from(s: String) -> Self {
        match s.as_str() {
            "gapfill" => AnswerDisplay::Gapfill,
            "dragdrop" => AnswerDisplay::DragDrop,
            "dropdown" => AnswerDisplay::Dropdown,
            _ => AnswerDisplay::Other(s),
        }
    }
}

impl From<AnswerDisplay> for String {
    fn from(display: AnswerDisplay) -> Self {
        display.as_str().to_string()
    }
}

/// Gap-fill options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapfillOptions {
    pub answers: Vec<Answer>,
    /// Left and right gap delimiters, e.g. `[]`
    #[serde(default = "default_delimit_chars")]
    pub delimit_chars: String,
    #[serde(default)]
    pub answer_display: AnswerDisplay,
}

fn default_delimit_chars() -> String {
    "[]".to_string()
}

impl GapfillOptions {
    /// Left and right delimiter characters
    pub fn delimiters(&self) -> (Option<char>, Option<char>) {
        let mut chars = self.delimit_chars.chars();
        (chars.next(), chars.next())
    }
}

/// True/false options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrueFalseOptions {
    pub answers: Vec<Answer>,
    /// Id of the answer used for "true"
    pub true_answer: u64,
    /// Id of the answer used for "false"
    pub false_answer: u64,
}

/// Correct / partially correct / incorrect feedback
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedFeedback {
    pub correct: RichText,
    pub partially_correct: RichText,
    pub incorrect: RichText,
    pub show_num_correct: bool,
}

/// Multiple-choice options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiChoiceOptions {
    #[serde(default = "default_true")]
    pub single: bool,
    #[serde(default = "default_true")]
    pub shuffle_answers: bool,
    #[serde(default = "default_numbering")]
    pub answer_numbering: String,
    #[serde(default)]
    pub feedback: CombinedFeedback,
    pub answers: Vec<Answer>,
}

fn default_true() -> bool {
    true
}

fn default_numbering() -> String {
    "abc".to_string()
}

/// Short-answer options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortAnswerOptions {
    #[serde(default)]
    pub use_case: bool,
    pub answers: Vec<Answer>,
}

/// Measurement unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub multiplier: f64,
    pub unit: String,
}

impl Unit {
    pub fn new(unit: impl Into<String>, multiplier: f64) -> Self {
        Self {
            multiplier,
            unit: unit.into(),
        }
    }
}

/// Numerical options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericalOptions {
    pub answers: Vec<Answer>,
    pub units: Vec<Unit>,
    pub unit_grading_type: Option<i64>,
    pub unit_penalty: Option<f64>,
    pub show_units: Option<i64>,
    pub units_left: Option<i64>,
    pub instructions: Option<RichText>,
}

/// Matching sub-question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSubquestion {
    pub id: u64,
    pub question_text: RichText,
    pub answer_text: String,
}

/// Matching options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    pub shuffle_answers: bool,
    pub feedback: CombinedFeedback,
    pub subquestions: Vec<MatchSubquestion>,
}

/// Sub-question of an embedded-answer question; its position is the
/// `N` of the `{#N}` placeholder in the parent text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClozeSubquestion {
    #[serde(default)]
    pub id: u64,
    pub question_text: String,
}

/// Embedded-answer options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiAnswerOptions {
    pub questions: Vec<ClozeSubquestion>,
}

/// Essay options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EssayOptions {
    pub response_format: String,
    pub response_required: bool,
    pub response_field_lines: u32,
    pub attachments: i32,
    pub attachments_required: i32,
    pub grader_info: RichText,
    pub response_template: RichText,
}

impl Default for EssayOptions {
    fn default() -> Self {
        Self {
            response_format: "editor".to_string(),
            response_required: true,
            response_field_lines: 15,
            attachments: 0,
            attachments_required: 0,
            grader_info: RichText::html(""),
            response_template: RichText::html(""),
        }
    }
}

/// Answer of a calculated question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedAnswer {
    #[serde(flatten)]
    pub base: Answer,
    #[serde(default = "default_tolerance_type")]
    pub tolerance_type: i64,
    #[serde(default = "default_answer_format")]
    pub correct_answer_format: i64,
    #[serde(default = "default_answer_length")]
    pub correct_answer_length: i64,
}

fn default_tolerance_type() -> i64 {
    1
}

fn default_answer_format() -> i64 {
    1
}

fn default_answer_length() -> i64 {
    2
}

impl CalculatedAnswer {
    /// Wrap a formula answer with default tolerance settings
    pub fn new(answer: Answer) -> Self {
        Self {
            base: answer,
            tolerance_type: default_tolerance_type(),
            correct_answer_format: default_answer_format(),
            correct_answer_length: default_answer_length(),
        }
    }
}

/// Value of one dataset item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetItem {
    pub item_number: u32,
    pub value: f64,
}

/// Wildcard definition of a calculated question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDefinition {
    /// `private` or `shared`
    pub status: String,
    pub name: String,
    #[serde(default = "default_distribution")]
    pub distribution: String,
    pub minimum: f64,
    pub maximum: f64,
    pub decimals: u32,
    pub item_count: u32,
    #[serde(default)]
    pub number_of_items: u32,
    #[serde(default)]
    pub items: Vec<DatasetItem>,
}

fn default_distribution() -> String {
    "uniform".to_string()
}

/// Options shared by the calculated variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatedOptions {
    pub synchronize: i64,
    pub single: bool,
    pub answer_numbering: String,
    pub shuffle_answers: bool,
    pub correct_feedback: String,
    pub partially_correct_feedback: String,
    pub incorrect_feedback: String,
    pub answers: Vec<CalculatedAnswer>,
    pub unit_grading_type: Option<i64>,
    pub unit_penalty: Option<f64>,
    pub show_units: Option<i64>,
    pub units_left: Option<i64>,
    pub instructions: Option<RichText>,
    pub units: Vec<Unit>,
    pub datasets: Vec<DatasetDefinition>,
}

impl Default for CalculatedOptions {
    fn default() -> Self {
        Self {
            synchronize: 0,
            single: false,
            answer_numbering: default_numbering(),
            shuffle_answers: false,
            correct_feedback: String::new(),
            partially_correct_feedback: String::new(),
            incorrect_feedback: String::new(),
            answers: Vec::new(),
            unit_grading_type: None,
            unit_penalty: None,
            show_units: None,
            units_left: None,
            instructions: None,
            units: Vec::new(),
            datasets: Vec::new(),
        }
    }
}

/// Hint shown after a wrong try
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub id: u64,
    pub hint: RichText,
    #[serde(default)]
    pub show_num_correct: bool,
    #[serde(default)]
    pub clear_wrong: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
}

impl Hint {
    pub fn new(id: u64, hint: RichText) -> Self {
        Self {
            id,
            hint,
            show_num_correct: false,
            clear_wrong: false,
            options: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_is_right() {
        assert!(Answer::new(1, "cat", 1.0).is_right());
        assert!(Answer::new(2, "kit", 0.5).is_right());
        assert!(Answer::new(3, "neg", -0.5).is_right());
        assert!(!Answer::new(4, "dog", 0.0).is_right());
    }

    #[test]
    fn test_gapfill_delimiters() {
        let mut opts = GapfillOptions {
            answers: Vec::new(),
            delimit_chars: "[]".to_string(),
            answer_display: AnswerDisplay::Gapfill,
        };
        assert_eq!(opts.delimiters(), (Some('['), Some(']')));

        opts.delimit_chars = "#".to_string();
        assert_eq!(opts.delimiters(), (Some('#'), None));

        opts.delimit_chars.clear();
        assert_eq!(opts.delimiters(), (None, None));
    }

    #[test]
    fn test_answer_display_strings() {
        assert_eq!(AnswerDisplay::from("dragdrop".to_string()), AnswerDisplay::DragDrop);
        assert_eq!(
            AnswerDisplay::from("wordlist".to_string()),
            AnswerDisplay::Other("wordlist".to_string())
        );
        assert_eq!(AnswerDisplay::Dropdown.to_string(), "dropdown");
    }

    #[test]
    fn test_question_from_json() {
        let json = r#"{
            "id": 12,
            "context_id": 3,
            "qtype": "gapfill",
            "name": "Animals",
            "question_text": {"text": "The [cat] sat", "format": 1},
            "penalty": 0.3333333,
            "options": {
                "kind": "gapfill",
                "answers": [
                    {"id": 1, "answer": "cat", "fraction": 1.0},
                    {"id": 2, "answer": "dog", "fraction": 0.0}
                ],
                "delimit_chars": "[]",
                "answer_display": "dragdrop"
            }
        }"#;

        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.id, QuestionId(12));
        assert_eq!(question.qtype, QuestionType::Gapfill);
        assert_eq!(question.default_mark, 1.0);
        match question.options {
            QuestionOptions::Gapfill(opts) => {
                assert_eq!(opts.answers.len(), 2);
                assert_eq!(opts.answer_display, AnswerDisplay::DragDrop);
            }
            other => panic!("unexpected options: {:?}", other),
        }
    }

    #[test]
    fn test_calculated_answer_flatten() {
        let json = r#"{"id": 5, "answer": "{a}*2", "fraction": 1.0, "tolerance": 0.01}"#;
        let answer: CalculatedAnswer = serde_json::from_str(json).unwrap();
        assert_eq!(answer.base.answer, "{a}*2");
        assert_eq!(answer.base.tolerance, Some(0.01));
        assert_eq!(answer.tolerance_type, 1);
        assert_eq!(answer.correct_answer_length, 2);
    }

    #[test]
    fn test_options_default_is_none() {
        let json = r#"{"id": 1, "qtype": "description"}"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.options, QuestionOptions::None);
    }
}
