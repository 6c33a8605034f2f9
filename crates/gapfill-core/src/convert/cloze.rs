//! Cloze span rewriting

use crate::question::{AnswerDisplay, GapfillOptions, Question, QuestionOptions};
use crate::types::QuestionType;
use regex::{Captures, Regex};
use std::fmt;
use tracing::{debug, warn};

/// Embedded-answer token injected in place of a gap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClozeSpan<'a> {
    /// `{:SA:=answer}`
    ShortAnswer { answer: &'a str },
    /// `{:MC:=answer~wrong1~wrong2}`; `distractors` already carries the
    /// `~` separators
    MultiChoice { answer: &'a str, distractors: &'a str },
}

impl fmt::Display for ClozeSpan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClozeSpan::ShortAnswer { answer } => write!(f, "{{:SA:={}}}", answer),
            ClozeSpan::MultiChoice {
                answer,
                distractors,
            } => write!(f, "{{:MC:={}{}}}", answer, distractors),
        }
    }
}

/// Converter from gap-fill questions to embedded-answer questions
#[derive(Debug, Default, Clone, Copy)]
pub struct ClozeConverter;

impl ClozeConverter {
    /// Create a new converter
    pub fn new() -> Self {
        Self
    }

    /// Convert a gap-fill question; other questions are returned unchanged
    pub fn convert(&self, mut question: Question) -> Question {
        if question.qtype != QuestionType::Gapfill {
            return question;
        }

        let options = match &question.options {
            QuestionOptions::Gapfill(options) => options,
            other => {
                warn!(
                    "Question {} is tagged gapfill but carries {} options; not converting",
                    question.id,
                    other.kind()
                );
                return question;
            }
        };

        question.question_text.text = rewrite_gaps(&question.question_text.text, options);
        question.qtype = QuestionType::MultiAnswer;

        debug!("Converted question {} to cloze", question.id);
        question
    }
}

/// Replace every `L answer R` gap in `text` by its cloze span.
///
/// All gaps are located against the original text in one pass, so a
/// rewritten span is never matched again by a later answer.
pub fn rewrite_gaps(text: &str, options: &GapfillOptions) -> String {
    let (left, right) = match options.delimiters() {
        (Some(left), right) => (left, right),
        (None, _) => {
            warn!("Empty gap delimiters; leaving text unchanged");
            return text.to_string();
        }
    };

    let mut distractors = String::new();
    let mut right_answers: Vec<&str> = Vec::new();
    for answer in &options.answers {
        if answer.is_right() {
            if !answer.answer.is_empty() && !right_answers.contains(&answer.answer.as_str()) {
                right_answers.push(&answer.answer);
            }
        } else {
            distractors.push('~');
            distractors.push_str(&answer.answer);
        }
    }

    if right_answers.is_empty() {
        return text.to_string();
    }

    let alternatives: Vec<String> = right_answers.iter().map(|a| regex::escape(a)).collect();
    let pattern = format!(
        "{}({}){}",
        regex::escape(&left.to_string()),
        alternatives.join("|"),
        right.map(|r| regex::escape(&r.to_string())).unwrap_or_default()
    );

    let gap = match Regex::new(&pattern) {
        Ok(gap) => gap,
        Err(e) => {
            warn!("Cannot build gap pattern: {}", e);
            return text.to_string();
        }
    };

    let short_answer = options.answer_display == AnswerDisplay::Gapfill;
    gap.replace_all(text, |caps: &Captures| {
        let answer = caps.get(1).map_or("", |m| m.as_str());
        let span = if short_answer {
            ClozeSpan::ShortAnswer { answer }
        } else {
            ClozeSpan::MultiChoice {
                answer,
                distractors: &distractors,
            }
        };
        span.to_string()
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{Answer, QuestionBuilder};
    use crate::types::QuestionId;

    fn options(delimit: &str, display: AnswerDisplay, answers: Vec<Answer>) -> GapfillOptions {
        GapfillOptions {
            answers,
            delimit_chars: delimit.to_string(),
            answer_display: display,
        }
    }

    fn cat_dog() -> Vec<Answer> {
        vec![Answer::new(1, "cat", 1.0), Answer::new(2, "dog", 0.0)]
    }

    #[test]
    fn test_span_display() {
        assert_eq!(ClozeSpan::ShortAnswer { answer: "cat" }.to_string(), "{:SA:=cat}");
        assert_eq!(
            ClozeSpan::MultiChoice {
                answer: "cat",
                distractors: "~dog~cow"
            }
            .to_string(),
            "{:MC:=cat~dog~cow}"
        );
    }

    #[test]
    fn test_multichoice_rewrite() {
        let opts = options("[]", AnswerDisplay::DragDrop, cat_dog());
        assert_eq!(rewrite_gaps("The [cat] sat", &opts), "The {:MC:=cat~dog} sat");
    }

    #[test]
    fn test_short_answer_rewrite() {
        let opts = options("[]", AnswerDisplay::Gapfill, cat_dog());
        assert_eq!(rewrite_gaps("The [cat] sat", &opts), "The {:SA:=cat} sat");
    }

    #[test]
    fn test_distractors_shared_by_every_gap() {
        let answers = vec![
            Answer::new(1, "cat", 1.0),
            Answer::new(2, "mat", 1.0),
            Answer::new(3, "dog", 0.0),
            Answer::new(4, "rug", 0.0),
        ];
        let opts = options("[]", AnswerDisplay::Dropdown, answers);
        assert_eq!(
            rewrite_gaps("The [cat] sat on the [mat]", &opts),
            "The {:MC:=cat~dog~rug} sat on the {:MC:=mat~dog~rug}"
        );
    }

    #[test]
    fn test_repeated_gap_rewritten_everywhere() {
        let opts = options("[]", AnswerDisplay::Gapfill, cat_dog());
        assert_eq!(
            rewrite_gaps("[cat] and [cat]", &opts),
            "{:SA:=cat} and {:SA:=cat}"
        );
    }

    #[test]
    fn test_unmatched_gap_left_verbatim() {
        let opts = options("[]", AnswerDisplay::Gapfill, cat_dog());
        assert_eq!(rewrite_gaps("The [cow] sat", &opts), "The [cow] sat");
    }

    #[test]
    fn test_metacharacters_in_answers() {
        let answers = vec![
            Answer::new(1, "a+b", 1.0),
            Answer::new(2, "(x)", 1.0),
            Answer::new(3, "$1", 0.0),
        ];
        let opts = options("[]", AnswerDisplay::Gapfill, answers);
        assert_eq!(
            rewrite_gaps("[a+b] equals [(x)], not [aab]", &opts),
            "{:SA:=a+b} equals {:SA:=(x)}, not [aab]"
        );
    }

    #[test]
    fn test_substring_answers_do_not_corrupt_spans() {
        let answers = vec![
            Answer::new(1, "cat", 1.0),
            Answer::new(2, "ca", 1.0),
        ];
        let opts = options("[]", AnswerDisplay::Gapfill, answers);
        assert_eq!(
            rewrite_gaps("[ca] [cat]", &opts),
            "{:SA:=ca} {:SA:=cat}"
        );
    }

    #[test]
    fn test_rewritten_span_not_rescanned() {
        let answers = vec![
            Answer::new(1, "x", 1.0),
            Answer::new(2, "{:SA:=x}", 1.0),
        ];
        let opts = options("{}", AnswerDisplay::Gapfill, answers);
        // A second answer-by-answer pass would turn this into "{:SA:={:SA:=x}}"
        assert_eq!(rewrite_gaps("{{x}}", &opts), "{{:SA:=x}}");
    }

    #[test]
    fn test_custom_delimiters() {
        let opts = options("#*", AnswerDisplay::Gapfill, cat_dog());
        assert_eq!(rewrite_gaps("The #cat* sat", &opts), "The {:SA:=cat} sat");
        assert_eq!(rewrite_gaps("The [cat] sat", &opts), "The [cat] sat");
    }

    #[test]
    fn test_missing_right_delimiter() {
        let opts = options("[", AnswerDisplay::Gapfill, cat_dog());
        assert_eq!(rewrite_gaps("The [cat] sat", &opts), "The {:SA:=cat}] sat");
    }

    #[test]
    fn test_empty_delimiters_leave_text() {
        let opts = options("", AnswerDisplay::Gapfill, cat_dog());
        assert_eq!(rewrite_gaps("The cat sat", &opts), "The cat sat");
    }

    #[test]
    fn test_no_right_answers() {
        let opts = options("[]", AnswerDisplay::Gapfill, vec![Answer::new(1, "dog", 0.0)]);
        assert_eq!(rewrite_gaps("The [dog] sat", &opts), "The [dog] sat");
    }

    #[test]
    fn test_convert_retags_and_keeps_metadata() {
        let question = QuestionBuilder::gapfill(42, "[]", AnswerDisplay::DragDrop, cat_dog())
            .text("The [cat] sat")
            .penalty(0.1)
            .default_mark(2.0)
            .build();

        let converted = ClozeConverter::new().convert(question.clone());

        assert_eq!(question.qtype, QuestionType::Gapfill);
        assert_eq!(converted.qtype, QuestionType::MultiAnswer);
        assert_eq!(converted.id, QuestionId(42));
        assert_eq!(converted.penalty, 0.1);
        assert_eq!(converted.default_mark, 2.0);
        assert_eq!(converted.options, question.options);
        assert_eq!(converted.question_text.text, "The {:MC:=cat~dog} sat");
        assert_eq!(converted.question_text.format, question.question_text.format);
    }

    #[test]
    fn test_convert_ignores_other_types() {
        let question = QuestionBuilder::new(1, QuestionType::ShortAnswer)
            .text("[cat]")
            .build();
        let converted = ClozeConverter::new().convert(question.clone());
        assert_eq!(converted, question);
    }

    #[test]
    fn test_convert_gapfill_without_gapfill_options() {
        let question = QuestionBuilder::new(1, QuestionType::Gapfill)
            .text("[cat]")
            .build();
        let converted = ClozeConverter::new().convert(question.clone());
        assert_eq!(converted.qtype, QuestionType::Gapfill);
        assert_eq!(converted.question_text.text, "[cat]");
    }
}
