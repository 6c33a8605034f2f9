//! Question builder for fluent API

use super::model::{Answer, AnswerDisplay, GapfillOptions, Hint, Question, QuestionOptions};
use crate::types::{ContextId, QuestionId, QuestionType, RichText};

/// Builder for creating questions with fluent API
pub struct QuestionBuilder {
    question: Question,
}

impl QuestionBuilder {
    /// Create a new builder for a question of the given type
    pub fn new(id: u64, qtype: QuestionType) -> Self {
        Self {
            question: Question {
                id: QuestionId(id),
                context_id: ContextId::default(),
                qtype,
                name: String::new(),
                question_text: RichText::html(""),
                general_feedback: RichText::html(""),
                default_mark: 1.0,
                penalty: 0.3333333,
                hidden: false,
                category: None,
                hints: Vec::new(),
                options: QuestionOptions::None,
            },
        }
    }

    /// Create a builder for a gap-fill question
    pub fn gapfill(
        id: u64,
        delimit_chars: impl Into<String>,
        answer_display: AnswerDisplay,
        answers: Vec<Answer>,
    ) -> Self {
        Self::new(id, QuestionType::Gapfill).options(QuestionOptions::Gapfill(GapfillOptions {
            answers,
            delimit_chars: delimit_chars.into(),
            answer_display,
        }))
    }

    /// Create a builder for a category pseudo-question
    pub fn category(path: impl Into<String>) -> Self {
        let mut builder = Self::new(0, QuestionType::Category);
        builder.question.category = Some(path.into());
        builder
    }

    /// Set the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.question.name = name.into();
        self
    }

    /// Set the question text as HTML
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.question.question_text = RichText::html(text);
        self
    }

    /// Set the question text with an explicit format
    pub fn rich_text(mut self, text: RichText) -> Self {
        self.question.question_text = text;
        self
    }

    /// Set the general feedback
    pub fn general_feedback(mut self, feedback: RichText) -> Self {
        self.question.general_feedback = feedback;
        self
    }

    /// Set the owning context
    pub fn context(mut self, context_id: u64) -> Self {
        self.question.context_id = ContextId(context_id);
        self
    }

    /// Set the default mark
    pub fn default_mark(mut self, mark: f64) -> Self {
        self.question.default_mark = mark;
        self
    }

    /// Set the penalty
    pub fn penalty(mut self, penalty: f64) -> Self {
        self.question.penalty = penalty;
        self
    }

    /// Set the hidden flag
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.question.hidden = hidden;
        self
    }

    /// Add a hint
    pub fn hint(mut self, hint: Hint) -> Self {
        self.question.hints.push(hint);
        self
    }

    /// Set the type-specific options
    pub fn options(mut self, options: QuestionOptions) -> Self {
        self.question.options = options;
        self
    }

    /// Build the question
    pub fn build(self) -> Question {
        self.question
    }
}
