//! Shared XML building blocks: text, files, answers, feedback, hints, units

use super::attachments::Attachment;
use super::collaborators::Collaborators;
use super::escape::escape_attribute;
use crate::question::{Answer, CombinedFeedback, Hint, Unit};
use crate::types::{format_decimal, ContextId, QuestionId, RichText};
use base64::Engine;

/// Component owning the core question file areas
pub const QUESTION_COMPONENT: &str = "question";

/// XML writer bound to the context of one question
pub struct XmlWriter<'a> {
    collaborators: &'a Collaborators,
    context: ContextId,
}

impl<'a> XmlWriter<'a> {
    pub fn new(collaborators: &'a Collaborators, context: ContextId) -> Self {
        Self {
            collaborators,
            context,
        }
    }

    /// Escape text for use between tags
    pub fn escape(&self, raw: &str) -> String {
        self.collaborators.escaper.escape(raw)
    }

    /// Inline `<text>` element at `indent` levels
    pub fn write_text(&self, raw: &str, indent: usize) -> String {
        self.collaborators.escaper.write_text(raw, indent)
    }

    /// `<file>` elements for the files of one area
    pub fn area_files(&self, component: &str, area: &str, item_id: u64) -> String {
        let files = self
            .collaborators
            .attachments
            .area_files(self.context, component, area, item_id);
        write_files(&files)
    }

    /// Element holding rich text and the files of its area:
    ///
    /// ```text
    ///     <questiontext format="html">
    ///       <text>..</text>
    ///     </questiontext>
    /// ```
    pub fn write_rich_field(
        &self,
        tag: &str,
        text: &RichText,
        files: Option<(&str, &str, u64)>,
    ) -> String {
        let mut output = String::new();
        output.push_str(&format!("    <{} {}>\n", tag, text.format.attribute()));
        output.push_str(&self.write_text(&text.text, 3));
        if let Some((component, area, item_id)) = files {
            output.push_str(&self.area_files(component, area, item_id));
        }
        output.push_str(&format!("    </{}>\n", tag));
        output
    }

    /// One `<answer>` element; `extra` is inserted before the closing tag
    pub fn write_answer(&self, answer: &Answer, extra: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "    <answer fraction=\"{}\" {}>\n",
            format_decimal(answer.fraction * 100.0),
            answer.answer_format.attribute()
        ));
        output.push_str(&self.write_text(&answer.answer, 3));
        output.push_str(&self.area_files(QUESTION_COMPONENT, "answer", answer.id));
        output.push_str(&format!(
            "      <feedback {}>\n",
            answer.feedback.format.attribute()
        ));
        output.push_str(&self.write_text(&answer.feedback.text, 4));
        output.push_str(&self.area_files(QUESTION_COMPONENT, "answerfeedback", answer.id));
        output.push_str("      </feedback>\n");
        output.push_str(extra);
        output.push_str("    </answer>\n");
        output
    }

    /// All answers in input order
    pub fn write_answers(&self, answers: &[Answer]) -> String {
        answers
            .iter()
            .map(|answer| self.write_answer(answer, ""))
            .collect()
    }

    /// Correct / partially correct / incorrect feedback blocks
    pub fn write_combined_feedback(&self, feedback: &CombinedFeedback, question_id: QuestionId) -> String {
        let fields = [
            ("correctfeedback", &feedback.correct),
            ("partiallycorrectfeedback", &feedback.partially_correct),
            ("incorrectfeedback", &feedback.incorrect),
        ];

        let mut output = String::new();
        for (field, text) in fields {
            output.push_str(&self.write_rich_field(
                field,
                text,
                Some((QUESTION_COMPONENT, field, question_id.0)),
            ));
        }
        if feedback.show_num_correct {
            output.push_str("    <shownumcorrect/>\n");
        }
        output
    }

    /// All hints in input order
    pub fn write_hints(&self, hints: &[Hint]) -> String {
        hints.iter().map(|hint| self.write_hint(hint)).collect()
    }

    fn write_hint(&self, hint: &Hint) -> String {
        let mut output = String::new();
        output.push_str(&format!("    <hint {}>\n", hint.hint.format.attribute()));
        output.push_str("  ");
        output.push_str(&self.write_text(&hint.hint.text, 3));
        output.push_str(&self.area_files(QUESTION_COMPONENT, "hint", hint.id));
        if hint.show_num_correct {
            output.push_str("      <shownumcorrect/>\n");
        }
        if hint.clear_wrong {
            output.push_str("      <clearwrong/>\n");
        }
        if let Some(options) = &hint.options {
            output.push_str(&format!("      <options>{}</options>\n", self.escape(options)));
        }
        output.push_str("    </hint>\n");
        output
    }

    /// `<units>` block; empty when there are no units
    pub fn write_units(&self, units: &[Unit]) -> String {
        if units.is_empty() {
            return String::new();
        }

        let mut output = String::from("<units>\n");
        for unit in units {
            output.push_str("  <unit>\n");
            output.push_str(&format!(
                "    <multiplier>{}</multiplier>\n",
                format_decimal(unit.multiplier)
            ));
            output.push_str(&format!("    <unit_name>{}</unit_name>\n", self.escape(&unit.unit)));
            output.push_str("  </unit>\n");
        }
        output.push_str("</units>\n");
        output
    }

    /// Optional unit grading settings shared by numerical and calculated
    pub fn write_unit_settings(
        &self,
        unit_grading_type: Option<i64>,
        unit_penalty: Option<f64>,
        show_units: Option<i64>,
        units_left: Option<i64>,
    ) -> String {
        let mut output = String::new();
        if let Some(grading) = unit_grading_type {
            output.push_str(&format!("    <unitgradingtype>{}</unitgradingtype>\n", grading));
        }
        if let Some(penalty) = unit_penalty {
            output.push_str(&format!(
                "    <unitpenalty>{}</unitpenalty>\n",
                format_decimal(penalty)
            ));
        }
        if let Some(show) = show_units {
            output.push_str(&format!("    <showunits>{}</showunits>\n", show));
        }
        if let Some(left) = units_left {
            output.push_str(&format!("    <unitsleft>{}</unitsleft>\n", left));
        }
        output
    }
}

/// `<file>` elements with base64 content; directory entries are skipped
pub fn write_files(files: &[Attachment]) -> String {
    let mut output = String::new();
    for file in files.iter().filter(|f| !f.is_directory) {
        output.push_str(&format!(
            "<file name=\"{}\" path=\"{}\" encoding=\"base64\">{}</file>\n",
            escape_attribute(&file.name),
            escape_attribute(&file.path),
            base64::engine::general_purpose::STANDARD.encode(&file.content)
        ));
    }
    output
}
