//! Moodle XML question serializer

use super::collaborators::Collaborators;
use super::writer::{XmlWriter, QUESTION_COMPONENT};
use crate::config::ExportConfig;
use crate::error::{FormatError, Result};
use crate::question::{
    CalculatedOptions, ClozeSubquestion, EssayOptions, MatchOptions, MultiChoiceOptions,
    NumericalOptions, Question, QuestionOptions, ShortAnswerOptions, TrueFalseOptions,
};
use crate::types::{format_decimal, format_flag, QuestionType};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::{debug, warn};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{#(\d+)\}").expect("valid placeholder pattern"));

/// Serializes one question into a `<question>` fragment
#[derive(Clone, Default)]
pub struct QuestionSerializer {
    config: ExportConfig,
    collaborators: Collaborators,
}

impl QuestionSerializer {
    /// Create a serializer with the default collaborators
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            collaborators: Collaborators::new(),
        }
    }

    /// Create a serializer with explicit collaborators
    pub fn with_collaborators(config: ExportConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
        }
    }

    /// Export configuration in use
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Serialize a question; an empty string means the question is dropped
    pub fn serialize(&self, question: &Question) -> String {
        match self.try_serialize(question) {
            Ok(xml) => xml,
            Err(e) => {
                warn!("Dropping question {} from export: {}", question.id, e);
                String::new()
            }
        }
    }

    /// Serialize a question, reporting why it cannot be exported
    pub fn try_serialize(&self, question: &Question) -> Result<String> {
        let writer = XmlWriter::new(&self.collaborators, question.context_id);
        let mut output = String::new();

        output.push_str(&format!("<!-- question: {}  -->\n", question.id));

        // Categories are a special case
        if question.is_category() {
            let path = writer.write_text(question.category.as_deref().unwrap_or_default(), 0);
            output.push_str("  <question type=\"category\">\n");
            output.push_str("    <category>\n");
            output.push_str(&format!("        {}\n", path));
            output.push_str("    </category>\n");
            output.push_str("  </question>\n");
            return Ok(output);
        }

        output.push_str(&self.render_header(&writer, question));
        self.render_body(&writer, question, &mut output)?;
        output.push_str(&writer.write_hints(&question.hints));
        output.push_str(&self.render_tags(&writer, question));
        output.push_str("  </question>\n");

        debug!("Serialized question {} as {}", question.id, question.qtype);
        Ok(output)
    }

    /// Generic fields shared by every real question
    fn render_header(&self, writer: &XmlWriter<'_>, question: &Question) -> String {
        let id = question.id.0;
        let mut header = String::new();

        header.push_str(&format!("  <question type=\"{}\">\n", question.qtype));
        header.push_str("    <name>\n");
        header.push_str(&writer.write_text(&question.name, 3));
        header.push_str("    </name>\n");
        header.push_str(&writer.write_rich_field(
            "questiontext",
            &question.question_text,
            Some((QUESTION_COMPONENT, "questiontext", id)),
        ));
        header.push_str(&writer.write_rich_field(
            "generalfeedback",
            &question.general_feedback,
            Some((QUESTION_COMPONENT, "generalfeedback", id)),
        ));
        if question.qtype != QuestionType::MultiAnswer {
            header.push_str(&format!(
                "    <defaultgrade>{}</defaultgrade>\n",
                format_decimal(question.default_mark)
            ));
        }
        header.push_str(&format!(
            "    <penalty>{}</penalty>\n",
            format_decimal(question.penalty)
        ));
        header.push_str(&format!("    <hidden>{}</hidden>\n", format_flag(question.hidden)));

        header
    }

    /// Type-specific part, appended to `output`
    fn render_body(&self, writer: &XmlWriter<'_>, question: &Question, output: &mut String) -> Result<()> {
        let mismatch = || FormatError::OptionsMismatch {
            qtype: question.qtype.to_string(),
        };

        match (&question.qtype, &question.options) {
            (QuestionType::Category | QuestionType::Description, _) => {}
            (QuestionType::TrueFalse, QuestionOptions::TrueFalse(opts)) => {
                output.push_str(&render_truefalse(writer, question, opts)?);
            }
            (QuestionType::MultiChoice, QuestionOptions::MultiChoice(opts)) => {
                output.push_str(&render_multichoice(writer, question, opts));
            }
            (QuestionType::ShortAnswer, QuestionOptions::ShortAnswer(opts)) => {
                output.push_str(&render_shortanswer(writer, opts));
            }
            (QuestionType::Numerical, QuestionOptions::Numerical(opts)) => {
                output.push_str(&render_numerical(writer, question, opts));
            }
            (QuestionType::Match, QuestionOptions::Match(opts)) => {
                output.push_str(&render_match(writer, question, opts));
            }
            (QuestionType::MultiAnswer, QuestionOptions::MultiAnswer(opts)) => {
                *output = interpolate_subquestions(output.as_str(), &opts.questions);
            }
            // Converted gap-fill questions keep their gap-fill options
            // and have no placeholders to fill
            (QuestionType::MultiAnswer, QuestionOptions::Gapfill(_) | QuestionOptions::None) => {}
            (QuestionType::Essay, QuestionOptions::Essay(opts)) => {
                output.push_str(&render_essay(writer, question, opts));
            }
            (qtype, QuestionOptions::Calculated(opts)) if qtype.is_calculated() => {
                output.push_str(&render_calculated(writer, question, opts));
            }
            (
                QuestionType::TrueFalse
                | QuestionType::MultiChoice
                | QuestionType::ShortAnswer
                | QuestionType::Numerical
                | QuestionType::Match
                | QuestionType::MultiAnswer
                | QuestionType::Essay
                | QuestionType::Calculated
                | QuestionType::CalculatedSimple
                | QuestionType::CalculatedMulti,
                _,
            ) => return Err(mismatch()),
            (qtype, _) => {
                // Try support by an optional plugin
                let data = self
                    .collaborators
                    .plugins
                    .serialize(qtype.as_str(), question)
                    .ok_or_else(|| FormatError::UnsupportedType(qtype.to_string()))?;
                output.push_str(&data);
            }
        }

        Ok(())
    }

    fn render_tags(&self, writer: &XmlWriter<'_>, question: &Question) -> String {
        if !self.config.use_tags {
            return String::new();
        }

        let tags = self.collaborators.tags.tags("question", question.id.0);
        if tags.is_empty() {
            return String::new();
        }

        let mut output = String::from("    <tags>\n");
        for tag in &tags {
            output.push_str(&format!("      <tag>{}</tag>\n", writer.write_text(tag, 0)));
        }
        output.push_str("    </tags>\n");
        output
    }
}

/// Replace each `{#N}` token by the text of sub-question `N` in one pass.
///
/// Tokens without a sub-question are kept; inserted text is not rescanned.
pub fn interpolate_subquestions(fragment: &str, questions: &[ClozeSubquestion]) -> String {
    PLACEHOLDER
        .replace_all(fragment, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| questions.get(index))
                .map(|subq| subq.question_text.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn render_truefalse(writer: &XmlWriter<'_>, question: &Question, opts: &TrueFalseOptions) -> Result<String> {
    let find = |answer_id: u64| {
        opts.answers
            .iter()
            .find(|a| a.id == answer_id)
            .cloned()
            .ok_or(FormatError::MissingAnswer {
                question_id: question.id.0,
                answer_id,
            })
    };

    let mut true_answer = find(opts.true_answer)?;
    true_answer.answer = "true".to_string();
    let mut false_answer = find(opts.false_answer)?;
    false_answer.answer = "false".to_string();

    let mut output = writer.write_answer(&true_answer, "");
    output.push_str(&writer.write_answer(&false_answer, ""));
    Ok(output)
}

fn render_multichoice(writer: &XmlWriter<'_>, question: &Question, opts: &MultiChoiceOptions) -> String {
    let mut output = String::new();
    output.push_str(&format!("    <single>{}</single>\n", opts.single));
    output.push_str(&format!(
        "    <shuffleanswers>{}</shuffleanswers>\n",
        opts.shuffle_answers
    ));
    output.push_str(&format!(
        "    <answernumbering>{}</answernumbering>\n",
        opts.answer_numbering
    ));
    output.push_str(&writer.write_combined_feedback(&opts.feedback, question.id));
    output.push_str(&writer.write_answers(&opts.answers));
    output
}

fn render_shortanswer(writer: &XmlWriter<'_>, opts: &ShortAnswerOptions) -> String {
    let mut output = format!("    <usecase>{}</usecase>\n", format_flag(opts.use_case));
    output.push_str(&writer.write_answers(&opts.answers));
    output
}

fn render_numerical(writer: &XmlWriter<'_>, question: &Question, opts: &NumericalOptions) -> String {
    let mut output = String::new();
    for answer in &opts.answers {
        let tolerance = format!(
            "      <tolerance>{}</tolerance>\n",
            format_decimal(answer.tolerance.unwrap_or_default())
        );
        output.push_str(&writer.write_answer(answer, &tolerance));
    }
    output.push_str(&writer.write_units(&opts.units));
    output.push_str(&writer.write_unit_settings(
        opts.unit_grading_type,
        opts.unit_penalty,
        opts.show_units,
        opts.units_left,
    ));

    // Instructions in format code 0 are not exported
    if let Some(instructions) = opts.instructions.as_ref().filter(|i| i.format.code() != 0) {
        output.push_str(&writer.write_rich_field(
            "instructions",
            instructions,
            Some(("qtype_numerical", "instruction", question.id.0)),
        ));
    }
    output
}

fn render_match(writer: &XmlWriter<'_>, question: &Question, opts: &MatchOptions) -> String {
    let mut output = format!("    <shuffleanswers>{}</shuffleanswers>\n", opts.shuffle_answers);
    output.push_str(&writer.write_combined_feedback(&opts.feedback, question.id));

    for subquestion in &opts.subquestions {
        output.push_str(&format!(
            "    <subquestion {}>\n",
            subquestion.question_text.format.attribute()
        ));
        output.push_str(&writer.write_text(&subquestion.question_text.text, 3));
        output.push_str(&writer.area_files("qtype_match", "subquestion", subquestion.id));
        output.push_str("      <answer>\n");
        output.push_str(&writer.write_text(&subquestion.answer_text, 4));
        output.push_str("      </answer>\n");
        output.push_str("    </subquestion>\n");
    }
    output
}

fn render_essay(writer: &XmlWriter<'_>, question: &Question, opts: &EssayOptions) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "    <responseformat>{}</responseformat>\n",
        opts.response_format
    ));
    output.push_str(&format!(
        "    <responserequired>{}</responserequired>\n",
        format_flag(opts.response_required)
    ));
    output.push_str(&format!(
        "    <responsefieldlines>{}</responsefieldlines>\n",
        opts.response_field_lines
    ));
    output.push_str(&format!("    <attachments>{}</attachments>\n", opts.attachments));
    output.push_str(&format!(
        "    <attachmentsrequired>{}</attachmentsrequired>\n",
        opts.attachments_required
    ));
    output.push_str(&writer.write_rich_field(
        "graderinfo",
        &opts.grader_info,
        Some(("qtype_essay", "graderinfo", question.id.0)),
    ));
    output.push_str(&writer.write_rich_field("responsetemplate", &opts.response_template, None));
    output
}

fn render_calculated(writer: &XmlWriter<'_>, question: &Question, opts: &CalculatedOptions) -> String {
    let component = format!("qtype_{}", question.qtype);
    let id = question.id.0;
    let mut output = String::new();

    output.push_str(&format!("    <synchronize>{}</synchronize>\n", opts.synchronize));
    output.push_str(&format!("    <single>{}</single>\n", format_flag(opts.single)));
    output.push_str(&format!(
        "    <answernumbering>{}</answernumbering>\n",
        opts.answer_numbering
    ));
    output.push_str(&format!(
        "    <shuffleanswers>{}</shuffleanswers>\n",
        format_flag(opts.shuffle_answers)
    ));

    let feedback = [
        ("correctfeedback", &opts.correct_feedback),
        ("partiallycorrectfeedback", &opts.partially_correct_feedback),
        ("incorrectfeedback", &opts.incorrect_feedback),
    ];
    for (field, text) in feedback {
        output.push_str(&format!("    <{}>\n", field));
        output.push_str(&writer.write_text(text, 3));
        output.push_str(&writer.area_files(&component, field, id));
        output.push_str(&format!("    </{}>\n", field));
    }

    for calculated in &opts.answers {
        let answer = &calculated.base;
        output.push_str(&format!(
            "<answer fraction=\"{}\">\n",
            format_decimal(100.0 * answer.fraction)
        ));
        output.push_str(&format!("    <text>{}</text>\n", writer.escape(&answer.answer)));
        output.push_str(&format!(
            "    <tolerance>{}</tolerance>\n",
            format_decimal(answer.tolerance.unwrap_or_default())
        ));
        output.push_str(&format!(
            "    <tolerancetype>{}</tolerancetype>\n",
            calculated.tolerance_type
        ));
        output.push_str(&format!(
            "    <correctanswerformat>{}</correctanswerformat>\n",
            calculated.correct_answer_format
        ));
        output.push_str(&format!(
            "    <correctanswerlength>{}</correctanswerlength>\n",
            calculated.correct_answer_length
        ));
        output.push_str(&format!(
            "    <feedback {}>\n",
            answer.feedback.format.attribute()
        ));
        output.push_str(&writer.write_text(&answer.feedback.text, 0));
        output.push_str(&writer.area_files(QUESTION_COMPONENT, "answerfeedback", answer.id));
        output.push_str("    </feedback>\n");
        output.push_str("</answer>\n");
    }

    output.push_str(&writer.write_unit_settings(
        opts.unit_grading_type,
        opts.unit_penalty,
        opts.show_units,
        opts.units_left,
    ));
    if let Some(instructions) = &opts.instructions {
        output.push_str(&writer.write_rich_field(
            "instructions",
            instructions,
            Some((component.as_str(), "instruction", id)),
        ));
    }
    output.push_str(&writer.write_units(&opts.units));
    output.push_str(&render_datasets(writer, question, opts));
    output
}

fn render_datasets(writer: &XmlWriter<'_>, question: &Question, opts: &CalculatedOptions) -> String {
    if opts.datasets.is_empty() {
        return String::new();
    }

    // calculatedmulti shares the calculatedsimple dataset type
    let dataset_type = if question.qtype == QuestionType::Calculated {
        "calculated"
    } else {
        "calculatedsimple"
    };

    let mut output = String::from("<dataset_definitions>\n");
    for def in &opts.datasets {
        output.push_str("<dataset_definition>\n");
        output.push_str(&format!("    <status>{}</status>\n", writer.write_text(&def.status, 0)));
        output.push_str(&format!("    <name>{}</name>\n", writer.write_text(&def.name, 0)));
        output.push_str(&format!("    <type>{}</type>\n", dataset_type));
        output.push_str(&format!(
            "    <distribution>{}</distribution>\n",
            writer.write_text(&def.distribution, 0)
        ));
        output.push_str(&format!(
            "    <minimum>{}</minimum>\n",
            writer.write_text(&format_decimal(def.minimum), 0)
        ));
        output.push_str(&format!(
            "    <maximum>{}</maximum>\n",
            writer.write_text(&format_decimal(def.maximum), 0)
        ));
        output.push_str(&format!(
            "    <decimals>{}</decimals>\n",
            writer.write_text(&def.decimals.to_string(), 0)
        ));
        output.push_str(&format!("    <itemcount>{}</itemcount>\n", def.item_count));
        if def.item_count > 0 {
            output.push_str("    <dataset_items>\n");
            for item in &def.items {
                output.push_str("        <dataset_item>\n");
                output.push_str(&format!("           <number>{}</number>\n", item.item_number));
                output.push_str(&format!(
                    "           <value>{}</value>\n",
                    format_decimal(item.value)
                ));
                output.push_str("        </dataset_item>\n");
            }
            output.push_str("    </dataset_items>\n");
            output.push_str(&format!(
                "    <number_of_items>{}</number_of_items>\n",
                def.number_of_items
            ));
        }
        output.push_str("</dataset_definition>\n");
    }
    output.push_str("</dataset_definitions>\n");
    output
}
