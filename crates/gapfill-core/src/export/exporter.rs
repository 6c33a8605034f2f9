//! Exporter trait and manager

use super::collaborators::Collaborators;
use super::serializer::QuestionSerializer;
use crate::config::ExportConfig;
use crate::convert::ClozeConverter;
use crate::error::{FormatError, Result};
use crate::question::Question;
use crate::types::QuestionType;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Trait for question exporters
pub trait Exporter: Send + Sync {
    /// Export one question to a fragment
    fn export(&self, question: &Question) -> Result<String>;

    /// Get the format name
    fn format_name(&self) -> &str;
}

/// Plain Moodle XML: questions are serialized as they are
pub struct MoodleXmlExporter {
    serializer: QuestionSerializer,
}

impl MoodleXmlExporter {
    pub fn new(serializer: QuestionSerializer) -> Self {
        Self { serializer }
    }
}

impl Exporter for MoodleXmlExporter {
    fn export(&self, question: &Question) -> Result<String> {
        self.serializer.try_serialize(question)
    }

    fn format_name(&self) -> &str {
        "moodle-xml"
    }
}

/// Moodle XML with gap-fill questions rewritten as cloze questions
pub struct GapfillClozeExporter {
    converter: ClozeConverter,
    serializer: QuestionSerializer,
}

impl GapfillClozeExporter {
    pub fn new(serializer: QuestionSerializer) -> Self {
        Self {
            converter: ClozeConverter::new(),
            serializer,
        }
    }
}

impl Exporter for GapfillClozeExporter {
    fn export(&self, question: &Question) -> Result<String> {
        if question.qtype == QuestionType::Gapfill && self.serializer.config().convert_gapfill {
            let converted = self.converter.convert(question.clone());
            return self.serializer.try_serialize(&converted);
        }
        self.serializer.try_serialize(question)
    }

    fn format_name(&self) -> &str {
        "gapfill-cloze"
    }
}

/// Manager for handling multiple export formats
pub struct ExportManager {
    exporters: HashMap<String, Box<dyn Exporter>>,
}

impl ExportManager {
    /// Create a manager with the default exporters and collaborators
    pub fn new(config: ExportConfig) -> Self {
        Self::with_collaborators(config, Collaborators::new())
    }

    /// Create a manager whose default exporters share `collaborators`
    pub fn with_collaborators(config: ExportConfig, collaborators: Collaborators) -> Self {
        let mut manager = Self {
            exporters: HashMap::new(),
        };

        let serializer = QuestionSerializer::with_collaborators(config, collaborators);
        manager.register(Box::new(MoodleXmlExporter::new(serializer.clone())));
        manager.register(Box::new(GapfillClozeExporter::new(serializer)));

        manager
    }

    /// Register a new exporter
    pub fn register(&mut self, exporter: Box<dyn Exporter>) {
        self.exporters
            .insert(exporter.format_name().to_string(), exporter);
    }

    /// Export one question in the specified format
    pub fn export(&self, question: &Question, format: &str) -> Result<String> {
        self.exporter(format)?.export(question)
    }

    /// Export questions in order and concatenate the fragments.
    ///
    /// Questions that cannot be exported are left out; other errors abort.
    pub fn export_all(&self, questions: &[Question], format: &str) -> Result<String> {
        let exporter = self.exporter(format)?;

        let fragments = questions
            .par_iter()
            .map(|question| match exporter.export(question) {
                Ok(xml) => Ok(xml),
                Err(e) if e.is_per_question() => {
                    warn!("Dropping question {} from export: {}", question.id, e);
                    Ok(String::new())
                }
                Err(e) => Err(e),
            })
            .collect::<Result<Vec<String>>>()?;

        debug!("Exported {} questions as {}", questions.len(), format);
        Ok(fragments.concat())
    }

    /// Get list of available format names
    pub fn available_formats(&self) -> Vec<String> {
        let mut formats: Vec<_> = self.exporters.keys().cloned().collect();
        formats.sort();
        formats
    }

    /// Check if a format is available
    pub fn has_format(&self, format: &str) -> bool {
        self.exporters.contains_key(format)
    }

    /// Get an exporter by format name
    pub fn get(&self, format: &str) -> Option<&dyn Exporter> {
        self.exporters.get(format).map(|e| e.as_ref())
    }

    fn exporter(&self, format: &str) -> Result<&dyn Exporter> {
        self.get(format)
            .ok_or_else(|| FormatError::UnknownFormat(format.to_string()))
    }
}

impl Default for ExportManager {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{Answer, AnswerDisplay, QuestionBuilder};

    struct TestExporter;

    impl Exporter for TestExporter {
        fn export(&self, question: &Question) -> Result<String> {
            Ok(format!("[{}]", question.id))
        }

        fn format_name(&self) -> &str {
            "test"
        }
    }

    struct FailingExporter;

    impl Exporter for FailingExporter {
        fn export(&self, _question: &Question) -> Result<String> {
            Err(std::io::Error::other("disk full").into())
        }

        fn format_name(&self) -> &str {
            "failing"
        }
    }

    fn gapfill(id: u64) -> Question {
        QuestionBuilder::gapfill(
            id,
            "[]",
            AnswerDisplay::Gapfill,
            vec![Answer::new(1, "cat", 1.0), Answer::new(2, "dog", 0.0)],
        )
        .name("Cat")
        .text("The [cat] sat")
        .build()
    }

    #[test]
    fn test_export_manager_creation() {
        let manager = ExportManager::default();
        assert!(manager.has_format("moodle-xml"));
        assert!(manager.has_format("gapfill-cloze"));
        assert_eq!(manager.available_formats(), vec!["gapfill-cloze", "moodle-xml"]);
    }

    #[test]
    fn test_register_exporter() {
        let mut manager = ExportManager::default();
        manager.register(Box::new(TestExporter));
        assert!(manager.has_format("test"));
        assert!(manager.get("test").is_some());
    }

    #[test]
    fn test_export_unknown_format() {
        let manager = ExportManager::default();
        let result = manager.export(&gapfill(1), "unknown");
        assert!(matches!(result, Err(FormatError::UnknownFormat(_))));
    }

    #[test]
    fn test_gapfill_cloze_converts() {
        let manager = ExportManager::default();
        let xml = manager.export(&gapfill(1), "gapfill-cloze").unwrap();
        assert!(xml.contains("<question type=\"multianswer\">"));
        assert!(xml.contains("<text>The {:SA:=cat} sat</text>"));
    }

    #[test]
    fn test_conversion_disabled() {
        let config = ExportConfig {
            convert_gapfill: false,
            ..ExportConfig::default()
        };
        let manager = ExportManager::new(config);
        let result = manager.export(&gapfill(1), "gapfill-cloze");
        assert!(matches!(result, Err(FormatError::UnsupportedType(t)) if t == "gapfill"));
    }

    #[test]
    fn test_moodle_xml_leaves_gapfill_to_plugins() {
        let manager = ExportManager::default();
        let result = manager.export(&gapfill(1), "moodle-xml");
        assert!(matches!(result, Err(FormatError::UnsupportedType(_))));
    }

    #[test]
    fn test_export_all_keeps_order() {
        let mut manager = ExportManager::default();
        manager.register(Box::new(TestExporter));
        let questions: Vec<_> = (1..=50).map(gapfill).collect();

        let expected: String = (1..=50).map(|id| format!("[{}]", id)).collect();
        assert_eq!(manager.export_all(&questions, "test").unwrap(), expected);
    }

    #[test]
    fn test_export_all_drops_bad_questions() {
        let manager = ExportManager::default();
        let questions = vec![
            gapfill(1),
            QuestionBuilder::new(2, QuestionType::Other("ordering".into())).build(),
            gapfill(3),
        ];

        let xml = manager.export_all(&questions, "gapfill-cloze").unwrap();
        assert!(xml.contains("<!-- question: 1  -->"));
        assert!(!xml.contains("<!-- question: 2  -->"));
        assert!(xml.contains("<!-- question: 3  -->"));
        assert!(xml.find("question: 1").unwrap() < xml.find("question: 3").unwrap());
    }

    #[test]
    fn test_export_all_aborts_on_other_errors() {
        let mut manager = ExportManager::default();
        manager.register(Box::new(FailingExporter));
        let result = manager.export_all(&[gapfill(1)], "failing");
        assert!(matches!(result, Err(FormatError::Io(_))));
    }
}
