//! Moodle XML export
//!
//! This module turns question records into `<question>` fragments of the
//! Moodle XML interchange format.
//!
//! # Overview
//!
//! - [`QuestionSerializer`] renders one question, delegating escaping,
//!   file lookup, plugin types and tags to [`Collaborators`]
//! - [`ExportManager`] maps formats to [`Exporter`]s; `gapfill-cloze`
//!   rewrites gap-fill questions as cloze before serializing
//!
//! # Example
//!
//! ```ignore
//! use gapfill_core::export::ExportManager;
//!
//! let manager = ExportManager::default();
//! let xml = manager.export(&question, "gapfill-cloze")?;
//! ```

mod attachments;
mod collaborators;
mod escape;
mod exporter;
mod plugin;
mod serializer;
mod tags;
mod writer;

pub use attachments::{Attachment, AttachmentSource, MemoryAttachments, NoAttachments};
pub use collaborators::Collaborators;
pub use escape::{escape_attribute, TextEscaper, XmlEscaper};
pub use exporter::{ExportManager, Exporter, GapfillClozeExporter, MoodleXmlExporter};
pub use plugin::{PluginRegistry, PluginSerializer, TypePlugin};
pub use serializer::{interpolate_subquestions, QuestionSerializer};
pub use tags::{MemoryTags, NoTags, TagSource};
pub use writer::{write_files, XmlWriter, QUESTION_COMPONENT};
