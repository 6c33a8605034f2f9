//! Bundle of the external services the serializer calls into

use super::attachments::{AttachmentSource, NoAttachments};
use super::escape::{TextEscaper, XmlEscaper};
use super::plugin::{PluginRegistry, PluginSerializer};
use super::tags::{NoTags, TagSource};
use std::sync::Arc;

/// Read-only services shared by every question of an export run
#[derive(Clone)]
pub struct Collaborators {
    pub attachments: Arc<dyn AttachmentSource>,
    pub escaper: Arc<dyn TextEscaper>,
    pub plugins: Arc<dyn PluginSerializer>,
    pub tags: Arc<dyn TagSource>,
}

impl Collaborators {
    /// No files, no tags, no plugins, CDATA escaping
    pub fn new() -> Self {
        Self {
            attachments: Arc::new(NoAttachments),
            escaper: Arc::new(XmlEscaper),
            plugins: Arc::new(PluginRegistry::new()),
            tags: Arc::new(NoTags),
        }
    }

    /// Set the attachment source
    pub fn with_attachments(mut self, attachments: impl AttachmentSource + 'static) -> Self {
        self.attachments = Arc::new(attachments);
        self
    }

    /// Set the text escaper
    pub fn with_escaper(mut self, escaper: impl TextEscaper + 'static) -> Self {
        self.escaper = Arc::new(escaper);
        self
    }

    /// Set the plugin fallback
    pub fn with_plugins(mut self, plugins: impl PluginSerializer + 'static) -> Self {
        self.plugins = Arc::new(plugins);
        self
    }

    /// Set the tag source
    pub fn with_tags(mut self, tags: impl TagSource + 'static) -> Self {
        self.tags = Arc::new(tags);
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::new()
    }
}
