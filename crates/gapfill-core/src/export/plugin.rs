//! Fallback serialization for plugin question types

use crate::question::Question;
use std::collections::HashMap;

/// Serializer consulted for question types without a built-in writer
pub trait PluginSerializer: Send + Sync {
    /// Type-specific body for `qtype`, or `None` if unsupported
    fn serialize(&self, qtype: &str, question: &Question) -> Option<String>;
}

/// Body writer for one plugin question type
pub trait TypePlugin: Send + Sync {
    /// Type tag handled by this plugin
    fn type_name(&self) -> &str;

    /// Type-specific body of a question of this type
    fn write(&self, question: &Question) -> Option<String>;
}

/// Registry of type plugins, keyed by type tag
#[derive(Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Box<dyn TypePlugin>>,
}

impl PluginRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin, replacing any plugin for the same type
    pub fn register(&mut self, plugin: Box<dyn TypePlugin>) {
        self.plugins.insert(plugin.type_name().to_string(), plugin);
    }

    /// Builder-style variant of [`register`](Self::register)
    pub fn with_plugin(mut self, plugin: Box<dyn TypePlugin>) -> Self {
        self.register(plugin);
        self
    }

    /// Check if a type is handled
    pub fn has_type(&self, qtype: &str) -> bool {
        self.plugins.contains_key(qtype)
    }

    /// Sorted list of handled types
    pub fn available_types(&self) -> Vec<String> {
        let mut types: Vec<_> = self.plugins.keys().cloned().collect();
        types.sort();
        types
    }
}

impl PluginSerializer for PluginRegistry {
    fn serialize(&self, qtype: &str, question: &Question) -> Option<String> {
        self.plugins.get(qtype)?.write(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::QuestionBuilder;
    use crate::types::QuestionType;

    struct OrderingPlugin;

    impl TypePlugin for OrderingPlugin {
        fn type_name(&self) -> &str {
            "ordering"
        }

        fn write(&self, _question: &Question) -> Option<String> {
            Some("    <layouttype>VERTICAL</layouttype>\n".to_string())
        }
    }

    #[test]
    fn test_registry_dispatch() {
        let registry = PluginRegistry::new().with_plugin(Box::new(OrderingPlugin));
        let question = QuestionBuilder::new(1, QuestionType::Other("ordering".into())).build();

        assert!(registry.has_type("ordering"));
        assert_eq!(registry.available_types(), vec!["ordering"]);
        assert_eq!(
            registry.serialize("ordering", &question).as_deref(),
            Some("    <layouttype>VERTICAL</layouttype>\n")
        );
        assert!(registry.serialize("ddwtos", &question).is_none());
    }

    #[test]
    fn test_empty_registry() {
        let registry = PluginRegistry::new();
        let question = QuestionBuilder::new(1, QuestionType::Gapfill).build();
        assert!(registry.serialize("gapfill", &question).is_none());
    }
}
