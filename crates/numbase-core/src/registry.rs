//! Registry for processors.

use crate::meta::ProcessorMeta;
use crate::params::{ConfigError, StepParams};
use crate::processor::RowProcessor;
use indexmap::IndexMap;
use std::sync::Arc;

/// Registry of available processors.
///
/// Holds processor descriptions indexed by name, in registration order, and
/// builds processors from step parameters.
#[derive(Clone, Default)]
pub struct Registry {
    processors: IndexMap<String, Arc<dyn ProcessorMeta>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor. A later registration with the same name wins.
    pub fn register(&mut self, meta: impl ProcessorMeta + 'static) {
        let name = meta.name().to_string();
        tracing::debug!(processor = %name, "registered processor");
        self.processors.insert(name, Arc::new(meta));
    }

    /// Get a processor description by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ProcessorMeta>> {
        self.processors.get(name).cloned()
    }

    /// Build the named processor from `params`.
    pub fn build(
        &self,
        name: &str,
        params: StepParams,
    ) -> Result<Box<dyn RowProcessor>, ConfigError> {
        let meta = self
            .processors
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProcessor(name.to_string()))?;
        meta.build(params)
    }

    /// Iterate over all processor descriptions.
    pub fn metas(&self) -> impl Iterator<Item = &Arc<dyn ProcessorMeta>> {
        self.processors.values()
    }

    /// Number of registered processors.
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::ConversionDirection;
    use crate::processor::NumericBaseConversionMeta;
    use crate::properties::{Row, RowExt};

    fn make_test_registry() -> Registry {
        let mut registry = Registry::new();
        registry.register(NumericBaseConversionMeta);
        registry
    }

    #[test]
    fn test_get() {
        let registry = make_test_registry();

        assert_eq!(registry.len(), 1);
        assert!(registry.get("NumericBaseConversion").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_build() {
        let registry = make_test_registry();
        let params = StepParams::new("n").processing_mode(ConversionDirection::DecimalToBinary);
        let processor = registry.build("NumericBaseConversion", params).unwrap();

        let mut row = Row::new().with("n", "6");
        processor.process_row(&mut row).unwrap();
        assert_eq!(row.text("n").as_deref(), Some("110"));
    }

    #[test]
    fn test_build_unknown_processor() {
        let registry = make_test_registry();
        let err = registry
            .build("Nope", StepParams::new("n"))
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::UnknownProcessor("Nope".into()));
    }

    #[test]
    fn test_reregister_replaces() {
        let mut registry = make_test_registry();
        registry.register(NumericBaseConversionMeta);
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }
}
