//! Plugin entry point for Numbase.
//!
//! Hosts call [`load`] once at startup to make the numeric base conversion
//! processor available; plugin authors get the processor API re-exported.

pub use rhi_numbase_core::{
    Category, ConfigError, ConversionDirection, ConvertError, Converter, NumericBaseConversion,
    NumericBaseConversionMeta, ParamDesc, ParamKind, ProcessorDesc, ProcessorMeta, ProcessorTag,
    Registry, Row, RowExt, RowOutcome, RowProcessor, StepParams, Value,
};

/// Register every processor this plugin provides.
pub fn load(registry: &mut Registry) {
    registry.register(NumericBaseConversionMeta);
    tracing::info!(processors = registry.len(), "numbase plugin loaded");
}
