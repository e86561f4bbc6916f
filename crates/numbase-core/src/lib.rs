//! Numbase: numeral radix conversion for row pipelines
//!
//! Numbase recognizes human-written binary, decimal and hexadecimal numerals
//! (`0x3D`, `3Dh`, `11011b`, ...) and rewrites them in another radix with
//! unbounded precision. A row processor binds a conversion direction to an
//! input and output column so a host pipeline can apply it record by record.

mod converter;
mod direction;
mod executor;
mod meta;
mod params;
mod pattern;
mod processor;
mod properties;
mod radix;
mod registry;

pub use converter::{ConvertError, Converter, NumeralConverter, convert_numeral, make_converter};
pub use direction::{ConversionDirection, UnknownDirection};
#[cfg(feature = "parallel")]
pub use executor::ParallelExecutor;
pub use executor::{
    BatchResult, ExecuteError, ExecutionStats, Executor, RowSink, SimpleExecutor, VecSink,
    stream_rows,
};
pub use meta::{Category, ParamDesc, ParamKind, ProcessorDesc, ProcessorMeta, ProcessorTag};
pub use params::{ConfigError, StepParams};
pub use pattern::RecognitionPattern;
pub use processor::{NumericBaseConversion, NumericBaseConversionMeta, RowOutcome, RowProcessor};
pub use properties::{Row, RowExt, Value};
pub use radix::Radix;
pub use registry::Registry;
