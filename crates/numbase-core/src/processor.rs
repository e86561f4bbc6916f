//! The row processor binding a converter to pipeline columns.

use crate::converter::{ConvertError, Converter, NumeralConverter};
use crate::direction::ConversionDirection;
use crate::meta::{Category, ParamDesc, ProcessorDesc, ProcessorMeta, ProcessorTag};
use crate::params::{ConfigError, StepParams};
use crate::properties::{Row, RowExt, Value};

/// What happened to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// The output column received a converted numeral.
    Converted,
    /// The input field was empty or absent; nothing was attempted.
    SkippedEmpty,
    /// The input field is not a numeral in the source radix.
    SkippedNoMatch,
}

/// A processor applied to each row of a pipeline.
pub trait RowProcessor: Send + Sync {
    /// Process one row in place.
    fn process_row(&self, row: &mut Row) -> Result<RowOutcome, ConvertError>;
}

/// Converts the numerals of one column between radices.
///
/// Built once from validated [`StepParams`]; immutable afterwards, so one
/// instance may serve any number of worker threads.
#[derive(Debug, Clone)]
pub struct NumericBaseConversion {
    params: StepParams,
    converter: NumeralConverter,
    input_column: String,
    output_column: String,
}

impl NumericBaseConversion {
    /// Validate `params` and bind the converter.
    pub fn new(params: StepParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let converter = NumeralConverter::new(params.direction()?);
        let input_column = params.input_column.clone();
        let output_column = params.resolved_output_column().to_string();

        tracing::debug!(
            input = %input_column,
            output = %output_column,
            direction = converter.direction().id(),
            "numeric base conversion ready"
        );

        Ok(Self {
            params,
            converter,
            input_column,
            output_column,
        })
    }

    pub fn params(&self) -> &StepParams {
        &self.params
    }

    pub fn direction(&self) -> ConversionDirection {
        self.converter.direction()
    }

    pub fn input_column(&self) -> &str {
        &self.input_column
    }

    pub fn output_column(&self) -> &str {
        &self.output_column
    }

    /// Convert a single field value.
    ///
    /// Returns `None` when the value is empty or absent (nothing to do) and
    /// when it is not a numeral in the source radix (nothing to write).
    pub fn convert_field(&self, value: Option<&str>) -> Result<Option<String>, ConvertError> {
        match value {
            None | Some("") => Ok(None),
            Some(_) => {
                let output = self.converter.convert(value)?;
                Ok((!output.is_empty()).then_some(output))
            }
        }
    }
}

impl RowProcessor for NumericBaseConversion {
    fn process_row(&self, row: &mut Row) -> Result<RowOutcome, ConvertError> {
        let output = {
            let Some(input) = row.text(&self.input_column).filter(|s| !s.is_empty()) else {
                return Ok(RowOutcome::SkippedEmpty);
            };
            let output = self.converter.convert(Some(&*input))?;
            if output.is_empty() {
                tracing::debug!(column = %self.input_column, value = %input, "not a numeral, skipping");
                return Ok(RowOutcome::SkippedNoMatch);
            }
            output
        };

        row.insert(self.output_column.clone(), Value::String(output));
        Ok(RowOutcome::Converted)
    }
}

const HELP: &str = "This processor performs base conversion.\n \n\
# Input column\n\
Contains the numbers to be converted\n \n\
# Conversion\n\
Select the conversion mode to / from:\n\
* Decimal\n\
* Binary\n\
* Hexadecimal\n \n\
# Output column\n\
Contains converted numbers";

const TAGS: &[ProcessorTag] = &[ProcessorTag::Reshaping, ProcessorTag::Math];

/// Description and factory for [`NumericBaseConversion`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericBaseConversionMeta;

impl ProcessorMeta for NumericBaseConversionMeta {
    fn name(&self) -> &str {
        "NumericBaseConversion"
    }

    fn doc_page(&self) -> &str {
        "numeric-base-conversion"
    }

    fn category(&self) -> Category {
        Category::Transformation
    }

    fn tags(&self) -> &[ProcessorTag] {
        TAGS
    }

    fn help(&self) -> &str {
        HELP
    }

    fn describe(&self) -> ProcessorDesc {
        let choices = ConversionDirection::ALL.map(|d| (d.id(), d.label()));
        ProcessorDesc::new(self.name(), "Convert binary hexa to from decimal")
            .param(ParamDesc::column("inputColumn", "Input column"))
            .param(
                ParamDesc::select("processingMode", "Conversion", choices)
                    .with_default_value(ConversionDirection::default().id()),
            )
            .param(ParamDesc::column("outputColumn", "Output column"))
    }

    fn summarize(&self, params: &StepParams) -> Option<String> {
        let output = params.output_column.as_deref().unwrap_or_default();
        if params.input_column.is_empty() || output.is_empty() {
            return None;
        }
        let direction = params.processing_mode?;
        Some(format!(
            "Convert data in column {} from {}",
            params.input_column,
            direction.summary()
        ))
    }

    fn build(&self, params: StepParams) -> Result<Box<dyn RowProcessor>, ConfigError> {
        Ok(Box::new(NumericBaseConversion::new(params)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::ParamKind;

    fn processor(direction: ConversionDirection) -> NumericBaseConversion {
        let params = StepParams::new("in")
            .output_column("out")
            .processing_mode(direction);
        NumericBaseConversion::new(params).unwrap()
    }

    #[test]
    fn test_converts_into_output_column() {
        let p = processor(ConversionDirection::HexadecimalToDecimal);
        let mut row = Row::new().with("in", "0x3D");

        assert_eq!(p.process_row(&mut row).unwrap(), RowOutcome::Converted);
        assert_eq!(row.text("out").as_deref(), Some("61"));
        assert_eq!(row.text("in").as_deref(), Some("0x3D"));
    }

    #[test]
    fn test_empty_and_absent_pass_through() {
        let p = processor(ConversionDirection::BinaryToDecimal);

        let mut empty = Row::new().with("in", "");
        assert_eq!(p.process_row(&mut empty).unwrap(), RowOutcome::SkippedEmpty);
        assert_eq!(empty, Row::new().with("in", ""));

        let mut null = Row::new().with("in", Value::Null);
        assert_eq!(p.process_row(&mut null).unwrap(), RowOutcome::SkippedEmpty);
        assert!(!null.contains_key("out"));

        let mut missing = Row::new().with("other", "101");
        assert_eq!(p.process_row(&mut missing).unwrap(), RowOutcome::SkippedEmpty);
        assert_eq!(missing, Row::new().with("other", "101"));
    }

    #[test]
    fn test_no_match_leaves_output_untouched() {
        let p = processor(ConversionDirection::DecimalToHexadecimal);
        let mut row = Row::new().with("in", "10.1").with("out", "previous");

        assert_eq!(p.process_row(&mut row).unwrap(), RowOutcome::SkippedNoMatch);
        assert_eq!(row.text("out").as_deref(), Some("previous"));
    }

    #[test]
    fn test_numeric_field_is_read_as_text() {
        let p = processor(ConversionDirection::DecimalToBinary);
        let mut row = Row::new().with("in", 5i64);

        assert_eq!(p.process_row(&mut row).unwrap(), RowOutcome::Converted);
        assert_eq!(row.text("out").as_deref(), Some("101"));
    }

    #[test]
    fn test_json_number_beyond_u64() {
        let p = processor(ConversionDirection::DecimalToHexadecimal);
        let mut row: Row =
            serde_json::from_str(r#"{"in": 18446744073709551616, "keep": 9007199254740993}"#)
                .unwrap();

        assert_eq!(p.process_row(&mut row).unwrap(), RowOutcome::Converted);
        assert_eq!(
            row.text("out").as_deref(),
            Some("10000000000000000")
        );
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"in":18446744073709551616,"keep":9007199254740993,"out":"10000000000000000"}"#
        );
    }

    #[test]
    fn test_json_float_is_not_decimal() {
        let p = processor(ConversionDirection::DecimalToHexadecimal);

        for input in [r#"{"in": 10.0}"#, r#"{"in": 10.5}"#, r#"{"in": 1e3}"#] {
            let mut row: Row = serde_json::from_str(input).unwrap();
            assert_eq!(p.process_row(&mut row).unwrap(), RowOutcome::SkippedNoMatch);
            assert!(!row.contains_key("out"));
        }
    }

    #[test]
    fn test_nested_field_passes_through() {
        let p = processor(ConversionDirection::HexadecimalToDecimal);
        let mut row: Row = serde_json::from_str(r#"{"in": "0x3D", "meta": {"a": 1}}"#).unwrap();
        assert_eq!(p.process_row(&mut row).unwrap(), RowOutcome::Converted);
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"in":"0x3D","meta":{"a":1},"out":"61"}"#
        );

        let mut nested: Row = serde_json::from_str(r#"{"in": [1, 0]}"#).unwrap();
        assert_eq!(p.process_row(&mut nested).unwrap(), RowOutcome::SkippedEmpty);
    }

    #[test]
    fn test_output_defaults_to_input_column() {
        let params =
            StepParams::new("code").processing_mode(ConversionDirection::BinaryToHexadecimal);
        let p = NumericBaseConversion::new(params).unwrap();
        assert_eq!(p.output_column(), "code");

        let mut row = Row::new().with("code", "1010b");
        p.process_row(&mut row).unwrap();
        assert_eq!(row.text("code").as_deref(), Some("A"));
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn test_new_rejects_invalid_params() {
        let err = NumericBaseConversion::new(StepParams::new("code")).unwrap_err();
        assert_eq!(err, ConfigError::MissingDirection);
    }

    #[test]
    fn test_convert_field() {
        let p = processor(ConversionDirection::BinaryToDecimal);
        assert_eq!(p.convert_field(Some("11011b")).unwrap().as_deref(), Some("27"));
        assert_eq!(p.convert_field(Some("12")).unwrap(), None);
        assert_eq!(p.convert_field(Some("")).unwrap(), None);
        assert_eq!(p.convert_field(None).unwrap(), None);
    }

    #[test]
    fn test_meta_describe() {
        let meta = NumericBaseConversionMeta;
        assert_eq!(meta.name(), "NumericBaseConversion");
        assert_eq!(meta.doc_page(), "numeric-base-conversion");
        assert_eq!(meta.category(), Category::Transformation);
        assert_eq!(meta.tags(), &[ProcessorTag::Reshaping, ProcessorTag::Math]);
        assert!(meta.help().contains("# Output column"));

        let desc = meta.describe();
        let names: Vec<_> = desc.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["inputColumn", "processingMode", "outputColumn"]);

        let mode = desc.get_param("processingMode").unwrap();
        assert_eq!(mode.default_value.as_deref(), Some("BINARY_TO_DECIMAL"));
        match &mode.kind {
            ParamKind::Select { choices } => {
                assert_eq!(choices.len(), 6);
                assert_eq!(
                    choices[1],
                    ("HEXA_TO_DECIMAL".to_string(), "Hexadecimal to Decimal".to_string())
                );
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_meta_summarize() {
        let meta = NumericBaseConversionMeta;
        let params = StepParams::new("code")
            .output_column("out")
            .processing_mode(ConversionDirection::HexadecimalToBinary);
        assert_eq!(
            meta.summarize(&params).as_deref(),
            Some("Convert data in column code from hexa to binary")
        );

        assert_eq!(meta.summarize(&StepParams::new("code").output_column("out")), None);
        assert_eq!(
            meta.summarize(
                &StepParams::new("code").processing_mode(ConversionDirection::DecimalToBinary)
            ),
            None
        );
    }

    #[test]
    fn test_meta_build() {
        let meta = NumericBaseConversionMeta;
        let processor = meta
            .build(StepParams::new("n").processing_mode(ConversionDirection::DecimalToHexadecimal))
            .unwrap();

        let mut row = Row::new().with("n", "255");
        assert_eq!(processor.process_row(&mut row).unwrap(), RowOutcome::Converted);
        assert_eq!(row.text("n").as_deref(), Some("FF"));

        assert!(meta.build(StepParams::new("n")).is_err());
    }
}
