//! Processor descriptions for pipeline hosts.
//!
//! A host lists processors, renders a configuration form from their
//! parameter descriptors, and builds a processor from saved parameters.
//! None of this affects conversion itself.

use crate::params::{ConfigError, StepParams};
use crate::processor::RowProcessor;
use serde::{Deserialize, Serialize};

/// Where a processor is filed in a processor library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Transformation,
}

/// Search tags attached to a processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessorTag {
    Reshaping,
    Math,
}

/// Kind of input a parameter expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamKind {
    /// A column name.
    Column,
    /// One value out of a fixed list of `(identifier, label)` choices.
    Select { choices: Vec<(String, String)> },
}

/// Descriptor for one processor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDesc {
    pub name: String,
    pub label: String,
    pub kind: ParamKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ParamDesc {
    pub fn column(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: ParamKind::Column,
            default_value: None,
        }
    }

    pub fn select<I, S>(name: impl Into<String>, label: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            label: label.into(),
            kind: ParamKind::Select {
                choices: choices
                    .into_iter()
                    .map(|(id, label)| (id.into(), label.into()))
                    .collect(),
            },
            default_value: None,
        }
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Form description of a processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorDesc {
    pub name: String,
    /// Short action phrase shown in the processor library.
    pub label: String,
    pub params: Vec<ParamDesc>,
}

impl ProcessorDesc {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, param: ParamDesc) -> Self {
        self.params.push(param);
        self
    }

    pub fn get_param(&self, name: &str) -> Option<&ParamDesc> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Static description of a processor type, and its factory.
pub trait ProcessorMeta: Send + Sync {
    /// Unique processor name.
    fn name(&self) -> &str;

    /// Documentation page slug.
    fn doc_page(&self) -> &str;

    fn category(&self) -> Category;

    fn tags(&self) -> &[ProcessorTag];

    /// Markdown help text.
    fn help(&self) -> &str;

    /// Configuration form.
    fn describe(&self) -> ProcessorDesc;

    /// One-line summary of a configured step, `None` if it is incomplete.
    fn summarize(&self, params: &StepParams) -> Option<String>;

    /// Validate `params` and build a processor.
    fn build(&self, params: StepParams) -> Result<Box<dyn RowProcessor>, ConfigError>;
}
