#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The feedback envelope: what a grading run persists and what the renderer
//! consumes.
//!
//! A list-shaped envelope is a JSON array whose last two elements are always
//! the options record and the debug-info record:
//!
//! ```text
//! [entry_1, ..., entry_N, options, debug_info]
//! ```
//!
//! The backend kind is stored in the options record under `container_type`.
//! When grading fails before any test runs, the envelope is a single JSON
//! object instead, carrying `container_type` and the error details.

/// Rendering options and backend kinds
pub mod options;
/// Per-test records and debug payloads
pub mod records;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

pub use self::{
    options::{BackendKind, RenderOptions},
    records::{
        DebugInfo, FileFeedback, NotebookCase, NotebookEntry, NotebookTestResult, TestCase,
        TestCaseEntry,
    },
};

/// Key of the backend discriminator in options and error records.
const CONTAINER_TYPE: &str = "container_type";

/// Errors raised while decoding an envelope.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    /// The content is not JSON at all.
    #[error("envelope is not valid JSON")]
    Json(#[from] serde_json::Error),
    /// The top-level value is neither an object nor an array.
    #[error("expected a JSON object or array, found {0}")]
    UnexpectedShape(&'static str),
    /// A list envelope is too short to hold the options and debug records.
    #[error("envelope has {0} element(s) but the options and debug info records are required")]
    MissingTrailer(usize),
    /// No backend discriminator was found.
    #[error("`container_type` is missing or not a string")]
    MissingBackend,
    /// The backend discriminator names no known backend.
    #[error("unknown container type `{0}`")]
    UnknownBackend(String),
    /// A record has missing keys or values of the wrong type.
    #[error("invalid {record}")]
    InvalidRecord {
        /// Which record failed, e.g. `options` or `entry 2`.
        record: String,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },
}

/// Entries, options and debug payload of a list-shaped envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Report<E> {
    /// Per-test entries, in presentation order.
    pub entries:    Vec<E>,
    /// Rendering options captured at grading time.
    pub options:    RenderOptions,
    /// Debug payload shared by all entries.
    pub debug_info: DebugInfo,
}

impl<E> Report<E> {
    /// Bundles entries with their options and debug payload.
    pub fn new(entries: Vec<E>, options: RenderOptions, debug_info: DebugInfo) -> Self {
        Self {
            entries,
            options,
            debug_info,
        }
    }
}

/// Report produced by the multi-language runner or the HDL simulator.
pub type CodeReport = Report<TestCaseEntry>;

/// Report produced by the notebook grader.
pub type NotebookReport = Report<NotebookEntry>;

/// Failure that stopped grading before any test ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradingFailure {
    /// The submission did not build. `backend` is `Multilang` or `Hdl`.
    Compilation {
        /// Backend that attempted the build.
        backend: BackendKind,
        /// Build output.
        output:  String,
    },
    /// The notebook could not be executed.
    Notebook {
        /// Name of the error raised.
        error_name: String,
        /// Output captured while running the notebook.
        output:     String,
    },
}

/// Wire form of a [`GradingFailure`].
#[derive(Debug, Serialize, Deserialize)]
struct FailureRecord {
    /// Backend discriminator.
    container_type:        BackendKind,
    /// Build output (`multilang`/`hdl`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compilation_output:    Option<String>,
    /// Error name (`notebook`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_name:            Option<String>,
    /// Error output (`notebook`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    internal_error_output: Option<String>,
}

/// A decoded feedback envelope, one variant per backend shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Results of the multi-language code runner.
    Multilang(CodeReport),
    /// Results of the HDL simulator.
    Hdl(CodeReport),
    /// Results of the notebook grader.
    Notebook(NotebookReport),
    /// Grading failed before any test ran.
    Failure(GradingFailure),
}

/// Deserializes `value`, attaching `record` to any error.
fn record_from_value<T: DeserializeOwned>(value: Value, record: &str) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError::InvalidRecord {
        record: record.to_string(),
        source,
    })
}

/// Human-readable name of a JSON value's type.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reads and parses the backend discriminator of an object.
fn backend_of(record: &Map<String, Value>) -> Result<BackendKind, DecodeError> {
    record
        .get(CONTAINER_TYPE)
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingBackend)?
        .parse()
}

/// Decodes each entry value into `E`.
fn decode_entries<E: DeserializeOwned>(values: Vec<Value>) -> Result<Vec<E>, DecodeError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| record_from_value(value, &format!("entry {index}")))
        .collect()
}

impl Envelope {
    /// Backend that produced this envelope.
    pub fn backend(&self) -> BackendKind {
        match self {
            Envelope::Multilang(_) => BackendKind::Multilang,
            Envelope::Hdl(_) => BackendKind::Hdl,
            Envelope::Notebook(_) => BackendKind::Notebook,
            Envelope::Failure(GradingFailure::Compilation { backend, .. }) => *backend,
            Envelope::Failure(GradingFailure::Notebook { .. }) => BackendKind::Notebook,
        }
    }

    /// Options carried by a list-shaped envelope.
    pub fn options(&self) -> Option<&RenderOptions> {
        match self {
            Envelope::Multilang(report) | Envelope::Hdl(report) => Some(&report.options),
            Envelope::Notebook(report) => Some(&report.options),
            Envelope::Failure(_) => None,
        }
    }

    /// Encodes the envelope into its JSON value.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        let (entries, options, debug_info) = match self {
            Envelope::Multilang(report) | Envelope::Hdl(report) => (
                report
                    .entries
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<serde_json::Result<Vec<_>>>()?,
                &report.options,
                &report.debug_info,
            ),
            Envelope::Notebook(report) => (
                report
                    .entries
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<serde_json::Result<Vec<_>>>()?,
                &report.options,
                &report.debug_info,
            ),
            Envelope::Failure(failure) => {
                let record = match failure {
                    GradingFailure::Compilation { backend, output } => FailureRecord {
                        container_type:        *backend,
                        compilation_output:    Some(output.clone()),
                        error_name:            None,
                        internal_error_output: None,
                    },
                    GradingFailure::Notebook { error_name, output } => FailureRecord {
                        container_type:        BackendKind::Notebook,
                        compilation_output:    None,
                        error_name:            Some(error_name.clone()),
                        internal_error_output: Some(output.clone()),
                    },
                };
                return serde_json::to_value(&record);
            }
        };

        let mut options = serde_json::to_value(options)?;
        if let Value::Object(map) = &mut options {
            map.insert(CONTAINER_TYPE.to_string(), Value::String(self.backend().to_string()));
        }

        let mut values = entries;
        values.push(options);
        values.push(serde_json::to_value(debug_info)?);
        Ok(Value::Array(values))
    }

    /// Encodes the envelope into a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_value()?)
    }

    /// Decodes an envelope from a JSON value.
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Object(record) => Self::failure_from_record(record),
            Value::Array(values) => Self::report_from_values(values),
            other => Err(DecodeError::UnexpectedShape(json_type_name(&other))),
        }
    }

    /// Decodes an envelope from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Decodes the flat error shape.
    fn failure_from_record(record: Map<String, Value>) -> Result<Self, DecodeError> {
        // unknown container types surface as UnknownBackend instead of a serde error
        backend_of(&record)?;
        let record: FailureRecord = record_from_value(Value::Object(record), "error record")?;

        let failure = match record.container_type {
            BackendKind::Multilang | BackendKind::Hdl => GradingFailure::Compilation {
                backend: record.container_type,
                output:  record.compilation_output.unwrap_or_default(),
            },
            BackendKind::Notebook => GradingFailure::Notebook {
                error_name: record.error_name.unwrap_or_default(),
                output:     record.internal_error_output.unwrap_or_default(),
            },
        };
        Ok(Envelope::Failure(failure))
    }

    /// Decodes the list shape by popping the debug info and options records
    /// off the end.
    fn report_from_values(mut values: Vec<Value>) -> Result<Self, DecodeError> {
        let len = values.len();
        let (Some(debug_info), Some(options)) = (values.pop(), values.pop()) else {
            return Err(DecodeError::MissingTrailer(len));
        };

        let backend = match &options {
            Value::Object(map) => backend_of(map)?,
            _ => return Err(DecodeError::MissingBackend),
        };
        let options: RenderOptions = record_from_value(options, "options")?;
        let debug_info: DebugInfo = record_from_value(debug_info, "debug info")?;

        tracing::debug!("Decoding {} {backend} entries", values.len());

        Ok(match backend {
            BackendKind::Multilang => {
                Envelope::Multilang(Report::new(decode_entries(values)?, options, debug_info))
            }
            BackendKind::Hdl => {
                Envelope::Hdl(Report::new(decode_entries(values)?, options, debug_info))
            }
            BackendKind::Notebook => {
                Envelope::Notebook(Report::new(decode_entries(values)?, options, debug_info))
            }
        })
    }
}
