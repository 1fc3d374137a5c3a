//! mlc-array: a small numeric-array runtime for elementwise ML primitives.
//!
//! This crate converts typed buffers and CSV files into a shape-tagged
//! `NumericArray`, applies activation functions in place (ReLU, sigmoid,
//! tanh, leaky ReLU, swish, last-axis softmax), and runs shape-checked vector
//! algebra into caller-supplied destinations.
//!
//! The core functions are pure and never log. `Context` wraps them with an
//! `EngineConfig` and an injected `DiagnosticSink` for callers that want
//! failures reported somewhere.
pub mod activations;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod ingest;
pub mod math;
pub mod vector;

pub use config::{EngineConfig, TabularConfig};
pub use context::Context;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, LogSink, NullSink};
pub use error::{ErrorKind, MlcError};
pub use ingest::{prepare_data, read_csv, DataType, TypedBuffer};
pub use math::{NumericArray, Shape};

pub type Result<T> = std::result::Result<T, MlcError>;
