use std::path::Path;
use std::sync::Arc;

use crate::activations::Activation;
use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink, LogSink};
use crate::ingest::{self, TypedBuffer};
use crate::math::NumericArray;
use crate::vector;
use crate::Result;

/// Engine configuration plus a diagnostic sink, wrapped around the core
/// operations.
///
/// Every method delegates to the matching free function and reports any
/// failure to the sink before returning it unchanged. Successful ingestion
/// is reported as an informational event.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use mlc_array::{CollectingSink, Context, TypedBuffer};
///
/// let sink = Arc::new(CollectingSink::new());
/// let ctx = Context::default().with_sink(sink.clone());
///
/// let mut a = ctx.prepare_data(TypedBuffer::Int(&[1, -2, 3]), &[3]).unwrap();
/// ctx.relu(&mut a).unwrap();
/// assert_eq!(a.data(), &[1.0, 0.0, 3.0]);
/// assert!(sink.failures().is_empty());
/// ```
#[derive(Clone)]
pub struct Context {
    config: EngineConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Context {
    /// A context reporting through the `log` facade.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            sink: Arc::new(LogSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn observe<T>(&self, operation: &'static str, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.sink.report(&Diagnostic::failure(operation, err));
        }
        result
    }

    fn ingested(&self, operation: &'static str, result: Result<NumericArray>) -> Result<NumericArray> {
        let result = self.observe(operation, result);
        if let Ok(array) = &result {
            self.sink.report(&Diagnostic::info(
                operation,
                format!("created array with shape {} ({} elements)", array.shape(), array.size()),
            ));
        }
        result
    }

    // =========================================================================
    // Ingestion
    // =========================================================================

    pub fn prepare_data(&self, input: TypedBuffer<'_>, shape: &[usize]) -> Result<NumericArray> {
        self.ingested("prepare_data", ingest::prepare_data(input, shape))
    }

    pub fn read_csv<P: AsRef<Path>>(&self, path: P) -> Result<NumericArray> {
        self.ingested(
            "read_csv",
            ingest::read_csv_with_config(path, &self.config.tabular),
        )
    }

    // =========================================================================
    // Activations
    // =========================================================================

    pub fn activate(&self, activation: Activation, array: &mut NumericArray) -> Result<()> {
        self.observe(activation.name(), activation.apply(array, &self.config))
    }

    pub fn relu(&self, array: &mut NumericArray) -> Result<()> {
        self.activate(Activation::Relu, array)
    }

    pub fn sigmoid(&self, array: &mut NumericArray) -> Result<()> {
        self.activate(Activation::Sigmoid, array)
    }

    pub fn tanh(&self, array: &mut NumericArray) -> Result<()> {
        self.activate(Activation::Tanh, array)
    }

    pub fn leaky_relu(&self, array: &mut NumericArray, alpha: f32) -> Result<()> {
        self.activate(Activation::LeakyRelu { alpha }, array)
    }

    pub fn swish(&self, array: &mut NumericArray) -> Result<()> {
        self.activate(Activation::Swish, array)
    }

    pub fn softmax(&self, array: &mut NumericArray) -> Result<()> {
        self.activate(Activation::Softmax, array)
    }

    // =========================================================================
    // Vector algebra
    // =========================================================================

    pub fn add(&self, a: &NumericArray, b: &NumericArray, result: &mut NumericArray) -> Result<()> {
        self.observe("add", vector::add_with(a, b, result, &self.config))
    }

    pub fn subtract(
        &self,
        a: &NumericArray,
        b: &NumericArray,
        result: &mut NumericArray,
    ) -> Result<()> {
        self.observe("subtract", vector::subtract_with(a, b, result, &self.config))
    }

    pub fn dot(&self, a: &NumericArray, b: &NumericArray) -> Result<f64> {
        self.observe("dot", vector::dot_with(a, b, &self.config))
    }

    pub fn scale(&self, a: &NumericArray, k: f32, result: &mut NumericArray) -> Result<()> {
        self.observe("scale", vector::scale_with(a, k, result, &self.config))
    }
}
