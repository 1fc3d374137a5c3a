//! Integration tests for configuration, the diagnostic sink and `Context`.

use std::io::Write;
use std::sync::Arc;

use mlc_array::activations::Activation;
use mlc_array::ingest::DataType;
use mlc_array::{
    CollectingSink, Context, EngineConfig, ErrorKind, NumericArray, NullSink, TabularConfig,
    TypedBuffer,
};

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

#[test]
fn engine_config_default_values() {
    let cfg = EngineConfig::default();
    assert!(cfg.parallel_threshold > 0);
    assert_eq!(cfg.tabular.delimiter, b',');
    assert_eq!(cfg.tabular.initial_capacity, TabularConfig::DEFAULT_INITIAL_CAPACITY);
}

#[test]
fn engine_config_round_trips_json() {
    let cfg = EngineConfig::new(128, TabularConfig::with_delimiter(b'\t'));
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains("parallel_threshold"));
    let cfg2: EngineConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(cfg, cfg2);
}

#[test]
fn engine_config_missing_fields_use_defaults() {
    let cfg: EngineConfig = serde_json::from_str(r#"{"parallel_threshold": 10}"#).unwrap();
    assert_eq!(cfg.parallel_threshold, 10);
    assert_eq!(cfg.tabular, TabularConfig::default());
}

#[test]
fn activation_and_data_type_serialize_snake_case() {
    let json = serde_json::to_string(&Activation::LeakyRelu { alpha: 0.5 }).unwrap();
    assert!(json.contains("leaky_relu"));
    let back: Activation = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Activation::LeakyRelu { alpha: 0.5 });

    assert_eq!(serde_json::to_string(&DataType::Double).unwrap(), "\"double\"");
}

// ---------------------------------------------------------------------------
// Context + diagnostics
// ---------------------------------------------------------------------------

#[test]
fn context_end_to_end_with_collecting_sink() {
    let sink = Arc::new(CollectingSink::new());
    let ctx = Context::default().with_sink(sink.clone());

    let mut mat = ctx
        .prepare_data(TypedBuffer::Float(&[1.0, -2.0, 3.0, 4.0, -5.0, 6.0]), &[2, 3])
        .unwrap();
    ctx.tanh(&mut mat).unwrap();
    ctx.leaky_relu(&mut mat, 0.01).unwrap();
    ctx.softmax(&mut mat).unwrap();
    for r in 0..2 {
        let sum: f32 = mat.row(r).unwrap().iter().sum();
        approx::assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-6);
    }

    assert!(sink.failures().is_empty());
    assert_eq!(sink.events().len(), 1);
}

#[test]
fn context_reports_each_failure_with_its_kind() {
    let sink = Arc::new(CollectingSink::new());
    let ctx = Context::default().with_sink(sink.clone());

    let mut empty = NumericArray::default();
    let a = NumericArray::from_shape_vec(&[3], vec![1.0, 2.0, 3.0]).unwrap();
    let b = NumericArray::from_shape_vec(&[2], vec![1.0, 2.0]).unwrap();
    let mut out = NumericArray::zeros(&[3]).unwrap();

    assert!(ctx.relu(&mut empty).is_err());
    assert!(ctx.add(&a, &b, &mut out).is_err());
    assert!(ctx.prepare_data(TypedBuffer::Int(&[1, 2]), &[0]).is_err());
    assert!(ctx.read_csv("/nonexistent/file.csv").is_err());

    let kinds: Vec<_> = sink
        .failures()
        .iter()
        .map(|d| (d.operation, d.kind.unwrap()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("relu", ErrorKind::InvalidArgument),
            ("add", ErrorKind::ShapeMismatch),
            ("prepare_data", ErrorKind::InvalidArgument),
            ("read_csv", ErrorKind::MalformedSource),
        ]
    );
}

#[test]
fn context_reads_csv_with_configured_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.tsv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"1\t2\n3\t4\n").unwrap();

    let cfg = EngineConfig::new(1 << 16, TabularConfig::with_delimiter(b'\t'));
    let ctx = Context::new(cfg).with_sink(Arc::new(NullSink));
    let a = ctx.read_csv(&path).unwrap();
    assert_eq!(a.dims(), &[2, 2]);

    let mut out = NumericArray::zeros(&[4]).unwrap();
    ctx.scale(&a, 0.5, &mut out).unwrap();
    assert_eq!(out.data(), &[0.5, 1.0, 1.5, 2.0]);
    assert_eq!(ctx.dot(&a, &a).unwrap(), 30.0);
}
