#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for problem document encode/decode and extension resolution

use std::sync::Arc;

use parking_lot::Mutex;
use problem_details::{
    DiagnosticSink, Extension, ExtensionError, ExtensionRegistry, ExtensionValue, Problem,
    ProblemDecoder, ProblemError,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

const INVALID_PARAMETER: &str =
    "https://schema.xmlui.org/errors/test-server/api/validation/invalid-parameter-type";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Coded {
    code: i64,
    message: String,
}

/// Accepts anything `Coded` accepts, plus more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LooseCoded {
    code: i64,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RetryHint {
    retry_after: u64,
}

#[derive(Default)]
struct RecordingSink {
    unmatched: Mutex<Vec<(usize, Map<String, Value>)>>,
    rejected: Mutex<Vec<usize>>,
}

impl DiagnosticSink for RecordingSink {
    fn unmatched_extension(&self, index: usize, data: &Map<String, Value>) {
        self.unmatched.lock().push((index, data.clone()));
    }

    fn extension_rejected(&self, error: &ExtensionError) {
        self.rejected.lock().push(error.index);
    }
}

fn decoder_with(registry: ExtensionRegistry) -> (ProblemDecoder, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let decoder = ProblemDecoder::new(Arc::new(registry), sink.clone());
    (decoder, sink)
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

// =============================================================================
// Fixed fields
// =============================================================================

#[test]
fn test_roundtrip_without_extensions_keeps_fixed_fields() {
    let (decoder, sink) = decoder_with(ExtensionRegistry::new());
    let original = Problem::new(INVALID_PARAMETER, "Invalid Parameter Type", 422)
        .with_detail("Parameter 'id' expected type 'int' but received 'abc'")
        .with_instance("/api/users/abc");

    let decoded = decoder.decode(&original.to_json_vec().unwrap()).unwrap();

    assert_eq!(decoded, original);
    assert!(sink.unmatched.lock().is_empty());
}

#[test]
fn test_omits_empty_optionals() {
    let p = Problem::new(INVALID_PARAMETER, "Minimal Error", 400);
    let json: Value = serde_json::from_slice(&p.to_json_vec().unwrap()).unwrap();
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys.len(), 3);
    for key in ["type", "title", "status"] {
        assert!(keys.iter().any(|k| k == key), "missing {key}");
    }
}

#[test]
fn test_decode_then_encode_is_byte_identical() {
    let (decoder, _) = decoder_with(ExtensionRegistry::new());
    let input = format!(r#"{{"type":"{INVALID_PARAMETER}","title":"Minimal Error","status":400}}"#);

    let decoded = decoder.decode_str(&input).unwrap();
    assert_eq!(decoded.to_json_string().unwrap(), input);
}

#[test]
fn test_whitespace_in_input_does_not_matter() {
    let (decoder, _) = decoder_with(ExtensionRegistry::new());
    let decoded = decoder
        .decode_str("{\n  \"type\": \"https://e.example/x\",\n  \"title\": \"T\",\n  \"status\": 404\n}")
        .unwrap();
    assert_eq!(
        decoded.to_json_string().unwrap(),
        r#"{"type":"https://e.example/x","title":"T","status":404}"#
    );
}

#[test]
fn test_non_numeric_status_fails_whole_document() {
    let (decoder, sink) = decoder_with(ExtensionRegistry::new());
    let res = decoder.decode_str(r#"{"type":"x","title":"T","status":"bad","extensions":[{"a":1}]}"#);

    assert!(matches!(res, Err(ProblemError::Structural(_))));
    assert!(sink.unmatched.lock().is_empty(), "no extension work after a structural failure");
}

// =============================================================================
// Extension resolution
// =============================================================================

#[test]
fn test_first_registered_shape_wins() {
    let mut registry = ExtensionRegistry::new();
    registry.register::<Coded>();
    registry.register::<LooseCoded>();
    let (decoder, _) = decoder_with(registry);

    for _ in 0..3 {
        let p = decoder
            .decode_str(r#"{"title":"T","status":400,"extensions":[{"code":1,"message":"m"}]}"#)
            .unwrap();
        assert!(p.extensions[0].downcast_ref::<Coded>().is_some());
        assert!(p.extensions[0].downcast_ref::<LooseCoded>().is_none());
    }
}

#[test]
fn test_reversed_registration_reverses_priority() {
    let mut registry = ExtensionRegistry::new();
    registry.register::<LooseCoded>();
    registry.register::<Coded>();
    let (decoder, _) = decoder_with(registry);

    let p = decoder
        .decode_str(r#"{"extensions":[{"code":1,"message":"m"}]}"#)
        .unwrap();
    assert!(p.extensions[0].downcast_ref::<LooseCoded>().is_some());
}

#[test]
fn test_unmatched_object_falls_back_with_one_notice() {
    let mut registry = ExtensionRegistry::new();
    registry.register::<Coded>();
    let (decoder, sink) = decoder_with(registry);

    let p = decoder
        .decode_str(r#"{"title":"T","status":400,"extensions":[{"foo":"bar","n":[1,2]}]}"#)
        .unwrap();

    let expected = object(json!({ "foo": "bar", "n": [1, 2] }));
    assert_eq!(p.extensions.len(), 1);
    assert_eq!(p.extensions[0].as_untyped(), Some(&expected));

    let unmatched = sink.unmatched.lock();
    assert_eq!(unmatched.len(), 1);
    assert_eq!(unmatched[0], (0, expected));
}

#[test]
fn test_mixed_typed_and_generic_extensions() {
    let mut registry = ExtensionRegistry::new();
    registry.register::<Coded>();
    let (decoder, sink) = decoder_with(registry);

    let p = decoder
        .decode_str(
            r#"{"type":"https://e.example/x","title":"T","status":422,
                "extensions":[{"code":5,"message":"x"},{"foo":"bar"}]}"#,
        )
        .unwrap();

    assert_eq!(p.extensions.len(), 2);
    assert_eq!(
        p.extensions[0].downcast_ref::<Coded>(),
        Some(&Coded {
            code: 5,
            message: "x".to_owned()
        })
    );
    assert_eq!(
        p.extensions[1].as_untyped(),
        Some(&object(json!({ "foo": "bar" })))
    );
    assert_eq!(sink.unmatched.lock().len(), 1);
    assert_eq!(sink.unmatched.lock()[0].0, 1);
}

#[test]
fn test_malformed_element_is_isolated() {
    let mut registry = ExtensionRegistry::new();
    registry.register::<Coded>();
    registry.register::<RetryHint>();
    let (decoder, sink) = decoder_with(registry);

    let p = decoder
        .decode_str(
            r#"{"title":"T","status":400,
                "extensions":[{"code":5,"message":"x"},"not an object",{"retry_after":30}]}"#,
        )
        .unwrap();

    assert_eq!(p.extensions.len(), 2);
    assert!(p.extensions[0].downcast_ref::<Coded>().is_some());
    assert_eq!(
        p.extensions[1].downcast_ref::<RetryHint>(),
        Some(&RetryHint { retry_after: 30 })
    );
    assert_eq!(*sink.rejected.lock(), vec![1]);
    assert!(sink.unmatched.lock().is_empty());
}

#[test]
fn test_array_element_does_not_match_struct_shape() {
    let mut registry = ExtensionRegistry::new();
    registry.register::<Coded>();
    let (decoder, sink) = decoder_with(registry);

    let p = decoder
        .decode_str(
            r#"{"title":"T","status":400,
                "extensions":[{"code":1,"message":"a"},[5,"x"],{"code":2,"message":"b"}]}"#,
        )
        .unwrap();

    let codes: Vec<_> = p
        .extensions
        .iter()
        .map(|e| e.downcast_ref::<Coded>().map(|c| c.code))
        .collect();
    assert_eq!(codes, vec![Some(1), Some(2)]);
    assert_eq!(*sink.rejected.lock(), vec![1]);
    assert!(sink.unmatched.lock().is_empty());
}

#[test]
fn test_null_optionals_do_not_fail_document() {
    let (decoder, sink) = decoder_with(ExtensionRegistry::new());
    let p = decoder
        .decode_str(
            r#"{"type":"https://e.example/x","title":"T","status":400,"detail":null,"instance":null}"#,
        )
        .unwrap();

    assert_eq!(p, Problem::new("https://e.example/x", "T", 400));
    assert_eq!(
        p.to_json_string().unwrap(),
        r#"{"type":"https://e.example/x","title":"T","status":400}"#
    );
    assert!(sink.rejected.lock().is_empty());
}

#[test]
fn test_all_elements_rejected_still_decodes_document() {
    let (decoder, sink) = decoder_with(ExtensionRegistry::new());
    let p = decoder
        .decode_str(r#"{"title":"T","status":500,"extensions":[1,null,true]}"#)
        .unwrap();

    assert!(p.extensions.is_empty());
    assert_eq!(p.status, 500);
    assert_eq!(*sink.rejected.lock(), vec![0, 1, 2]);
}

#[test]
fn test_custom_trial_parser_can_accept_non_objects() {
    fn tag(raw: &Value) -> Result<Box<dyn ExtensionValue>, serde_json::Error> {
        String::deserialize(raw).map(|s| Box::new(s) as Box<dyn ExtensionValue>)
    }

    let mut registry = ExtensionRegistry::new();
    let handle = registry.register_with("tag", tag);
    let (decoder, sink) = decoder_with(registry);

    let p = decoder.decode_str(r#"{"extensions":["beta"]}"#).unwrap();

    assert_eq!(p.extensions[0].shape(), Some(handle.name()));
    assert_eq!(p.extensions[0].downcast_ref::<String>().map(String::as_str), Some("beta"));
    assert!(sink.rejected.lock().is_empty());
}

#[test]
fn test_typed_roundtrip_compares_equal() {
    let mut registry = ExtensionRegistry::new();
    registry.register::<Coded>();
    let (decoder, _) = decoder_with(registry);

    let original = Problem::new("https://e.example/x", "T", 409)
        .with_extension(Extension::typed(Coded {
            code: 7,
            message: "conflict".to_owned(),
        }))
        .with_extension(object(json!({ "extra": true })));

    let decoded = decoder.decode(&original.to_json_vec().unwrap()).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn test_decoder_is_shareable_across_threads() {
    let mut registry = ExtensionRegistry::new();
    registry.register::<Coded>();
    let (decoder, sink) = decoder_with(registry);

    std::thread::scope(|s| {
        for i in 0..4 {
            let decoder = &decoder;
            s.spawn(move || {
                let body = format!(r#"{{"extensions":[{{"code":{i},"message":"m"}},{{"x":{i}}}]}}"#);
                let p = decoder.decode_str(&body).unwrap();
                assert_eq!(p.extensions[0].downcast_ref::<Coded>().map(|c| c.code), Some(i));
            });
        }
    });

    assert_eq!(sink.unmatched.lock().len(), 4);
}
