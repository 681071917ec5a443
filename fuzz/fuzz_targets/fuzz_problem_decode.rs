#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use problem_details::{DecodeLimits, ExtensionRegistry, ProblemDecoder, TracingSink};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Coded {
    code: i64,
    message: String,
}

fuzz_target!(|data: &[u8]| {
    let mut registry = ExtensionRegistry::new();
    registry.register::<Coded>();
    let decoder = ProblemDecoder::new(Arc::new(registry), Arc::new(TracingSink));

    // Anything that decodes must encode again and decode to the same document.
    // Re-encoding may grow the body (`1e5` becomes `100000.0`), so no limits there.
    if let Ok(problem) = decoder.decode(data) {
        let encoded = problem.to_json_vec().expect("decoded problem must encode");
        let again = decoder
            .clone()
            .with_limits(DecodeLimits::unbounded())
            .decode(&encoded)
            .expect("re-encoded problem must decode");
        assert_eq!(again, problem);
    }
});
