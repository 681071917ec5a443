#![no_main]

use libfuzzer_sys::fuzz_target;
use problem_details::Problem;

fuzz_target!(|input: (String, String, i64, String, String)| {
    let (type_url, title, status, detail, instance) = input;
    let problem = Problem::new(type_url, title, status)
        .with_detail(detail)
        .with_instance(instance);

    let encoded = problem.to_json_vec().expect("fixed fields always encode");
    let value: serde_json::Value = serde_json::from_slice(&encoded).expect("output is valid JSON");
    assert_eq!(value["status"], status);
});
