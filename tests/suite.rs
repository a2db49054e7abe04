use jsonpatch_rs::{apply_patch, from_value, ApplyOptions};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct PatchTestCase {
    comment: Option<String>,
    doc: Value,
    patch: Value,
    expected: Option<Value>,
    error: Option<String>,
}

fn run_one(tc: &PatchTestCase) -> Result<Value, String> {
    let mut actual = tc.doc.clone();
    let patch = from_value(tc.patch.clone()).map_err(|e| e.to_string())?;
    apply_patch(&mut actual, &patch, ApplyOptions::default()).map_err(|e| e.code().to_string())?;
    Ok(actual)
}

#[test]
fn fixture_suite() {
    let raw = std::fs::read_to_string("tests/fixtures/patch.yaml").unwrap();
    let cases: Vec<PatchTestCase> = serde_yaml::from_str(&raw).unwrap();

    for (idx, tc) in cases.iter().enumerate() {
        let comment = tc.comment.as_deref().unwrap_or("");
        match run_one(tc) {
            Ok(actual) => {
                if let Some(expected_error) = &tc.error {
                    panic!("case {idx} ({comment}): expected error {expected_error}, but got {actual:?}");
                }
                let expected = tc.expected.as_ref().unwrap_or(&tc.doc);
                assert_eq!(&actual, expected, "case {idx} ({comment}): unexpected result");
            }
            Err(actual_code) => match &tc.error {
                Some(expected_code) => assert_eq!(
                    &actual_code, expected_code,
                    "case {idx} ({comment}): wrong error code"
                ),
                None => panic!("case {idx} ({comment}): expected to succeed, got error {actual_code}"),
            },
        }
    }
}
