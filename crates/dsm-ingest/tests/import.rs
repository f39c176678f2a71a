//! End-to-end import flows against a binding's code set.

use dsm_ingest::{bulk_import, dedupe_codes, delimited_import};
use dsm_model::Binding;

#[test]
fn bulk_then_dedupe_matches_editor_flow() {
    let mut binding = Binding::from_template();
    let code_set = binding.ensure_code_set();

    bulk_import(code_set, "111 222 111 333", "http://snomed.info/sct", 0.9);
    assert_eq!(code_set.codes.len(), 4);

    assert_eq!(dedupe_codes(code_set), 1);
    let codes: Vec<&str> = code_set.codes.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["111", "222", "333"]);
}

#[test]
fn rejected_delimited_batch_leaves_prior_imports_intact() {
    let mut binding = Binding::from_template();
    let code_set = binding.ensure_code_set();

    delimited_import(code_set, "sys1,code1,0.9").expect("first batch");
    let err = delimited_import(code_set, "sys1,code2,0.8\nbroken").unwrap_err();
    assert_eq!(err.lines_display(), "2");

    assert_eq!(code_set.codes.len(), 1);
    assert_eq!(code_set.codes[0].code, "code1");
}

#[test]
fn delimited_import_counts_appended_codes() {
    let mut binding = Binding::from_template();
    let code_set = binding.ensure_code_set();

    let count = delimited_import(code_set, "sys1,code1,0.9\nsys1,code2,0.8\nsys1,code3,0.7")
        .expect("batch parses");
    assert_eq!(count, 3);
    assert_eq!(binding.total_codes(), 3);
}
