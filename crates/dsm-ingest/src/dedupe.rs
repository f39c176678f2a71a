//! Exact-duplicate removal within one code set.

use std::collections::BTreeSet;

use dsm_model::CodeSet;

/// Remove duplicate codings from a code set in a single pass.
///
/// A coding is a duplicate when an earlier coding shares both `system` and
/// `code`; the first occurrence wins and surviving entries keep their order.
/// Returns the number of codings removed.
pub fn dedupe_codes(code_set: &mut CodeSet) -> usize {
    let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
    let before = code_set.codes.len();
    code_set
        .codes
        .retain(|coding| seen.insert((coding.system.clone(), coding.code.clone())));
    before - code_set.codes.len()
}
