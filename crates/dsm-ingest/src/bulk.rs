//! Bulk import: a whitespace-delimited token list, one coding per token.

use dsm_model::{CodeSet, CodeSetCoding};

/// Parse a whitespace-delimited token list into codings, in input order.
/// Every coding carries the same fixed system and confidence; empty tokens
/// are skipped.
pub fn parse_bulk(tokens: &str, system: &str, confidence: f64) -> Vec<CodeSetCoding> {
    tokens
        .split_whitespace()
        .map(|code| CodeSetCoding::new(system, code, confidence))
        .collect()
}

/// Append bulk-imported codings to a code set. Returns the appended count.
pub fn bulk_import(code_set: &mut CodeSet, tokens: &str, system: &str, confidence: f64) -> usize {
    let codings = parse_bulk(tokens, system, confidence);
    let count = codings.len();
    code_set.codes.extend(codings);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_keep_input_order_and_shared_attributes() {
        let codings = parse_bulk("1234-5  6789-0\n42", "http://loinc.org", 0.7);
        let codes: Vec<&str> = codings.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["1234-5", "6789-0", "42"]);
        assert!(codings.iter().all(|c| c.system == "http://loinc.org"));
        assert!(codings.iter().all(|c| c.confidence == 0.7));
    }

    #[test]
    fn empty_input_appends_nothing() {
        let mut code_set = CodeSet::default();
        assert_eq!(bulk_import(&mut code_set, "  \n\t ", "sys", 1.0), 0);
        assert!(code_set.codes.is_empty());
    }

    #[test]
    fn import_appends_to_existing_codes() {
        let mut code_set = CodeSet::default();
        code_set.codes.push(CodeSetCoding::new("sys", "old", 1.0));
        assert_eq!(bulk_import(&mut code_set, "a b", "sys", 0.5), 2);
        assert_eq!(code_set.codes.len(), 3);
        assert_eq!(code_set.codes[0].code, "old");
    }
}
