//! Delimited-text import: `system,code,confidence` lines, all-or-nothing.

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use dsm_model::{CodeSet, CodeSetCoding};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    /// One or more lines failed to parse; nothing was imported.
    #[error("delimited import rejected, malformed lines: {}", lines_display(.lines))]
    Malformed { lines: Vec<usize> },
}

impl ImportError {
    /// The failed 1-based line numbers as a display string ("2, 5").
    pub fn lines_display(&self) -> String {
        match self {
            Self::Malformed { lines } => lines_display(lines),
        }
    }
}

fn lines_display(lines: &[usize]) -> String {
    lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse pasted delimited text into codings.
///
/// Each line must split into exactly three comma-separated, trimmed fields
/// `(system, code, confidence)` with a confidence parsing as a number.
/// All-or-nothing: any malformed line rejects the whole batch, reporting the
/// failed 1-based line numbers. Blank lines are skipped but still counted,
/// so reported numbers match the pasted text.
pub fn parse_delimited(text: &str) -> Result<Vec<CodeSetCoding>, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut codings = Vec::new();
    let mut bad_lines = Vec::new();
    for (index, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                // A whitespace-only line trims down to one empty field.
                if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
                    continue;
                }
                let line = record_line(record.position(), index);
                match parse_record(&record) {
                    Some(coding) => codings.push(coding),
                    None => bad_lines.push(line),
                }
            }
            Err(error) => {
                bad_lines.push(record_line(error.position(), index));
            }
        }
    }

    if bad_lines.is_empty() {
        Ok(codings)
    } else {
        tracing::warn!(lines = ?bad_lines, "delimited import rejected");
        Err(ImportError::Malformed { lines: bad_lines })
    }
}

fn record_line(position: Option<&csv::Position>, index: usize) -> usize {
    position.map_or(index + 1, |p| p.line() as usize)
}

fn parse_record(record: &StringRecord) -> Option<CodeSetCoding> {
    if record.len() != 3 {
        return None;
    }
    let system = record.get(0)?;
    let code = record.get(1)?;
    let confidence = record.get(2)?;
    if system.is_empty() || code.is_empty() || confidence.is_empty() {
        return None;
    }
    let confidence: f64 = confidence.parse().ok()?;
    Some(CodeSetCoding::new(system, code, confidence))
}

/// Append a parsed batch to a code set, in file order. Returns the appended
/// count; on rejection the code set is untouched.
pub fn delimited_import(code_set: &mut CodeSet, text: &str) -> Result<usize, ImportError> {
    let codings = parse_delimited(text)?;
    let count = codings.len();
    code_set.codes.extend(codings);
    Ok(count)
}
