use crate::Coordinate;

/// Plain-text export of the most recent records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// One `"x, y, z"` line per record, newest first, joined with `\n`.
    pub text: String,
    /// Number of records present in `text`.
    pub exported: usize,
    /// Number of records in the store when the export ran.
    pub total: u64,
    /// Whether lines were dropped to respect the byte limit.
    pub truncated: bool,
}

/// Join `records` into export lines, stopping before `max_bytes` is exceeded.
///
/// Truncation always happens on a line boundary.
pub(super) fn render_export(records: &[Coordinate], total: u64, max_bytes: usize) -> Export {
    let mut text = String::new();
    let mut exported = 0_usize;
    let mut truncated = false;
    for record in records {
        let line = record.to_string();
        let separator = usize::from(exported > 0);
        if text.len().saturating_add(separator).saturating_add(line.len()) > max_bytes {
            truncated = true;
            break;
        }
        if exported > 0 {
            text.push('\n');
        }
        text.push_str(&line);
        exported += 1;
    }
    Export {
        text,
        exported,
        total,
        truncated,
    }
}
