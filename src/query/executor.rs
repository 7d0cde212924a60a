// Scan Executor
// This module runs the linear pass: decode each payload, filter it, render matches

use super::filter::Filter;
use crate::config::OutputFormat;
use crate::storage::{PayloadRow, RowId};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

/// A row whose decoded payload passed the filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub id: RowId,
    #[serde(rename = "data")]
    pub document: Value,
}

/// The outcome of a scan
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Matches in the order the rows were returned
    pub matches: Vec<Match>,
    /// Rows looked at
    pub scanned: usize,
    /// Rows whose payload was not valid JSON
    pub skipped: usize,
}

/// Shape of the line introducing each match in text output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdLine {
    /// `ID: <id>`
    #[default]
    Prefixed,
    /// `ID <id>:`
    Trailing,
}

/// Applies a filter to rows and renders the matches
pub struct Scanner {
    filter: Filter,
    /// Truncation limit for text output, in characters
    max_chars: Option<usize>,
    format: OutputFormat,
    id_line: IdLine,
}

impl Scanner {
    pub fn new(filter: Filter, max_chars: Option<usize>, format: OutputFormat) -> Self {
        Self {
            filter,
            max_chars,
            format,
            id_line: IdLine::default(),
        }
    }

    pub fn with_id_line(mut self, id_line: IdLine) -> Self {
        self.id_line = id_line;
        self
    }

    /// Decode and filter every row
    /// Undecodable payloads are skipped without surfacing an error
    pub fn scan<I>(&self, rows: I) -> ScanReport
    where
        I: IntoIterator<Item = PayloadRow>,
    {
        let mut report = ScanReport::default();

        for row in rows {
            report.scanned += 1;

            let Some(document) = row.payload.decode() else {
                trace!(id = %row.id, "payload is not valid JSON, skipping");
                report.skipped += 1;
                continue;
            };

            if self.filter.matches(&document) {
                report.matches.push(Match {
                    id: row.id,
                    document,
                });
            }
        }

        debug!(
            scanned = report.scanned,
            matched = report.matches.len(),
            skipped = report.skipped,
            "scan finished"
        );
        report
    }

    /// Render one match in the configured output format
    pub fn render(&self, m: &Match) -> String {
        match self.format {
            OutputFormat::Text => {
                // to_string_pretty indents by two spaces and keeps non-ASCII as-is
                let pretty = serde_json::to_string_pretty(&m.document)
                    .unwrap_or_else(|_| m.document.to_string());
                let body = truncate_chars(&pretty, self.max_chars);
                match self.id_line {
                    IdLine::Prefixed => format!("\nID: {}\n{}", m.id, body),
                    IdLine::Trailing => format!("\nID {}:\n{}", m.id, body),
                }
            }
            OutputFormat::Jsonl => {
                serde_json::to_string(m).unwrap_or_else(|_| m.document.to_string())
            }
        }
    }
}

/// Cut a string to at most `limit` characters (not bytes)
fn truncate_chars(text: &str, limit: Option<usize>) -> &str {
    match limit.and_then(|n| text.char_indices().nth(n)) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
