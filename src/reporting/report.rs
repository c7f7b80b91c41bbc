use serde::Serialize;
use std::fmt;

use crate::core::constants::report::{SIZE_PLACEHOLDER, SIZE_WIDTH, STATUS_WIDTH};
use crate::core::types::ProbeOutcome;

/// Outcomes of a run, ordered for display.
///
/// Entries are sorted by `response_size`, largest first. The sort is stable,
/// so outcomes of equal size keep the order in which they were recorded.
/// Unknown sizes (`-1`) therefore sink to the bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    entries: Vec<ProbeOutcome>,
}

impl Report {
    pub fn build(mut outcomes: Vec<ProbeOutcome>) -> Self {
        outcomes.sort_by(|a, b| b.response_size.cmp(&a.response_size));
        Self { entries: outcomes }
    }

    pub fn entries(&self) -> &[ProbeOutcome] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of transport failures in the report
    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_error()).count()
    }

    /// Render the fixed-width text table.
    ///
    /// ```text
    /// Status   Response Size   URL
    /// ------   -------------   ---
    /// 200      512             http://example.com/b
    /// ```
    ///
    /// Transport failures are rendered as their diagnostic line instead of a
    /// table row.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&row("Status", "Response Size", "URL"));
        out.push_str(&row("------", "-------------", "---"));

        for entry in &self.entries {
            match entry.error_detail {
                Some(ref detail) if entry.is_error() => {
                    out.push_str(detail);
                    out.push('\n');
                }
                _ => {
                    let size = entry
                        .size()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| SIZE_PLACEHOLDER.to_string());
                    out.push_str(&row(&entry.status_code.to_string(), &size, &entry.url));
                }
            }
        }
        out
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn row(status: &str, size: &str, url: &str) -> String {
    format!(
        "{status:<sw$} {size:<zw$} {url}\n",
        sw = STATUS_WIDTH,
        zw = SIZE_WIDTH
    )
}
