//! Sync operation reporting and statistics

use std::fmt::Write;

use super::SyncResult;

/// Sync operation reporter
pub struct SyncReporter;

impl SyncReporter {
    /// Generate a summary report
    #[must_use]
    pub fn generate_summary(result: &SyncResult) -> String {
        let mut output = String::new();

        output.push_str("\n=== Sync Summary ===\n");
        let _ = writeln!(output, "To workspace: {}", result.copied_to_workspace);
        let _ = writeln!(output, "To library:   {}", result.copied_to_library);
        let _ = writeln!(output, "Deleted:      {}", result.deleted);

        if result.unchanged > 0 && !result.skip_reasons.is_empty() {
            let _ = write!(output, "Unchanged:    {}", result.unchanged);
            let mut reasons: Vec<_> = result.skip_reasons.iter().collect();
            reasons.sort_by_key(|(reason, count)| (std::cmp::Reverse(**count), reason.to_string()));
            for (reason, count) in reasons {
                let _ = write!(output, " ({reason}: {count})");
            }
            let _ = writeln!(output);
        } else {
            let _ = writeln!(output, "Unchanged:    {}", result.unchanged);
        }

        if !result.failures.is_empty() {
            let _ = writeln!(output, "\nFailed items ({}):", result.failures.len());
            for failure in &result.failures {
                let _ = writeln!(output, "  - {}: {}", failure.item, failure.error);
            }
        }

        let _ = writeln!(output, "\nTotal operations: {}", result.total_operations());

        if result.is_success() {
            output.push_str("Status: ✓ Success\n");
        } else {
            output.push_str("Status: ✗ Completed with errors\n");
        }

        output
    }
}
