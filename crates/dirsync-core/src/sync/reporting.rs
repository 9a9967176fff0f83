//! Sync operation reporting and statistics

use std::fmt::Write;

use super::SyncResult;

/// Sync operation reporter
#[derive(Debug)]
pub struct SyncReporter;

impl SyncReporter {
    /// Generate a summary report
    #[must_use]
    pub fn generate_summary(result: &SyncResult) -> String {
        let mut output = String::new();

        output.push_str("\n=== Sync Summary ===\n");
        let _ = writeln!(output, "Created:  {}", result.created);
        let _ = writeln!(output, "Updated:  {}", result.updated);
        let _ = writeln!(output, "Directories: {}", result.directories_created);
        let _ = writeln!(output, "Copied:   {} bytes", result.bytes_copied);
        let _ = writeln!(output, "Skipped:  {}", result.skipped);
        for (reason, count) in &result.skip_reasons {
            let _ = writeln!(output, "  {reason}: {count}");
        }

        if !result.conflicts.is_empty() {
            let _ = writeln!(output, "\nConflicts ({}):", result.conflicts.len());
            for conflict in &result.conflicts {
                let _ = writeln!(output, "  - {}: {}", conflict.path.display(), conflict.kind);
            }
        }

        if !result.unsafe_dirs.is_empty() {
            let _ = writeln!(output, "\nNot copied into themselves ({}):", result.unsafe_dirs.len());
            for path in &result.unsafe_dirs {
                let _ = writeln!(output, "  - {}", path.display());
            }
        }

        if !result.errors.is_empty() {
            let _ = writeln!(output, "\nErrors ({}):", result.errors.len());
            for error in &result.errors {
                let _ = writeln!(output, "  - {error}");
            }
        }

        let _ = writeln!(output, "\nTotal operations: {}", result.total_operations());

        if result.interrupted {
            output.push_str("Status: ✗ Interrupted\n");
        } else if result.is_success() {
            output.push_str("Status: ✓ Success\n");
        } else {
            output.push_str("Status: ✗ Completed with errors\n");
        }

        output
    }
}
