//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use modstrap_core::EntryKind;
use modstrap_core::ManifestEntry;
use modstrap_core::MaterializeReport;
use modstrap_core::TreeManifest;
use modstrap_core::VerificationReport;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (i, c) in s.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result.chars().rev().collect()
    }

    /// Path of an entry as shown to users, prefixed with the tree root.
    fn display_path(root: &str, entry: &ManifestEntry) -> String {
        let mut path = if entry.path.is_root() {
            root.to_string()
        } else {
            format!("{root}/{}", entry.path)
        };
        if entry.kind.is_directory() {
            path.push('/');
        }
        path
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_materialize_result(&self, report: &MaterializeReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let headline = format!("Module tree ready in {}", report.dest_root.display());
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {headline}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(&headline);
        }

        let _ = self.term.write_line(&format!(
            "  Files written: {}",
            Self::format_number(report.files_written)
        ));
        let _ = self.term.write_line(&format!(
            "  Directories: {}",
            Self::format_number(report.directories_created)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size: {}",
            Self::format_size(report.bytes_written)
        ));

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", report.duration));
        }

        Ok(())
    }

    fn format_manifest_short(&self, manifest: &TreeManifest) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in &manifest.entries {
            let _ = self
                .term
                .write_line(&Self::display_path(&manifest.root, entry));
        }

        Ok(())
    }

    fn format_manifest_long(&self, manifest: &TreeManifest, human_readable: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in &manifest.entries {
            let size_str = if human_readable {
                Self::format_size(entry.size)
            } else {
                entry.size.to_string()
            };

            let type_char = match entry.kind {
                EntryKind::File => "-",
                EntryKind::Directory => "d",
            };

            let _ = self.term.write_line(&format!(
                "{type_char} {size_str:>10}  {}",
                Self::display_path(&manifest.root, entry)
            ));
        }

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "Total: {} files, {} directories, {}",
            Self::format_number(manifest.total_files),
            Self::format_number(manifest.total_directories),
            Self::format_size(manifest.total_size)
        ));

        Ok(())
    }

    fn format_verification_report(&self, report: &VerificationReport) -> Result<()> {
        // Failures are shown even in quiet mode
        if self.quiet && report.is_clean() {
            return Ok(());
        }

        let status = if report.is_clean() { "PASSED" } else { "FAILED" };
        let status_str = if self.use_colors {
            if report.is_clean() {
                style(status).green().bold().to_string()
            } else {
                style(status).red().bold().to_string()
            }
        } else {
            status.to_string()
        };
        let _ = self.term.write_line(&format!(
            "Verification of {}: {status_str}",
            report.dest_root.display()
        ));
        let _ = self.term.write_line(&format!(
            "  Entries checked: {}",
            Self::format_number(report.entries_checked)
        ));

        if !report.issues.is_empty() {
            let _ = self.term.write_line("");
            let _ = self.term.write_line("Issues:");
            for issue in &report.issues {
                let _ = self.term.write_line(&format!("  {issue}"));
            }
        }

        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:#}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:#}"));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use modstrap_core::RelPath;

    #[test]
    fn test_format_size() {
        assert_eq!(HumanFormatter::format_size(0), "0 B");
        assert_eq!(HumanFormatter::format_size(1023), "1023 B");
        assert_eq!(HumanFormatter::format_size(1536), "1.5 KB");
        assert_eq!(HumanFormatter::format_size(2 * 1024 * 1024), "2.0 MB");
        assert_eq!(HumanFormatter::format_size(1024 * 1024 * 1024), "1.0 GB");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(HumanFormatter::format_number(0), "0");
        assert_eq!(HumanFormatter::format_number(999), "999");
        assert_eq!(HumanFormatter::format_number(1000), "1,000");
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_display_path() {
        let root = ManifestEntry {
            path: RelPath::root(),
            kind: EntryKind::Directory,
            size: 0,
        };
        let file = ManifestEntry {
            path: RelPath::new("sub/b.yml").unwrap(),
            kind: EntryKind::File,
            size: 4,
        };
        assert_eq!(HumanFormatter::display_path("module", &root), "module/");
        assert_eq!(HumanFormatter::display_path("module", &file), "module/sub/b.yml");
    }
}
