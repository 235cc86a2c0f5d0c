//! Read report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

/// Aggregate counters and diagnostics for one directory read.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportRead {
    /// Total regular-file entries seen by the walk.
    pub cnt_scanned: u64,
    /// Number of files whose content was read into memory.
    pub cnt_read: u64,
    /// Number of files dropped by ignore patterns.
    pub cnt_ignored: u64,
    /// Number of symlinks and special files skipped.
    pub cnt_skipped: u64,
    /// Number of subdirectories recorded below the root.
    pub cnt_dirs: u64,
    /// Total bytes held in memory.
    pub cnt_bytes: u64,
    /// Non-fatal warnings collected during traversal.
    pub warnings: Vec<String>,
}

impl ReportRead {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_read".to_string(), self.cnt_read);
        dict_counts.insert("cnt_ignored".to_string(), self.cnt_ignored);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_dirs".to_string(), self.cnt_dirs);
        dict_counts.insert("cnt_bytes".to_string(), self.cnt_bytes);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} scanned={} read={} ignored={} skipped={} dirs={} bytes={} warnings={}",
            self.cnt_scanned,
            self.cnt_read,
            self.cnt_ignored,
            self.cnt_skipped,
            self.cnt_dirs,
            self.cnt_bytes,
            self.warning_count()
        )
    }
}

impl fmt::Display for ReportRead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[READ]"))
    }
}

/// Mutable accumulator filled in while walking a tree.
#[derive(Debug, Default, Clone)]
pub struct ReportReadBuilder {
    cnt_scanned: u64,
    cnt_read: u64,
    cnt_ignored: u64,
    cnt_skipped: u64,
    cnt_dirs: u64,
    cnt_bytes: u64,
    warnings: Vec<String>,
}

impl ReportReadBuilder {
    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    pub fn add_ignored(&mut self) {
        self.cnt_ignored += 1;
    }

    pub fn add_dir(&mut self) {
        self.cnt_dirs += 1;
    }

    /// Count one file read with `n_bytes` of content.
    pub fn add_read(&mut self, n_bytes: u64) {
        self.cnt_read += 1;
        self.cnt_bytes += n_bytes;
    }

    /// Count one skipped entry and keep the reason.
    pub fn add_skipped(&mut self, warning: String) {
        self.cnt_skipped += 1;
        self.warnings.push(warning);
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportRead {
        ReportRead {
            cnt_scanned: self.cnt_scanned,
            cnt_read: self.cnt_read,
            cnt_ignored: self.cnt_ignored,
            cnt_skipped: self.cnt_skipped,
            cnt_dirs: self.cnt_dirs,
            cnt_bytes: self.cnt_bytes,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ReportRead, ReportReadBuilder};

    #[test]
    fn report_read_to_dict_and_format() {
        let report = ReportRead {
            cnt_scanned: 6,
            cnt_read: 4,
            cnt_ignored: 2,
            cnt_skipped: 1,
            cnt_dirs: 3,
            cnt_bytes: 120,
            warnings: vec!["w".to_string()],
        };

        let dict_counts = report.to_dict();
        assert_eq!(dict_counts["cnt_scanned"], 6);
        assert_eq!(dict_counts["cnt_read"], 4);
        assert_eq!(dict_counts["cnt_ignored"], 2);
        assert_eq!(dict_counts["cnt_skipped"], 1);
        assert_eq!(dict_counts["cnt_dirs"], 3);
        assert_eq!(dict_counts["cnt_bytes"], 120);
        assert_eq!(dict_counts["cnt_warnings"], 1);

        let txt = report.format("[READ]");
        assert_eq!(
            txt,
            "[READ] scanned=6 read=4 ignored=2 skipped=1 dirs=3 bytes=120 warnings=1"
        );
        assert_eq!(report.to_string(), txt);
    }

    #[test]
    fn report_builder_accumulates() {
        let mut builder = ReportReadBuilder::default();
        builder.add_scanned();
        builder.add_scanned();
        builder.add_read(5);
        builder.add_ignored();
        builder.add_dir();
        builder.add_skipped("Symlink skipped: /tmp/x".to_string());

        let report = builder.build();
        assert_eq!(report.cnt_scanned, 2);
        assert_eq!(report.cnt_read, 1);
        assert_eq!(report.cnt_bytes, 5);
        assert_eq!(report.cnt_ignored, 1);
        assert_eq!(report.cnt_dirs, 1);
        assert_eq!(report.cnt_skipped, 1);
        assert_eq!(report.warnings, vec!["Symlink skipped: /tmp/x".to_string()]);
    }
}
