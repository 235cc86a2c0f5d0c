//! Directory tree traversal, in-memory capture and replication.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::file::FileRecord;
use crate::report::{ReportRead, ReportReadBuilder};
use crate::spec::{EnumReadPatternScope, RecordError, SpecReadOptions};
use crate::util::{
    TypeReadPatternSeq, absolutize_path, calculate_worker_limit, derive_base_name,
    derive_destination_path, derive_relative_key, should_ignore_by_patterns,
};

#[derive(Debug)]
struct SpecDirEntry {
    path_entry: PathBuf,
    name_entry: OsString,
}

#[derive(Debug)]
struct SpecReadContext {
    path_dir_root: PathBuf,
    spec_pats_ignore: Option<TypeReadPatternSeq>,
    rule_pattern_scope: EnumReadPatternScope,
    builder_report: ReportReadBuilder,
    l_subdirs: Vec<PathBuf>,
    l_files_planned: Vec<PathBuf>,
}

/// Snapshot of every file and subdirectory below one root.
///
/// Built in one eager pass by [`DirectoryRecord::read`]; immutable afterwards.
///
/// Walk order is depth-first. Inside each directory, entries are sorted by
/// file name; the directory's files come first, then each subdirectory is
/// recorded and descended into. Symlinks and special files are skipped.
#[derive(Debug, Clone)]
pub struct DirectoryRecord {
    name_base: String,
    path_abs: PathBuf,
    files: Vec<FileRecord>,
    l_subdirs: Vec<PathBuf>,
    report: ReportRead,
}

impl DirectoryRecord {
    /// Read the tree rooted at `path` with [`SpecReadOptions::default`].
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, RecordError> {
        Self::read_with_options(path, &SpecReadOptions::default())
    }

    /// Read the tree rooted at `path`.
    ///
    /// Either the whole tree is captured or an error is returned; the root is
    /// checked before any file content is read.
    pub fn read_with_options<P: AsRef<Path>>(
        path: P,
        spec_read_options: &SpecReadOptions,
    ) -> Result<Self, RecordError> {
        let spec_pats_ignore = TypeReadPatternSeq::from_raw(
            spec_read_options.patterns_ignore.as_deref(),
            spec_read_options.rule_pattern,
        )?;

        let path_dir_input = path.as_ref();
        let Ok(path_dir_root) = absolutize_path(path_dir_input) else {
            return Err(RecordError::NotADirectory {
                path: path_dir_input.to_path_buf(),
            });
        };
        if !fs::metadata(&path_dir_root).is_ok_and(|m| m.is_dir()) {
            return Err(RecordError::NotADirectory {
                path: path_dir_root,
            });
        }

        let mut spec_read_ctx = SpecReadContext {
            path_dir_root: path_dir_root.clone(),
            spec_pats_ignore,
            rule_pattern_scope: spec_read_options.rule_pattern_scope,
            builder_report: ReportReadBuilder::default(),
            l_subdirs: Vec::new(),
            l_files_planned: Vec::new(),
        };
        walk_directory(&path_dir_root, &mut spec_read_ctx)?;

        let n_workers_max = calculate_worker_limit(spec_read_options.num_workers_max);
        let l_files_planned = std::mem::take(&mut spec_read_ctx.l_files_planned);
        let files = read_planned_files(
            l_files_planned,
            n_workers_max,
            &mut spec_read_ctx.builder_report,
        )?;
        for file_record in &files {
            spec_read_ctx
                .builder_report
                .add_read(file_record.len() as u64);
        }

        let report = spec_read_ctx.builder_report.build();
        info!(
            root = %path_dir_root.display(),
            n_files = report.cnt_read,
            n_dirs = report.cnt_dirs,
            n_bytes = report.cnt_bytes,
            n_ignored = report.cnt_ignored,
            n_skipped = report.cnt_skipped,
            "directory read"
        );

        Ok(Self {
            name_base: derive_base_name(&path_dir_root),
            path_abs: path_dir_root,
            files,
            l_subdirs: spec_read_ctx.l_subdirs,
            report,
        })
    }

    /// Recreate the captured tree under `new_root`.
    ///
    /// Creates `new_root` and every recorded subdirectory, then writes each
    /// file, overwriting collisions. Entries already under `new_root` that the
    /// record does not name are left alone. Stops at the first failure without
    /// rolling back what was already written.
    pub fn copy_to<P: AsRef<Path>>(&self, new_root: P) -> Result<(), RecordError> {
        let path_dir_dst = new_root.as_ref();
        fs::create_dir_all(path_dir_dst).map_err(|e| RecordError::write(path_dir_dst, e))?;

        for path_subdir_src in &self.l_subdirs {
            let path_subdir_dst = self.rebase(path_subdir_src, path_dir_dst)?;
            fs::create_dir_all(&path_subdir_dst)
                .map_err(|e| RecordError::write(&path_subdir_dst, e))?;
        }

        for file_record in &self.files {
            let path_file_dst = self.rebase(file_record.absolute_path(), path_dir_dst)?;
            file_record.copy_to(&path_file_dst)?;
        }

        info!(
            root = %self.path_abs.display(),
            dst = %path_dir_dst.display(),
            n_files = self.files.len(),
            n_dirs = self.l_subdirs.len(),
            "directory copied"
        );
        Ok(())
    }

    pub fn base_name(&self) -> &str {
        &self.name_base
    }

    pub fn absolute_path(&self) -> &Path {
        &self.path_abs
    }

    /// Files in walk order.
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    /// Absolute subdirectory paths in walk order, root excluded.
    pub fn subdirectory_paths(&self) -> &[PathBuf] {
        &self.l_subdirs
    }

    pub fn report(&self) -> &ReportRead {
        &self.report
    }

    pub fn total_bytes(&self) -> u64 {
        self.report.cnt_bytes
    }

    fn rebase(&self, path_src: &Path, path_dir_dst: &Path) -> Result<PathBuf, RecordError> {
        derive_destination_path(path_src, &self.path_abs, path_dir_dst).ok_or_else(|| {
            RecordError::write(
                path_src,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("path is outside record root {}", self.path_abs.display()),
                ),
            )
        })
    }
}

fn walk_directory(
    path_dir: &Path,
    spec_read_ctx: &mut SpecReadContext,
) -> Result<(), RecordError> {
    debug!(path = %path_dir.display(), "listing directory");

    let mut l_dirs: Vec<SpecDirEntry> = Vec::new();
    let mut l_files: Vec<SpecDirEntry> = Vec::new();

    let iter_entries = fs::read_dir(path_dir).map_err(|e| RecordError::read(path_dir, e))?;
    for _entry_res in iter_entries {
        let entry = _entry_res.map_err(|e| RecordError::read(path_dir, e))?;
        let path_entry = entry.path();
        let cfg_file_type = entry
            .file_type()
            .map_err(|e| RecordError::read(&path_entry, e))?;

        let spec_entry = SpecDirEntry {
            path_entry,
            name_entry: entry.file_name(),
        };
        if cfg_file_type.is_symlink() {
            warn!(path = %spec_entry.path_entry.display(), "symlink skipped");
            spec_read_ctx.builder_report.add_skipped(format!(
                "Symlink skipped: {}",
                spec_entry.path_entry.display()
            ));
        } else if cfg_file_type.is_dir() {
            l_dirs.push(spec_entry);
        } else if cfg_file_type.is_file() {
            l_files.push(spec_entry);
        } else {
            warn!(path = %spec_entry.path_entry.display(), "special file skipped");
            spec_read_ctx.builder_report.add_skipped(format!(
                "Special file skipped: {}",
                spec_entry.path_entry.display()
            ));
        }
    }

    l_dirs.sort_by(|a, b| a.name_entry.cmp(&b.name_entry));
    l_files.sort_by(|a, b| a.name_entry.cmp(&b.name_entry));

    for _file_entry in l_files {
        spec_read_ctx.builder_report.add_scanned();
        let c_key = match spec_read_ctx.rule_pattern_scope {
            EnumReadPatternScope::RelativePath => {
                derive_relative_key(&_file_entry.path_entry, &spec_read_ctx.path_dir_root)
            }
            EnumReadPatternScope::AbsolutePath => {
                _file_entry.path_entry.to_string_lossy().to_string()
            }
        };
        if should_ignore_by_patterns(&c_key, spec_read_ctx.spec_pats_ignore.as_ref()) {
            debug!(path = %_file_entry.path_entry.display(), "file ignored");
            spec_read_ctx.builder_report.add_ignored();
            continue;
        }
        spec_read_ctx.l_files_planned.push(_file_entry.path_entry);
    }

    for _dir_entry in l_dirs {
        spec_read_ctx.builder_report.add_dir();
        spec_read_ctx.l_subdirs.push(_dir_entry.path_entry.clone());
        walk_directory(&_dir_entry.path_entry, spec_read_ctx)?;
    }

    Ok(())
}

/// Read planned files, keeping planned order for every worker count.
fn read_planned_files(
    l_files_planned: Vec<PathBuf>,
    n_workers_max: usize,
    builder_report: &mut ReportReadBuilder,
) -> Result<Vec<FileRecord>, RecordError> {
    if n_workers_max <= 1 || l_files_planned.len() <= 1 {
        return l_files_planned.iter().map(FileRecord::read).collect();
    }

    let thread_pool = ThreadPoolBuilder::new()
        .num_threads(n_workers_max)
        .build();
    let Ok(thread_pool) = thread_pool else {
        let c_warning = format!(
            "Failed to initialize thread pool (workers={n_workers_max}); fallback to serial read."
        );
        warn!("{c_warning}");
        builder_report.add_warning(c_warning);
        return l_files_planned.iter().map(FileRecord::read).collect();
    };

    thread_pool.install(|| l_files_planned.par_iter().map(FileRecord::read).collect())
}
