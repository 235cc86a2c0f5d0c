use std::io;
use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobMatcher};
use regex::Regex;

use crate::spec::{EnumReadPatternMode, RecordError};

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

#[derive(Debug, Clone)]
pub(crate) enum TypeReadPatternSeq {
    Literal(Vec<String>),
    Glob(Vec<GlobMatcher>),
    Regex(Vec<Regex>),
}

impl TypeReadPatternSeq {
    /// Compile raw patterns; `None` or an empty list disables matching.
    pub(crate) fn from_raw(
        patterns: Option<&[String]>,
        rule_pattern: EnumReadPatternMode,
    ) -> Result<Option<Self>, RecordError> {
        let Some(patterns) = patterns else {
            return Ok(None);
        };
        if patterns.is_empty() {
            return Ok(None);
        }

        match rule_pattern {
            EnumReadPatternMode::Literal => Ok(Some(Self::Literal(patterns.to_vec()))),
            EnumReadPatternMode::Glob => {
                let mut l_glob = Vec::with_capacity(patterns.len());
                for pattern in patterns {
                    let matcher = Glob::new(pattern)
                        .map_err(|e| RecordError::InvalidPattern {
                            pattern: pattern.clone(),
                            message: e.to_string(),
                        })?
                        .compile_matcher();
                    l_glob.push(matcher);
                }
                Ok(Some(Self::Glob(l_glob)))
            }
            EnumReadPatternMode::Regex => {
                let mut l_regex = Vec::with_capacity(patterns.len());
                for pattern in patterns {
                    let regex = Regex::new(pattern).map_err(|e| RecordError::InvalidPattern {
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    })?;
                    l_regex.push(regex);
                }
                Ok(Some(Self::Regex(l_regex)))
            }
        }
    }

    pub(crate) fn is_match(&self, value: &str) -> bool {
        match self {
            Self::Literal(v) => v.iter().any(|p| value.contains(p.as_str())),
            Self::Glob(v) => v.iter().any(|p| p.is_match(value)),
            Self::Regex(v) => v.iter().any(|p| p.is_match(value)),
        }
    }
}

pub(crate) fn should_ignore_by_patterns(value: &str, patterns: Option<&TypeReadPatternSeq>) -> bool {
    patterns.is_some_and(|p| p.is_match(value))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

/// Collapse `.` and `..` without touching the filesystem.
fn _normalize_lexically(path: &Path) -> PathBuf {
    let mut path_normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                path_normalized.pop();
            }
            _ => path_normalized.push(component.as_os_str()),
        }
    }
    path_normalized
}

/// Absolute, lexically normalized form of `path`. Symlinks are not resolved.
///
/// An empty path names nothing and fails with [`io::ErrorKind::NotFound`].
pub(crate) fn absolutize_path(path: &Path) -> io::Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "empty path"));
    }
    if path.is_absolute() {
        return Ok(_normalize_lexically(path));
    }
    Ok(_normalize_lexically(&std::env::current_dir()?.join(path)))
}

/// Final path component as a string, empty for filesystem roots.
pub(crate) fn derive_base_name(path: &Path) -> String {
    path.file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Root-relative path with `/` separators, used for ignore matching.
pub(crate) fn derive_relative_key(path: &Path, path_dir_root: &Path) -> String {
    let path_rel = path.strip_prefix(path_dir_root).unwrap_or(path);
    path_rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Rebase `path_src` from `path_dir_src` onto `path_dir_dst`.
///
/// Only a leading component-wise prefix is replaced; later occurrences of the
/// root's text inside `path_src` are kept as-is. Returns `None` if `path_src`
/// does not live under `path_dir_src`.
///
/// # Examples
/// ```ignore
/// use std::path::Path;
/// let path_dst = derive_destination_path(
///     Path::new("/a/b/sub/a/b/file.txt"),
///     Path::new("/a/b"),
///     Path::new("/x/y"),
/// );
/// assert_eq!(path_dst.unwrap(), Path::new("/x/y/sub/a/b/file.txt"));
/// ```
pub(crate) fn derive_destination_path(
    path_src: &Path,
    path_dir_src: &Path,
    path_dir_dst: &Path,
) -> Option<PathBuf> {
    let path_rel = path_src.strip_prefix(path_dir_src).ok()?;
    if path_rel.as_os_str().is_empty() {
        return Some(path_dir_dst.to_path_buf());
    }
    Some(path_dir_dst.join(path_rel))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Workers

pub(crate) fn calculate_worker_limit(num_workers_max: Option<usize>) -> usize {
    let n_cpu = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);

    match num_workers_max {
        Some(n) => n.clamp(1, n_cpu),
        None => n_cpu.clamp(1, 8),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    #[test]
    fn test_normalize_lexically_collapses_dots() {
        assert_eq!(
            _normalize_lexically(Path::new("/foo/./bar/../baz")),
            PathBuf::from("/foo/baz")
        );
        assert_eq!(
            _normalize_lexically(Path::new("/../../foo")),
            PathBuf::from("/foo")
        );
    }

    #[test]
    fn test_absolutize_relative_path_uses_cwd() {
        let path_cwd = std::env::current_dir().expect("cwd");
        let path_abs = absolutize_path(Path::new("some/./dir")).expect("absolutize");
        assert!(path_abs.is_absolute());
        assert_eq!(path_abs, path_cwd.join("some").join("dir"));
    }

    #[test]
    fn test_absolutize_empty_path_is_not_found() {
        let err = absolutize_path(Path::new("")).expect_err("empty path must fail");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_derive_destination_path_replaces_only_leading_root() {
        let path_dst = derive_destination_path(
            Path::new("/a/b/sub/a/b/file.txt"),
            Path::new("/a/b"),
            Path::new("/x/y"),
        );
        assert_eq!(path_dst, Some(PathBuf::from("/x/y/sub/a/b/file.txt")));
    }

    #[test]
    fn test_derive_destination_path_requires_component_prefix() {
        // `/a/bc` shares text with `/a/b` but is not below it.
        assert_eq!(
            derive_destination_path(Path::new("/a/bc/f.txt"), Path::new("/a/b"), Path::new("/x")),
            None
        );
        assert_eq!(
            derive_destination_path(Path::new("/a/b"), Path::new("/a/b"), Path::new("/x")),
            Some(PathBuf::from("/x"))
        );
    }

    #[test]
    fn test_derive_relative_key_uses_forward_slashes() {
        let path_root = Path::new("/data/root");
        let path_file = path_root.join("sub").join("deep").join("f.txt");
        assert_eq!(derive_relative_key(&path_file, path_root), "sub/deep/f.txt");
    }

    #[test]
    fn test_derive_base_name_of_root_is_empty() {
        assert_eq!(derive_base_name(Path::new("/")), "");
        assert_eq!(derive_base_name(Path::new("/tmp/abc")), "abc");
    }

    #[test]
    fn test_pattern_modes_match_relative_keys() {
        let globs = TypeReadPatternSeq::from_raw(
            Some(&["*.pyc".to_string()]),
            EnumReadPatternMode::Glob,
        )
        .expect("glob")
        .expect("some");
        assert!(globs.is_match("pkg/__pycache__/mod.pyc"));
        assert!(!globs.is_match("pkg/mod.py"));

        let regexes = TypeReadPatternSeq::from_raw(
            Some(&[r"\.log$".to_string()]),
            EnumReadPatternMode::Regex,
        )
        .expect("regex")
        .expect("some");
        assert!(regexes.is_match("logs/run.log"));
        assert!(!regexes.is_match("logs/run.log.txt"));

        let literals = TypeReadPatternSeq::from_raw(
            Some(&["secret".to_string()]),
            EnumReadPatternMode::Literal,
        )
        .expect("literal")
        .expect("some");
        assert!(literals.is_match("conf/my_secret.toml"));
        assert!(!should_ignore_by_patterns("conf/public.toml", Some(&literals)));
        assert!(!should_ignore_by_patterns("anything", None));
    }

    #[test]
    fn test_empty_pattern_list_disables_matching() {
        let patterns =
            TypeReadPatternSeq::from_raw(Some(&[]), EnumReadPatternMode::Regex).expect("empty");
        assert!(patterns.is_none());
    }

    #[test]
    fn test_invalid_patterns_rejected() {
        let err = TypeReadPatternSeq::from_raw(Some(&["(".to_string()]), EnumReadPatternMode::Regex)
            .expect_err("invalid regex");
        assert!(matches!(err, RecordError::InvalidPattern { .. }));

        let err = TypeReadPatternSeq::from_raw(Some(&["[".to_string()]), EnumReadPatternMode::Glob)
            .expect_err("invalid glob");
        assert!(matches!(err, RecordError::InvalidPattern { .. }));
    }

    #[test]
    fn test_calculate_worker_limit_is_at_least_one() {
        assert_eq!(calculate_worker_limit(Some(0)), 1);
        assert_eq!(calculate_worker_limit(Some(1)), 1);
        assert!(calculate_worker_limit(None) >= 1);
        assert!(calculate_worker_limit(None) <= 8);
    }
}
