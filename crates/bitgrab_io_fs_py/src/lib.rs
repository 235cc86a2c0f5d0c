use std::path::PathBuf;

use bitgrab_io_fs::version::C_PKG_VERSION;
use bitgrab_io_fs::{
    DirectoryRecord, EnumReadPatternMode, EnumReadPatternScope, EnumRecordErrorKind, FileRecord,
    RecordError, SpecReadOptions, version_summary,
};
use pyo3::exceptions::{PyNotADirectoryError, PyOSError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "bitgrab.fs.record.v1";
const C_BRIDGE_TRANSPORT: &str = "rust_native";

fn map_record_error(exception: RecordError) -> PyErr {
    let message = exception.to_string();
    match exception.kind() {
        EnumRecordErrorKind::NotADirectory => PyNotADirectoryError::new_err(message),
        EnumRecordErrorKind::ReadFailure | EnumRecordErrorKind::WriteFailure => {
            PyOSError::new_err(message)
        }
        EnumRecordErrorKind::InvalidPattern => PyValueError::new_err(message),
    }
}

fn parse_rule_pattern(value: &str) -> PyResult<EnumReadPatternMode> {
    match value {
        "glob" => Ok(EnumReadPatternMode::Glob),
        "regex" => Ok(EnumReadPatternMode::Regex),
        "literal" => Ok(EnumReadPatternMode::Literal),
        _ => Err(PyValueError::new_err(format!(
            "Invalid pattern strategy: `{value}`. Expected one of: ['glob', 'regex', 'literal']"
        ))),
    }
}

/// Data content and metadata of a single file.
#[pyclass(name = "File", frozen)]
#[derive(Debug, Clone)]
struct PyFile {
    inner: FileRecord,
}

#[pymethods]
impl PyFile {
    #[new]
    fn new(py: Python<'_>, filename: PathBuf) -> PyResult<Self> {
        let inner = py
            .allow_threads(|| FileRecord::read(&filename))
            .map_err(map_record_error)?;
        Ok(Self { inner })
    }

    #[getter]
    fn basename(&self) -> String {
        self.inner.base_name().to_string()
    }

    #[getter]
    fn filename(&self) -> String {
        self.inner.absolute_path().to_string_lossy().to_string()
    }

    #[getter]
    fn data<'py>(&self, py: Python<'py>) -> Bound<'py, PyBytes> {
        PyBytes::new(py, self.inner.content())
    }

    /// Write the data content to `new_filename`, overwriting it if present.
    fn copy_to(&self, py: Python<'_>, new_filename: PathBuf) -> PyResult<()> {
        py.allow_threads(|| self.inner.copy_to(&new_filename))
            .map_err(map_record_error)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "File(filename={:?}, size={})",
            self.inner.absolute_path().display().to_string(),
            self.inner.len()
        )
    }
}

/// Data content of every file below a directory.
///
/// `ignore` patterns are matched against each file's absolute path, so a
/// pattern may also match text in the parent directories of `dirname`.
#[pyclass(name = "Dir", frozen)]
#[derive(Debug)]
struct PyDir {
    inner: DirectoryRecord,
    /// Built once; content buffers are shared with `inner`.
    files: Vec<Py<PyFile>>,
}

#[pymethods]
impl PyDir {
    #[new]
    #[pyo3(signature = (dirname, ignore = None, rule_pattern = "regex", num_workers_max = None))]
    fn new(
        py: Python<'_>,
        dirname: PathBuf,
        ignore: Option<Vec<String>>,
        rule_pattern: &str,
        num_workers_max: Option<usize>,
    ) -> PyResult<Self> {
        let spec_read_options = SpecReadOptions {
            patterns_ignore: ignore,
            rule_pattern: parse_rule_pattern(rule_pattern)?,
            rule_pattern_scope: EnumReadPatternScope::AbsolutePath,
            num_workers_max,
        };
        let inner = py
            .allow_threads(|| DirectoryRecord::read_with_options(&dirname, &spec_read_options))
            .map_err(map_record_error)?;
        let files = inner
            .files()
            .iter()
            .map(|f| Py::new(py, PyFile { inner: f.clone() }))
            .collect::<PyResult<Vec<_>>>()?;
        Ok(Self { inner, files })
    }

    #[getter]
    fn basename(&self) -> String {
        self.inner.base_name().to_string()
    }

    #[getter]
    fn dirname(&self) -> String {
        self.inner.absolute_path().to_string_lossy().to_string()
    }

    #[getter]
    fn files(&self, py: Python<'_>) -> Vec<Py<PyFile>> {
        self.files.iter().map(|f| f.clone_ref(py)).collect()
    }

    #[getter]
    fn subdirnames(&self) -> Vec<String> {
        self.inner
            .subdirectory_paths()
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect()
    }

    #[getter]
    fn report(&self) -> String {
        self.inner.report().to_string()
    }

    /// Recreate the directory under `new_dirname`, overwriting colliding files.
    fn copy_to(&self, py: Python<'_>, new_dirname: PathBuf) -> PyResult<()> {
        py.allow_threads(|| self.inner.copy_to(&new_dirname))
            .map_err(map_record_error)
    }

    fn __repr__(&self) -> String {
        format!(
            "Dir(dirname={:?}, files={}, subdirs={})",
            self.inner.absolute_path().display().to_string(),
            self.inner.files().len(),
            self.inner.subdirectory_paths().len()
        )
    }
}

/// Print information about the version of the extension.
#[pyfunction(name = "show_config")]
fn show_config_py(py: Python<'_>) -> PyResult<()> {
    let builtins = PyModule::import(py, "builtins")?;
    builtins.getattr("print")?.call1((version_summary(),))?;
    Ok(())
}

#[pyfunction(name = "version_summary")]
fn version_summary_py() -> String {
    version_summary()
}

#[pymodule]
fn _bitgrab_io_fs_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyFile>()?;
    module.add_class::<PyDir>()?;
    module.add_function(wrap_pyfunction!(show_config_py, module)?)?;
    module.add_function(wrap_pyfunction!(version_summary_py, module)?)?;
    module.add("__version__", C_PKG_VERSION)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
