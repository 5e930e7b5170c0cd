//! Per-test report artifact naming under the shared reports directory.

use std::{fs, path::PathBuf};

use crate::Error;

/// Directory all per-test reports land in, relative to the project
/// root the runners are invoked from.
pub const REPORTS_DIR: &str = ".pio/tests";

/// Create the reports directory if it is not there yet and return it.
///
/// # Errors
/// If the directory cannot be created.
pub fn ensure_reports_dir() -> Result<PathBuf, Error> {
    let dir = PathBuf::from(REPORTS_DIR);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// gcovr JSON trace for one test.
#[must_use]
pub fn coverage_trace(test_name: &str) -> PathBuf {
    PathBuf::from(REPORTS_DIR).join(format!("{test_name}.json"))
}

/// ASan/UBSan stderr log for one test.
#[must_use]
pub fn sanitizer_log(test_name: &str) -> PathBuf {
    PathBuf::from(REPORTS_DIR).join(format!("asan_ubsan_{test_name}.log"))
}

/// Valgrind stderr log for one test.
#[must_use]
pub fn memcheck_log(test_name: &str) -> PathBuf {
    PathBuf::from(REPORTS_DIR).join(format!("memory_{test_name}.txt"))
}

/// Valgrind XML report for one test.
#[must_use]
pub fn memcheck_xml(test_name: &str) -> PathBuf {
    PathBuf::from(REPORTS_DIR).join(format!("valgrind_xml_{test_name}.xml"))
}
