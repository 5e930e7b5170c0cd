//! The `env_vars.json` sidecar: a snapshot of the build environment,
//! written once next to the test executable after the build, read by
//! every runner that later wraps that executable.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::Value;

use crate::Error;

/// File name of the snapshot sidecar, colocated with the test executable.
pub const ENV_VARS_FILE: &str = "env_vars.json";

/// Sidecar key holding the name of the currently running test.
pub const TEST_NAME_KEY: &str = "PIOTEST_RUNNING_NAME";

/// Returns the sidecar path for a test executable, always
/// `<dir-of-executable>/env_vars.json` regardless of the basename.
#[must_use]
pub fn sidecar_path(test_executable: &Path) -> PathBuf {
    build_dir(test_executable).join(ENV_VARS_FILE)
}

fn build_dir(test_executable: &Path) -> &Path {
    test_executable.parent().unwrap_or_else(|| Path::new(""))
}

/// A snapshot of the build environment variables, ready to be written
/// as the sidecar.
///
/// Keys starting with an underscore are build-internal and never make
/// it into the snapshot. All values are plain strings; the consumers
/// only ever need a handful of scalar fields.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture a snapshot from an iterator of key/value pairs,
    /// dropping every underscore-prefixed key.
    pub fn capture<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .filter(|(key, _)| !key.starts_with('_'))
            .collect();
        Self { vars }
    }

    /// Look up a captured variable.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Number of captured variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Serialize as indented JSON and write the sidecar next to
    /// `test_executable`, overwriting any previous snapshot.
    ///
    /// # Errors
    /// If serialization or the file write fails.
    pub fn write_next_to(&self, test_executable: &Path) -> Result<PathBuf, Error> {
        let path = sidecar_path(test_executable);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        Ok(path)
    }
}

/// The two values every runner needs: which test is currently running
/// and where the build artifacts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestContext {
    /// Name of the currently running test, used to name report artifacts
    pub test_name: String,
    /// Directory holding the test executable and its sidecar
    pub build_dir: PathBuf,
}

impl TestContext {
    /// Resolve the context for a test executable from its sidecar.
    ///
    /// Either both fields are available, or this errors out - there is
    /// no partial success a runner would have to handle.
    ///
    /// # Errors
    /// [`Error::Sidecar`] if the sidecar is missing, unreadable or not
    /// valid JSON, [`Error::KeyNotFound`] if [`TEST_NAME_KEY`] is
    /// absent, not a string, or empty.
    pub fn resolve(test_executable: &Path) -> Result<Self, Error> {
        let build_dir = build_dir(test_executable).to_path_buf();
        let path = build_dir.join(ENV_VARS_FILE);

        let raw = fs::read_to_string(&path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                Error::sidecar(format!(
                    "environment file not found at {}, make sure dump_env ran as a post-build action",
                    path.display()
                ))
            } else {
                Error::sidecar(format!("failed to read {}: {err}", path.display()))
            }
        })?;
        let vars: Value = serde_json::from_str(&raw)
            .map_err(|err| Error::sidecar(format!("invalid JSON in {}: {err}", path.display())))?;

        let test_name = vars
            .get(TEST_NAME_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default();
        if test_name.is_empty() {
            return Err(Error::key_not_found(format!(
                "'{TEST_NAME_KEY}' not found in {}",
                path.display()
            )));
        }

        Ok(Self {
            test_name: test_name.to_string(),
            build_dir,
        })
    }
}
