//! Shared plumbing for the `piocheck` native-test analysis runners.
//!
//! A PlatformIO-style build writes an `env_vars.json` sidecar next to
//! each test executable it produces (via the `dump_env` post-build
//! action). The runner binaries in `piocheck_runners` later resolve the
//! currently running test name from that sidecar and wrap the
//! executable in an analysis tool (gcovr, ASan/UBSan, Valgrind),
//! mapping the tool's verdict onto the exit code the build system
//! expects.
//!
//! This crate holds everything the runners share:
//!
//! - [`sidecar`] — writing and resolving the `env_vars.json` snapshot
//! - [`report`] — per-test report artifact naming under `.pio/tests/`
//! - [`exec`] — blocking child-process execution with optional time limits
//! - [`Error`] and [`StdoutLogger`] — the common error and logging plumbing

pub mod exec;
pub mod report;
pub mod sidecar;

mod error;
mod logger;

pub use error::Error;
pub use logger::{StdoutLogger, STDOUT_LOGGER};
