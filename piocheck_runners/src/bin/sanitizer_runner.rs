//! Sanitizer runner: execute an ASan/UBSan-instrumented test binary
//! and gate the stage on the sanitizer verdict.
//!
//! The instrumented binary is the only process involved: `ASAN_OPTIONS`
//! makes the runtime exit non-zero whenever it reported anything, and
//! its stderr goes to a per-test log, so one execution yields both the
//! pass/fail signal and the forensic artifact.

use std::{
    fs::File,
    path::PathBuf,
    process,
    process::{Command, Stdio},
    time::Duration,
};

use clap::Parser;
use log::{error, info};
use piocheck::{
    exec::{self, WaitOutcome},
    report,
    sidecar::TestContext,
    Error, StdoutLogger,
};

/// `detect_leaks=1` turns LeakSanitizer on; `exitcode=1` forces a
/// non-zero process exit whenever the runtime detected any reportable
/// error, so "no explicit crash" still fails the stage.
const ASAN_OPTIONS: &str = "detect_leaks=1:exitcode=1";

#[derive(Parser, Debug)]
#[command(
    name = "sanitizer_runner",
    about = "Runs a test executable under ASan/UBSan and fails the stage on any sanitizer report"
)]
struct Opt {
    /// Path to the test executable to run
    test_executable: PathBuf,
    /// Kill the test if it runs longer than this many seconds
    #[arg(short, long, value_name = "SECONDS")]
    timeout: Option<u64>,
}

fn main() {
    let opts = match Opt::try_parse() {
        Ok(opts) => opts,
        Err(err) => {
            println!("{err}");
            process::exit(i32::from(err.use_stderr()));
        }
    };
    if let Err(err) = StdoutLogger::register() {
        println!("{err}");
        process::exit(1);
    }

    match run(&opts) {
        Ok(code) => process::exit(code),
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    }
}

fn run(opts: &Opt) -> Result<i32, Error> {
    let ctx = TestContext::resolve(&opts.test_executable)?;
    info!("Running ASan/UBSan check for '{}'", ctx.test_name);

    report::ensure_reports_dir()?;
    let log_path = report::sanitizer_log(&ctx.test_name);
    let log_file = File::create(&log_path)?;

    // Sanitizer reports land on stderr; stdout stays live for the test's own output.
    let mut cmd = Command::new(&opts.test_executable);
    cmd.env("ASAN_OPTIONS", ASAN_OPTIONS)
        .stderr(Stdio::from(log_file));

    let time_limit = opts.timeout.map(Duration::from_secs);
    let outcome = exec::wait_for(&mut cmd, time_limit)?;
    if outcome.success() {
        info!("ASan/UBSan check for '{}' passed", ctx.test_name);
        return Ok(0);
    }

    if outcome == WaitOutcome::TimedOut {
        error!("ASan/UBSan check for '{}' timed out", ctx.test_name);
    } else {
        error!("ASan/UBSan check for '{}' failed", ctx.test_name);
        error!("Memory errors detected, check log: {}", log_path.display());
    }
    // The sanitizer-forced exit code only means "errors present", so a fixed 1 goes out.
    Ok(1)
}
