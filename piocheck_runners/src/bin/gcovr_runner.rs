//! Coverage runner: execute a test binary, then collect a per-test
//! gcovr JSON trace from the `.gcda` files it left behind.
//!
//! "Did the test pass" is a hard gate that propagates the binary's own
//! exit code; "did we record coverage" is best-effort, so a flaky gcovr
//! can neither mask nor fail an already-passing test stage.

use std::{path::PathBuf, process, process::Command, time::Duration};

use clap::Parser;
use log::{error, info, warn};
use piocheck::{
    exec::{self, WaitOutcome},
    report,
    sidecar::TestContext,
    Error, StdoutLogger,
};

#[derive(Parser, Debug)]
#[command(
    name = "gcovr_runner",
    about = "Runs a test executable and collects a per-test gcovr JSON trace"
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
    info!("Running test '{}'", ctx.test_name);

    let time_limit = opts.timeout.map(Duration::from_secs);
    let outcome = exec::wait_for(&mut Command::new(&opts.test_executable), time_limit)?;
    match outcome {
        WaitOutcome::Exited(0) => info!("Test '{}' finished successfully", ctx.test_name),
        WaitOutcome::Exited(code) => {
            error!("Test '{}' failed with code {code}", ctx.test_name);
            return Ok(code);
        }
        WaitOutcome::TimedOut => {
            error!("Test '{}' timed out", ctx.test_name);
            return Ok(1);
        }
    }

    info!("Running gcovr collection for '{}'", ctx.test_name);
    match collect_coverage(&ctx) {
        Ok(()) => info!("JSON trace file created for '{}'", ctx.test_name),
        // The test itself already passed, coverage loss is not worth failing the stage.
        Err(err) => warn!("gcovr collection failed for '{}': {err}", ctx.test_name),
    }
    Ok(0)
}

fn collect_coverage(ctx: &TestContext) -> Result<(), Error> {
    report::ensure_reports_dir()?;
    let trace = report::coverage_trace(&ctx.test_name);

    let mut cmd = Command::new("gcovr");
    cmd.arg(&ctx.build_dir)
        .arg("--json")
        .arg(&trace)
        .arg("--root")
        .arg(".");

    let outcome = exec::wait_for(&mut cmd, None)?;
    if outcome.success() {
        Ok(())
    } else {
        Err(Error::unknown(format!(
            "gcovr exited with code {}",
            outcome.exit_code()
        )))
    }
}
