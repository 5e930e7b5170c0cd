//! Memory-checker runner: execute a test binary under Valgrind
//! memcheck and gate the stage on the supervisor's verdict.
//!
//! Same shape as the sanitizer runner, but with a separate supervisor
//! binary and a split failure taxonomy: "valgrind is not installed" is
//! reported distinctly from "valgrind found problems".

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

/// Full leak checking, reachable-block reporting, origin tracking for
/// uninitialized reads, and a forced exit code 1 whenever memcheck
/// detected any error regardless of the wrapped binary's own code.
const MEMCHECK_ARGS: &[&str] = &[
    "--tool=memcheck",
    "--leak-check=full",
    "--show-reachable=yes",
    "--track-origins=yes",
    "--error-exitcode=1",
];

#[derive(Parser, Debug)]
#[command(
    name = "valgrind_runner",
    about = "Runs a test executable under Valgrind memcheck and fails the stage on any memory error"
)]
struct Opt {
    /// Path to the test executable to run
    test_executable: PathBuf,
    /// Kill the check if it runs longer than this many seconds
    #[arg(short, long, value_name = "SECONDS")]
    timeout: Option<u64>,
    /// Additionally write the machine-readable Valgrind XML report
    #[arg(long)]
    xml: bool,
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
    info!("Running Valgrind check for '{}'", ctx.test_name);

    // Resolve the supervisor before touching anything else, so a
    // missing installation never reads as "memory errors found".
    let valgrind = which::which("valgrind").map_err(|err| {
        Error::tool_not_found(format!(
            "'valgrind' not found, is it installed and in PATH? ({err})"
        ))
    })?;

    report::ensure_reports_dir()?;
    let log_path = report::memcheck_log(&ctx.test_name);
    let log_file = File::create(&log_path)?;

    // Memcheck prints its summary and errors to stderr; stdout stays live.
    let mut cmd = Command::new(valgrind);
    cmd.args(MEMCHECK_ARGS);
    if opts.xml {
        let xml_path = report::memcheck_xml(&ctx.test_name);
        cmd.arg("--xml=yes")
            .arg(format!("--xml-file={}", xml_path.display()));
    }
    cmd.arg(&opts.test_executable).stderr(Stdio::from(log_file));

    let time_limit = opts.timeout.map(Duration::from_secs);
    let outcome = exec::wait_for(&mut cmd, time_limit)?;
    if outcome.success() {
        info!("Valgrind check for '{}' passed", ctx.test_name);
        return Ok(0);
    }

    if outcome == WaitOutcome::TimedOut {
        error!("Valgrind check for '{}' timed out", ctx.test_name);
    } else {
        error!("Valgrind check for '{}' failed", ctx.test_name);
        error!("Memory errors detected, check log: {}", log_path.display());
    }
    Ok(1)
}
