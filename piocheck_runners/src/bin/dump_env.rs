//! Post-build action: snapshot the build environment to the
//! `env_vars.json` sidecar next to the just-built test executable.
//!
//! Best-effort by design: a failed snapshot is logged but never fails
//! a build that otherwise succeeded, so this always exits 0 once the
//! target path argument is present.

use std::{env, path::PathBuf, process};

use clap::Parser;
use log::{error, info};
use piocheck::{sidecar::EnvSnapshot, StdoutLogger};

#[derive(Parser, Debug)]
#[command(
    name = "dump_env",
    about = "Dumps the build environment variables to a JSON sidecar next to the test executable"
)]
struct Opt {
    /// Path of the just-built test executable
    test_executable: PathBuf,
}

fn main() {
    let opts = match Opt::try_parse() {
        Ok(opts) => opts,
        Err(err) => {
            // Usage and help go to stdout, the build orchestrator only scrapes that.
            println!("{err}");
            process::exit(i32::from(err.use_stderr()));
        }
    };
    if let Err(err) = StdoutLogger::register() {
        println!("{err}");
        process::exit(1);
    }

    let snapshot = EnvSnapshot::capture(env::vars());
    match snapshot.write_next_to(&opts.test_executable) {
        Ok(path) => info!("Environment variables dumped to {}", path.display()),
        Err(err) => error!("Failed to dump environment: {err}"),
    }
}
