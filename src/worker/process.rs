use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use std::collections::HashMap;
use std::process::{Command, Stdio};

/// Runs an external command and hands back what it printed on stdout
pub trait ProcessRunner {
    /// `argv[0]` is the program; the child sees only `env`
    fn run(&self, argv: &[String], env: &HashMap<String, String>) -> Result<String>;
}

impl<T: ProcessRunner + ?Sized> ProcessRunner for &T {
    fn run(&self, argv: &[String], env: &HashMap<String, String>) -> Result<String> {
        (**self).run(argv, env)
    }
}

/// [`ProcessRunner`] backed by `std::process::Command`.
///
/// Blocks until the child exits. A non-zero exit status is logged but not
/// treated as an error; callers decide from the output.
pub struct SubprocessRunner;

impl SubprocessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SubprocessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner for SubprocessRunner {
    fn run(&self, argv: &[String], env: &HashMap<String, String>) -> Result<String> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| anyhow!("Cannot run an empty command"))?;

        debug!("Running {:?} with {} environment variables", argv, env.len());
        let output = Command::new(program)
            .args(args)
            .env_clear()
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .context(format!("Failed to execute build command: {:?}", argv))?;

        if !output.status.success() {
            warn!("Build command {} exited with {}", program, output.status);
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
