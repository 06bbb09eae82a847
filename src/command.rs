use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::CommandError;

/// Run `program` with `args`, optionally inside `dir`, and return its stdout.
///
/// The working directory is set on the child only; the current process
/// directory is never touched.
pub fn run<S: AsRef<str>>(
    program: &str,
    args: &[S],
    dir: Option<&Path>,
) -> Result<String, CommandError> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();

    let mut command = Command::new(program);
    command.args(&args);
    if let Some(dir) = dir {
        command.current_dir(dir);
    }

    debug!(program, ?args, ?dir, "running command");

    let output = command.output().map_err(|source| CommandError::Spawn {
        program: program.to_string(),
        source,
    })?;

    if !output.status.success() {
        return Err(CommandError::Failed {
            program: program.to_string(),
            args: args.join(" "),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
