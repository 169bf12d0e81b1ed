use crate::output_utils;
use std::process::ExitCode;
use std::process::Termination;

/// How a command finished. `main` returns this directly, so writing the
/// output and choosing the exit code happen in `Termination::report`.
#[derive(Debug, PartialEq)]
pub(crate) enum CommandResult {
    /// Rewritten documents, destined for stdout.
    Output(String),

    /// A message for stderr; the process exits non-zero.
    Failed(String),
}

impl CommandResult {
    pub fn failure(fmt_args: std::fmt::Arguments<'_>) -> Self {
        Self::Failed(format!("{} {fmt_args}", output_utils::RED_X))
    }
}

impl Termination for CommandResult {
    fn report(self) -> ExitCode {
        match self {
            Self::Output(stdout) => {
                println!("{stdout}");
                ExitCode::SUCCESS
            },
            Self::Failed(stderr) => {
                eprintln!("{stderr}");
                ExitCode::FAILURE
            },
        }
    }
}
