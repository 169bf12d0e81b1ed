mod cli;
mod command_result;
mod commands;
mod output_utils;
mod server_version;

use clap::Parser;
use cli::LogLevelChoice;
pub(crate) use cli::Cli;
pub(crate) use commands::RunnableCommand;
pub(crate) use command_result::CommandResult;

#[tokio::main(flavor = "multi_thread", worker_threads = 10)]
async fn main() -> CommandResult {
    let cli = Cli::parse();
    let env_log_level = std::env::var("LOG_LEVEL").ok();
    init_tracing(cli.log_level(env_log_level.as_deref()));

    cli.cmd.run().await
}

fn init_tracing(LogLevelChoice { level, warning }: LogLevelChoice) {
    // Rewritten documents go to stdout, so logs stay on stderr.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    log::trace!("Logging at `{level}`.");

    if let Some(warning) = warning {
        log::warn!("{warning}");
    }
}
