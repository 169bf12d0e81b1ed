mod rewrite;

use crate::CommandResult;
use rewrite::RewriteCmd;

pub(crate) trait RunnableCommand: std::fmt::Debug {
    async fn run(self) -> CommandResult;
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum CommandEnum {
    /// Rewrite GraphQL documents for a specific server version.
    Rewrite(Box<RewriteCmd>),
}
impl CommandEnum {
    pub(crate) async fn run(self) -> CommandResult {
        match self {
            Self::Rewrite(cmd) => cmd.run().await
        }
    }
}
