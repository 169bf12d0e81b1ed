use crate::commands;

#[derive(clap::Parser, Debug)]
#[command(
    about = "Rewrite GraphQL documents so older servers can run them.",
    arg_required_else_help = true,
    name = "graphql-compat",
    version,
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) cmd: commands::CommandEnum,

    #[arg(
        action=clap::ArgAction::Count,
        global=true,
        help="Log more detail to stderr. Pass twice for trace logging.",
        long,
        short='v',
    )]
    pub verbose: u8,
}

/// The log level to run with, plus anything worth warning about once the
/// logger is up.
#[derive(Debug, PartialEq)]
pub(crate) struct LogLevelChoice {
    pub level: tracing::Level,
    pub warning: Option<String>,
}

impl Cli {
    /// `-v` flags win over the `LOG_LEVEL` environment variable.
    pub(crate) fn log_level(&self, env_log_level: Option<&str>) -> LogLevelChoice {
        match self.verbose {
            0 => {},
            1 => return LogLevelChoice { level: tracing::Level::DEBUG, warning: None },
            _ => return LogLevelChoice { level: tracing::Level::TRACE, warning: None },
        }

        let Some(raw) = env_log_level.map(str::trim) else {
            return LogLevelChoice { level: DEFAULT_LOG_LEVEL, warning: None };
        };
        match raw.to_ascii_lowercase().as_str() {
            "trace" => LogLevelChoice { level: tracing::Level::TRACE, warning: None },
            "debug" | "verbose" => LogLevelChoice { level: tracing::Level::DEBUG, warning: None },
            "info" => LogLevelChoice { level: tracing::Level::INFO, warning: None },
            "warn" => LogLevelChoice { level: tracing::Level::WARN, warning: None },
            "error" => LogLevelChoice { level: tracing::Level::ERROR, warning: None },
            _ => LogLevelChoice {
                level: DEFAULT_LOG_LEVEL,
                warning: Some(format!(
                    "Ignoring unrecognized `LOG_LEVEL` value `{raw}`; logging at \
                    `{DEFAULT_LOG_LEVEL}`."
                )),
            },
        }
    }
}

pub(crate) const DEFAULT_LOG_LEVEL: tracing::Level = tracing::Level::INFO;
