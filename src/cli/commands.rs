use clap::{Parser, Subcommand, ValueEnum};

/// `opsassist` - plan, execute and verify natural-language tasks.
#[derive(Parser, Debug)]
#[command(name = "opsassist")]
#[command(version)]
#[command(
    about = "Turn a natural-language task into GitHub and weather API calls.",
    long_about = None
)]
pub struct Cli {
    /// Config file (default: ~/.opsassist/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a single task and print the result
    Run {
        /// Natural-language task (quote it if it contains spaces)
        task: String,

        /// Show the generated plan and debug logging
        #[arg(short, long)]
        verbose: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Read tasks from a prompt until `exit`
    Interactive,

    /// Start the HTTP service
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Whether debug logging was requested.
    pub fn verbose(&self) -> bool {
        matches!(self.command, Commands::Run { verbose: true, .. })
    }
}
