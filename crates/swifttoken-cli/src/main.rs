use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::token::IssueArgs;

#[derive(Parser, Debug)]
#[command(name = "swifttoken", version, about = "Issue and verify sealed session tokens")]
struct Cli {
    /// Path to a swifttoken.yaml configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the symmetric token key.
    Keys {
        #[command(subcommand)]
        command: KeysCommand,
    },

    /// Issue and verify tokens.
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate a new random 32-byte key (base64).
    Generate {
        /// Write the key to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Seal a new token.
    Issue {
        /// Key file path or key text.
        #[arg(long, env = "SWIFTTOKEN_SECRET", hide_env_values = true)]
        key: Option<String>,

        #[arg(long)]
        subject: String,

        /// Granted permission (repeatable).
        #[arg(long = "permission", short = 'p', required = true)]
        permissions: Vec<String>,

        /// Session identifier (random UUID if omitted).
        #[arg(long)]
        session_id: Option<String>,

        /// Audit nonce (random UUID if omitted).
        #[arg(long)]
        nonce: Option<String>,

        /// Lifetime such as "30m", "24h", "7d".
        #[arg(long)]
        expires: Option<String>,

        /// Ask holders to renew near expiry.
        #[arg(long, default_value_t = false)]
        sliding: bool,

        /// Write the token to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Open and check a token.
    Verify {
        /// Key file path or key text.
        #[arg(long, env = "SWIFTTOKEN_SECRET", hide_env_values = true)]
        key: Option<String>,

        /// Token string or path to a file containing it.
        token: String,

        /// Verify as of this Unix time instead of now.
        #[arg(long)]
        at: Option<i64>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Keys { command } => match command {
            KeysCommand::Generate { output } => commands::keys::generate(output),
        },
        Command::Token { command } => {
            let config = commands::load_config(cli.config.as_deref())?;
            match command {
                TokenCommand::Issue {
                    key,
                    subject,
                    permissions,
                    session_id,
                    nonce,
                    expires,
                    sliding,
                    output,
                } => {
                    let args = IssueArgs {
                        subject,
                        permissions,
                        session_id,
                        nonce,
                        expires,
                        sliding,
                        output,
                    };
                    commands::token::issue(key, &config, args).map(|_| ())
                }
                TokenCommand::Verify { key, token, at } => {
                    commands::token::verify(key, &config, token, at).map(|_| ())
                }
            }
        }
    }
}
