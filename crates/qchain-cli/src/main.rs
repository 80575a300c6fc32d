//! QuantumChain Command-Line Interface
//!
//! Estimate, analyse and log quantum jobs on the QuantumChain ledger from a
//! terminal. Login state and the connected wallet are kept in
//! `~/.qchain/session.json` between invocations.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use qchain_core::SubmissionType;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{Context, InputArgs};
use commands::{analyse, auth, chat, contract, estimate, history, submit, tps, version, wallet};

/// QuantumChain - log quantum jobs on an EVM ledger, with AI analysis
#[derive(Parser)]
#[command(name = "qchain")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(long, env = "QCHAIN_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Session file (defaults to ~/.qchain/session.json)
    #[arg(long, env = "QCHAIN_SESSION_FILE", global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate execution time and cost of a job
    Estimate {
        /// Provider (IBM Quantum, Google Quantum, Amazon Braket)
        #[arg(short, long, default_value = "IBM Quantum")]
        job_type: String,

        #[command(flatten)]
        input: InputArgs,

        /// Priority multiplier (>1 is faster and more expensive)
        #[arg(long)]
        priority: Option<f64>,
    },

    /// Analyse QASM or a prompt with the AI model
    Analyse {
        #[command(flatten)]
        input: InputArgs,

        /// How to interpret the input (qasm, prompt)
        #[arg(short, long, default_value = "prompt")]
        kind: SubmissionType,
    },

    /// Analyse and log a job on the ledger
    Submit {
        /// Provider (IBM Quantum, Google Quantum, Amazon Braket)
        #[arg(short, long, default_value = "IBM Quantum")]
        job_type: String,

        #[command(flatten)]
        input: InputArgs,

        /// How to interpret the input (qasm, prompt)
        #[arg(short, long, default_value = "prompt")]
        kind: SubmissionType,

        /// Log without AI analysis
        #[arg(long)]
        no_analyse: bool,
    },

    /// Show logged jobs
    History {
        /// Admins: only jobs from the connected wallet
        #[arg(long)]
        mine: bool,

        /// Show at most this many jobs
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Manage the logged-in user
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Manage the connected wallet
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },

    /// Ask the QuantumAI assistant
    Chat {
        /// Question
        #[arg(required = true, trailing_var_arg = true)]
        prompt: Vec<String>,
    },

    /// Show the job-logger contract and network
    Contract,

    /// Show current network throughput
    Tps,

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Log in with a demo or registered account
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "QCHAIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Register a new user account
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "QCHAIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out and clear the stored session
    Logout,

    /// Show the logged-in user and wallet
    Status,
}

#[derive(Subcommand)]
enum WalletAction {
    /// Connect a wallet address
    Connect {
        /// Account address (0x...)
        #[arg(short, long)]
        address: String,

        /// Chain the wallet is on, decimal or 0x hex (defaults to the configured chain)
        #[arg(short, long)]
        chain_id: Option<String>,
    },

    /// Forget the connected wallet
    Disconnect,

    /// Show the connected wallet and its balance
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let result = run(cli).await;

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Version = cli.command {
        version::execute();
        return Ok(());
    }

    let ctx = Context::load(cli.config.as_deref(), cli.session_file)?;

    match cli.command {
        Commands::Estimate {
            job_type,
            input,
            priority,
        } => estimate::execute(&job_type, &input, priority),

        Commands::Analyse { input, kind } => analyse::execute(&ctx, &input, kind).await,

        Commands::Submit {
            job_type,
            input,
            kind,
            no_analyse,
        } => submit::execute(&ctx, &job_type, &input, kind, !no_analyse).await,

        Commands::History {
            mine,
            limit,
            format,
        } => history::execute(&ctx, mine, limit, &format).await,

        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => auth::execute_login(&ctx, &email, &password),
            AuthAction::Register { email, password } => {
                auth::execute_register(&ctx, &email, &password)
            }
            AuthAction::Logout => auth::execute_logout(&ctx),
            AuthAction::Status => auth::execute_status(&ctx),
        },

        Commands::Wallet { action } => match action {
            WalletAction::Connect { address, chain_id } => {
                wallet::execute_connect(&ctx, &address, chain_id.as_deref())
            }
            WalletAction::Disconnect => wallet::execute_disconnect(&ctx),
            WalletAction::Status => wallet::execute_status(&ctx).await,
        },

        Commands::Chat { prompt } => chat::execute(&ctx, &prompt.join(" ")).await,

        Commands::Contract => {
            contract::execute(&ctx);
            Ok(())
        }

        Commands::Tps => tps::execute(&ctx).await,

        Commands::Version => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_submit() {
        let cli = Cli::try_parse_from([
            "qchain",
            "submit",
            "--job-type",
            "Amazon Braket",
            "--text",
            "OPENQASM 2.0; qreg q[1]; h q[0];",
            "--kind",
            "qasm",
        ])
        .unwrap();
        match cli.command {
            Commands::Submit {
                job_type,
                input,
                kind,
                no_analyse,
            } => {
                assert_eq!(job_type, "Amazon Braket");
                assert_eq!(kind, SubmissionType::Qasm);
                assert!(input.text.is_some());
                assert!(!no_analyse);
            }
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        assert!(
            Cli::try_parse_from(["qchain", "analyse", "--text", "x", "--kind", "python"]).is_err()
        );
    }

    #[test]
    fn test_input_and_text_conflict() {
        assert!(
            Cli::try_parse_from(["qchain", "estimate", "--input", "a.qasm", "--text", "x"])
                .is_err()
        );
    }

    #[test]
    fn test_parse_history_and_verbosity() {
        let cli = Cli::try_parse_from(["qchain", "-vv", "history", "--mine", "-l", "5"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::History { mine, limit, format } => {
                assert!(mine);
                assert_eq!(limit, Some(5));
                assert_eq!(format, "table");
            }
            _ => panic!("expected history"),
        }
    }

    #[test]
    fn test_parse_chat_joins_words() {
        let cli = Cli::try_parse_from(["qchain", "chat", "what", "is", "a", "qubit?"]).unwrap();
        match cli.command {
            Commands::Chat { prompt } => assert_eq!(prompt.join(" "), "what is a qubit?"),
            _ => panic!("expected chat"),
        }
        assert!(Cli::try_parse_from(["qchain", "chat"]).is_err());
    }

    #[test]
    fn test_parse_wallet_connect() {
        let cli = Cli::try_parse_from([
            "qchain",
            "wallet",
            "connect",
            "--address",
            "0x00000000000000000000000000000000000000aa",
            "--chain-id",
            "0x2328",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Wallet {
                action: WalletAction::Connect { .. }
            }
        ));
    }
}
