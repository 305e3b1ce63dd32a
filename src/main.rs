use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use onlinebank::cli::Shell;
use onlinebank::config::paths::DATA_DIR_ENV;
use onlinebank::config::{BankPaths, Settings};
use onlinebank::crypto::Argon2Hasher;
use onlinebank::models::AccountNumber;
use onlinebank::services::BankService;
use onlinebank::storage::Storage;

#[derive(Parser)]
#[command(
    name = "onlinebank",
    version,
    about = "Terminal-based online banking demo",
    long_about = "OnlineBank is a single-user banking demo. Open an account, then \
                  deposit, withdraw, transfer and check balances from an \
                  interactive menu."
)]
struct Cli {
    /// Directory holding config.json, audit.log and data/
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive banking menu (default)
    Shell,

    /// Show current configuration and paths
    Config,

    /// Print the audit trail, oldest first
    Audit {
        /// Only show entries involving this account number
        #[arg(long)]
        account: Option<AccountNumber>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => BankPaths::with_base_dir(dir),
        None => BankPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let storage = Storage::new(&paths)?;
            storage.load_all()?;
            tracing::debug!(
                accounts = storage.accounts.count()?,
                "loaded account store"
            );

            let hasher = Argon2Hasher::new(&settings.hashing)?;
            let service = BankService::new(&storage, &hasher, &settings);

            let stdin = io::stdin();
            let hidden = stdin.is_terminal();
            Shell::new(service, stdin.lock(), io::stdout().lock())
                .hidden_passwords(hidden)
                .run()?;
        }
        Commands::Config => {
            println!("OnlineBank Configuration");
            println!("========================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Accounts file:   {}", paths.accounts_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:          {}", settings.currency_symbol);
            println!(
                "  Argon2 cost (m/t/p):      {}/{}/{}",
                settings.hashing.memory_cost,
                settings.hashing.time_cost,
                settings.hashing.parallelism
            );
            println!(
                "  Account number attempts:  {}",
                settings.account_number_attempts
            );
        }
        Commands::Audit { account } => {
            let storage = Storage::new(&paths)?;
            let entries = match account {
                Some(number) => storage.audit().read_for_account(number)?,
                None => storage.audit().read_all()?,
            };

            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in &entries {
                println!("{}", entry.format_human_readable(&settings.currency_symbol));
            }
        }
    }

    Ok(())
}
