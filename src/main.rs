/// Version injected at compile time via STRIPE_CLIENT_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("STRIPE_CLIENT_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use stripe_client::api::http::format_api_error;
use stripe_client::config::Config;
use stripe_client::list::{ListIter, ListObject, ListParams};
use stripe_client::resource::{balance, charge, invoiceitem, plan, refund};
use stripe_client::Api;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Command-line access to the Stripe API
#[derive(Parser, Debug)]
#[command(name = "stripe-client", version, about, long_about = None)]
struct Args {
    /// Secret API key (overrides STRIPE_KEY and the config file)
    #[arg(short, long)]
    key: Option<String>,

    /// API root to talk to
    #[arg(long)]
    api_base: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a resource, one JSON object per line
    List {
        resource: Resource,

        /// Page size
        #[arg(short, long)]
        limit: Option<u64>,

        /// Start after this id
        #[arg(long, conflicts_with = "ending_before")]
        starting_after: Option<String>,

        /// Page backward from this id
        #[arg(long)]
        ending_before: Option<String>,

        /// Fetch a single page only
        #[arg(long)]
        single: bool,

        /// Charge whose refunds to list (required for refunds)
        #[arg(long, required_if_eq("resource", "refunds"))]
        charge: Option<String>,

        /// Only items for this customer (charges, invoice items)
        #[arg(long)]
        customer: Option<String>,
    },
    /// Retrieve one object by id
    Get { resource: Resource, id: String },
    /// Show the current balance
    Balance,
    /// Show the account owning the key
    Account,
    /// Store the API key in the config file
    SetKey { key: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Resource {
    Charges,
    Refunds,
    Invoiceitems,
    Transactions,
    Plans,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("stripe-client {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("stripe-client").join("stripe-client.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".stripe-client").join("stripe-client.log");
    }
    PathBuf::from("stripe-client.log")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let mut config = Config::load();
    if let Some(base) = &args.api_base {
        config.api_base = Some(base.clone());
    }

    if let Command::SetKey { key } = &args.command {
        config.set_key(key).context("Failed to save config")?;
        println!("Key saved");
        return Ok(());
    }

    let api = Api::from_config(&config, args.key.as_deref()).map_err(api_error)?;

    match args.command {
        Command::List {
            resource,
            limit,
            starting_after,
            ending_before,
            single,
            charge,
            customer,
        } => {
            let list = ListParams {
                start: starting_after,
                end: ending_before,
                limit,
                single,
                ..Default::default()
            };
            let customer = customer.unwrap_or_default();

            match resource {
                Resource::Charges => print_list(api.charges.list(Some(
                    &charge::ChargeListParams {
                        list,
                        customer,
                        ..Default::default()
                    },
                ))),
                Resource::Refunds => print_list(api.refunds.list(&refund::RefundListParams {
                    list,
                    charge: charge.unwrap_or_default(),
                })),
                Resource::Invoiceitems => print_list(api.invoice_items.list(Some(
                    &invoiceitem::InvoiceItemListParams {
                        list,
                        customer,
                        ..Default::default()
                    },
                ))),
                Resource::Transactions => print_list(api.balance.list(Some(
                    &balance::TransactionListParams {
                        list,
                        ..Default::default()
                    },
                ))),
                Resource::Plans => {
                    print_list(api.plans.list(Some(&plan::PlanListParams { list })))
                }
            }
        }
        Command::Get { resource, id } => match resource {
            Resource::Charges => print_one(api.charges.get(&id, None)),
            Resource::Refunds => {
                anyhow::bail!("Refunds are fetched through their charge; use `list refunds --charge`")
            }
            Resource::Invoiceitems => print_one(api.invoice_items.get(&id, None)),
            Resource::Transactions => print_one(api.balance.get_transaction(&id, None)),
            Resource::Plans => print_one(api.plans.get(&id, None)),
        },
        Command::Balance => print_one(api.balance.get(None)),
        Command::Account => print_one(api.account.get()),
        Command::SetKey { .. } => Ok(()),
    }
}

fn api_error(err: stripe_client::Error) -> anyhow::Error {
    tracing::error!("{}", err);
    anyhow::anyhow!(format_api_error(&err))
}

/// One object per output line
fn json_line<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

fn print_one<T: Serialize>(result: stripe_client::Result<T>) -> Result<()> {
    let value = result.map_err(api_error)?;
    println!("{}", json_line(&value)?);
    Ok(())
}

fn print_list<T: ListObject + Serialize>(mut iter: ListIter<T>) -> Result<()> {
    let mut count = 0usize;

    while !iter.stopped() {
        match iter.next() {
            Some(Ok(item)) => {
                println!("{}", json_line(&item)?);
                count += 1;
            }
            Some(Err(err)) => return Err(api_error(err)),
            None => break,
        }
    }

    if let Some(err) = iter.err() {
        return Err(api_error(err.clone()));
    }

    tracing::info!(
        "Listed {} items (total_count={:?})",
        count,
        iter.meta().total_count
    );
    Ok(())
}
