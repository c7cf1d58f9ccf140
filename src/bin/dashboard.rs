use std::{fs::OpenOptions, process::ExitCode, sync::Arc};

use clap::Parser;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use ledgerdash::{
    Dashboard, DashboardConfig, Error, FilterUpdate, QueryStatus, TimePeriod,
    ledger::HttpLedgerClient,
    money,
    pagination::{PaginationConfig, PaginationIndicator},
};

/// A one-shot dashboard report over a remote ledger API.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the ledger API, e.g. https://ledger.example.com/api.
    #[arg(long)]
    base_url: String,

    /// The canonical timezone to compute dates in.
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// The analytics period: last-30-days, last-6-months, last-year, or
    /// year-to-date.
    #[arg(long, default_value = "last-30-days")]
    period: String,

    /// Only report on this account.
    #[arg(long)]
    account: Option<String>,

    /// Free-text search over the transaction listing.
    #[arg(long)]
    search: Option<String>,

    /// How many transactions to list.
    #[arg(long, default_value_t = 25)]
    page_size: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    let Some(period) = TimePeriod::from_query_value(&args.period) else {
        eprintln!("unknown period {:?}", args.period);
        return ExitCode::FAILURE;
    };

    match run_report(args, period).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("report failed: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run_report(args: Args, period: TimePeriod) -> Result<(), Error> {
    let ledger = HttpLedgerClient::new(&args.base_url)?;
    let config = DashboardConfig {
        timezone: args.timezone,
        pagination: PaginationConfig {
            default_page_size: args.page_size,
            ..Default::default()
        },
    };
    let mut dashboard = Dashboard::new(config, Arc::new(ledger))?;

    if let Some(account) = args.account {
        dashboard.apply_filter(FilterUpdate::Account(Some(account)))?;
    }
    if let Some(search) = args.search {
        dashboard.apply_filter(FilterUpdate::Search(search))?;
        dashboard.flush_search();
    }

    let accounts = dashboard.accounts().await?;
    println!("Accounts");
    for account in &accounts {
        println!(
            "  {}: {}",
            account.label(),
            money::format_amount(account.balance, &account.currency)
        );
    }

    println!("\nTransactions ({})", period.label());
    match dashboard.refresh_transactions().await {
        QueryStatus::Success(page) => {
            for transaction in &page.transactions {
                println!(
                    "  {}  {:>12}  {}",
                    transaction.transaction_date,
                    money::format_amount(transaction.amount, &transaction.currency),
                    transaction.description
                );
            }
            println!(
                "  page {} of {} ({} total)",
                page.pagination.page, page.pagination.total_pages, page.pagination.total
            );
            println!("  {}", indicator_line(&dashboard.page_indicators()));
        }
        QueryStatus::Failed(message) => println!("  could not load transactions: {message}"),
        QueryStatus::Loading => println!("  still loading"),
    }

    let stats = dashboard.summary_stats(period).await?;
    println!("\nSummary ({} transactions)", stats.transaction_count);
    println!("  income:   {}", money::format_amount(stats.income, money::DEFAULT_CURRENCY));
    println!("  expenses: {}", money::format_amount(stats.expenses, money::DEFAULT_CURRENCY));
    println!("  net:      {}", money::format_amount(stats.net, money::DEFAULT_CURRENCY));

    println!("\nMonthly overview");
    for stat in dashboard.monthly_overview(period).await? {
        println!(
            "  {}  income {:>12}  expenses {:>12}  net {:>12}",
            stat.month,
            money::format_amount(stat.income, money::DEFAULT_CURRENCY),
            money::format_amount(stat.expenses, money::DEFAULT_CURRENCY),
            money::format_amount(stat.net, money::DEFAULT_CURRENCY)
        );
    }

    println!("\nBalance history");
    let overview = dashboard.balance_overview(period).await?;
    for (index, point) in overview.points.iter().enumerate() {
        let amounts: Vec<String> = overview
            .series
            .iter()
            .filter_map(|(label, values)| {
                values[index].map(|amount| {
                    format!("{label} {}", money::format_amount(amount, money::DEFAULT_CURRENCY))
                })
            })
            .collect();
        println!("  {}  {}", point.label, amounts.join(", "));
    }

    Ok(())
}

fn indicator_line(indicators: &[PaginationIndicator]) -> String {
    indicators
        .iter()
        .map(|indicator| match indicator {
            PaginationIndicator::Page(page) => page.to_string(),
            PaginationIndicator::CurrPage(page) => format!("[{page}]"),
            PaginationIndicator::Ellipsis => "…".to_owned(),
            PaginationIndicator::BackButton(_) => "<".to_owned(),
            PaginationIndicator::NextButton(_) => ">".to_owned(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::WARN)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}
