// src/bin/b3_cli.rs
use b3_stockinfo::error::StockInfoError;
use b3_stockinfo::record::Record;
use b3_stockinfo::{registry, AssetKind, StockFactory, StockInfoConfig};
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "b3-cli")]
#[command(about = "Scrape B3 stock and REIT summary pages", long_about = None)]
struct Cli {
    /// URL template with `%s` where the ticker goes
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// URL template used for funds; defaults to `--base-url`
    #[arg(long, global = true)]
    fund_base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Stock(FetchArgs),
    Fund(FetchArgs),
    /// List the fields extracted for a page kind
    Fields {
        #[arg(long)]
        fund: bool,
    },
}

#[derive(Args)]
struct FetchArgs {
    #[arg(required = true)]
    tickers: Vec<String>,

    /// Include `_`-prefixed bookkeeping fields
    #[arg(long)]
    internal: bool,

    /// Print unit-formatted values instead of JSON
    #[arg(long)]
    pretty: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Stock(args) => run(config, AssetKind::Equity, args).await,
        Commands::Fund(args) => run(config, AssetKind::Fund, args).await,
        Commands::Fields { fund } => {
            let kind = AssetKind::from_fund_flag(fund);
            for spec in registry(kind).iter() {
                println!(
                    "{:<28} {:<4} {}",
                    spec.name,
                    spec.unit.unwrap_or("-"),
                    spec.query
                );
            }
        }
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<StockInfoConfig> {
    let mut config = StockInfoConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.as_str())?;
    }
    if let Some(fund_base_url) = &cli.fund_base_url {
        config = config.with_fund_base_url(fund_base_url.as_str())?;
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    Ok(config)
}

async fn run(config: StockInfoConfig, kind: AssetKind, args: FetchArgs) {
    let factory = match StockFactory::new(config) {
        Ok(factory) => factory,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut failed = false;
    for ticker in &args.tickers {
        let result = factory.create(ticker, kind).await;
        failed |= !handle_result(result, &args);
    }

    if failed {
        std::process::exit(1);
    }
}

fn handle_result(result: Result<Record, StockInfoError>, args: &FetchArgs) -> bool {
    match result {
        Ok(record) if args.pretty => {
            println!("📈 {}", record.ticker().unwrap_or("?"));
            for name in record.attributes(args.internal) {
                let shown = record.formatted(name).unwrap_or_else(|| "None".to_string());
                println!("  {:<28} {}", name, shown);
            }
            true
        }
        Ok(record) => match record.to_json_with(args.internal) {
            Ok(json) => {
                println!("{}", json);
                true
            }
            Err(e) => {
                eprintln!("❌ Error: {}", e);
                false
            }
        },
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            false
        }
    }
}
