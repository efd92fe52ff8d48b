use chrono::NaiveDate;
use clap::Parser;
use scrapers_ca_api::config::{init_logging, Config};
use scrapers_ca_api::metadata::load_modules;
use scrapers_ca_api::tasks;

/// List the scrapers whose manually maintained csv data is more than a year old.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(long)]
    /// Check as of this date (yyyy-mm-dd) rather than today.
    today: Option<NaiveDate>,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();
    let config = Config::load()?;
    let declarations = tasks::load_declarations(&load_modules(&config.jurisdictions_dir)?)?;
    let today = args.today.unwrap_or_else(||chrono::Local::now().date_naive());
    for line in tasks::csv_stale(&declarations,today)? {
        println!("{}",line);
    }
    Ok(())
}
