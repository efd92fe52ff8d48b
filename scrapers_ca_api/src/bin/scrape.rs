use anyhow::anyhow;
use clap::Parser;
use scrapers_ca_api::config::{init_logging, Config};
use scrapers_ca_api::metadata::load_modules;
use scrapers_ca_api::parse_util::HttpFetcher;
use scrapers_ca_api::scrapers::scrape;

/// Run a jurisdiction's bundled person scraper and print what it found as JSON.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// The jurisdiction module, e.g. ca_ns
    module: String,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();
    let config = Config::load()?;
    let modules = load_modules(&config.jurisdictions_dir)?;
    let module = modules.iter().find(|m|m.name==args.module).ok_or_else(||anyhow!("No jurisdiction module {}",args.module))?;
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let result = scrape(module,&fetcher)?;
    println!("{}",serde_json::to_string_pretty(&result)?);
    Ok(())
}
