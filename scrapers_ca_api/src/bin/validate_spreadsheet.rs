use clap::Parser;
use scrapers_ca_api::config::{init_logging, Config};
use scrapers_ca_api::divisions::DivisionRegistry;
use scrapers_ca_api::parse_util::HttpFetcher;
use scrapers_ca_api::tasks;

/// Validate the identifiers and geographic names in a published spreadsheet.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// The csv export of the spreadsheet.
    url: String,
    /// Column holding the division identifiers or codes.
    identifier_header: String,
    /// Column holding the geographic names.
    geographic_name_header: String,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();
    let config = Config::load()?;
    let divisions = DivisionRegistry::load(&config.division_csv)?;
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    for line in tasks::validate_spreadsheet(&divisions,&fetcher,&args.url,&args.identifier_header,&args.geographic_name_header)? {
        println!("{}",line);
    }
    Ok(())
}
