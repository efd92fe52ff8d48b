//! Print each scraper's council page, or warn if it is missing or unneeded.

use scrapers_ca_api::config::{init_logging, Config};
use scrapers_ca_api::metadata::load_modules;
use scrapers_ca_api::tasks;

fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::load()?;
    let declarations = tasks::load_declarations(&load_modules(&config.jurisdictions_dir)?)?;
    for line in tasks::council_pages(&declarations) {
        println!("{}",line);
    }
    Ok(())
}
