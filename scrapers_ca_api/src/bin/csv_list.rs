//! List the scrapers with csv data.

use scrapers_ca_api::config::{init_logging, Config};
use scrapers_ca_api::metadata::load_modules;
use scrapers_ca_api::tasks;

fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::load()?;
    let declarations = tasks::load_declarations(&load_modules(&config.jurisdictions_dir)?)?;
    for line in tasks::csv_list(&declarations) {
        println!("{}",line);
    }
    Ok(())
}
