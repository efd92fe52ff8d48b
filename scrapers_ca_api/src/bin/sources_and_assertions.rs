//! Check that the bundled scrapers cite their sources and check that they found someone.

use scrapers_ca_api::config::{init_logging, Config};
use scrapers_ca_api::tasks;

fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::load()?;
    for line in tasks::sources_and_assertions(&config.scrapers_source_dir)? {
        println!("{}",line);
    }
    Ok(())
}
