use clap::Parser;
use scrapers_ca_api::config::{init_logging, Config};
use scrapers_ca_api::metadata::load_modules;
use scrapers_ca_api::parse_util::HttpFetcher;
use scrapers_ca_api::styles::StylesOfAddress;
use scrapers_ca_api::tidy::{audit, AuditOptions};

/// Check that the jurisdiction modules are named and configured consistently with the division
/// registry, and correct class names, division names and urls in place.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(long, action)]
    /// Print the corrections without changing any file.
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();
    let config = Config::load()?;
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let styles = StylesOfAddress::load(&fetcher,&config)?;
    let context = config.naming_context(&fetcher)?;
    let modules = load_modules(&config.jurisdictions_dir)?;
    let report = audit(&context,&modules,&styles,&AuditOptions{ dry_run: args.dry_run })?;
    for finding in &report.findings {
        println!("{}",finding);
    }
    for correction in &report.corrections {
        println!("{}{}",if args.dry_run { "Would change " } else { "Changed " },correction);
    }
    log::info!("Checked {} modules: {} findings, {} corrections, {} files written",modules.len(),report.findings.len(),report.corrections.len(),report.files_written.len());
    Ok(())
}
