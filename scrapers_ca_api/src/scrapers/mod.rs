//! The person scrapers bundled with the crate, and the organizations of each jurisdiction.
//!
//! Most jurisdictions have one organization (the council or legislature) with no declared posts.
//! Those whose seats are known in advance, like Moncton's, list them.

mod ca_nb_moncton;
mod ca_ns;
mod ca_qc_quebec;

use anyhow::anyhow;
use serde::Serialize;
use crate::metadata::{load_definition, JurisdictionDefinition, JurisdictionModule, DEFAULT_CLASSIFICATION};
use crate::parse_util::Fetcher;
use crate::person::{Organization, Person};

pub use ca_ns::NovaScotiaPersonScraper;
pub use ca_qc_quebec::QuebecPersonScraper;

pub trait PersonScraper {
    /// The people currently holding office. Fails if none could be found.
    fn scrape(&self,fetcher:&dyn Fetcher) -> anyhow::Result<Vec<Person>>;
}

/// The bundled scraper for a jurisdiction module, if there is one.
pub fn person_scraper(module_name:&str) -> Option<Box<dyn PersonScraper>> {
    match module_name {
        "ca_ns" => Some(Box::new(NovaScotiaPersonScraper)),
        "ca_qc_quebec" => Some(Box::new(QuebecPersonScraper)),
        _ => None,
    }
}

#[derive(Debug,Serialize)]
pub struct ScrapeResult {
    pub jurisdiction_id : String,
    pub organizations : Vec<Organization>,
    pub people : Vec<Person>,
}

/// Run a module's bundled scraper.
pub fn scrape(module:&JurisdictionModule,fetcher:&dyn Fetcher) -> anyhow::Result<ScrapeResult> {
    let scraper = person_scraper(&module.name).ok_or_else(||anyhow!("No bundled scraper for {}",module.name))?;
    let (_,definition) = load_definition(module)?;
    let people = scraper.scrape(fetcher)?;
    log::info!("Found {} people for {}",people.len(),module.name);
    Ok(ScrapeResult{ jurisdiction_id: definition.jurisdiction_id(), organizations: organizations(&module.name,&definition), people })
}

pub fn organizations(module_name:&str,definition:&JurisdictionDefinition) -> Vec<Organization> {
    let name = definition.name.as_deref().unwrap_or(&definition.division_id);
    let classification = definition.classification.as_deref().unwrap_or(DEFAULT_CLASSIFICATION);
    let organization = match module_name {
        "ca_nb_moncton" => ca_nb_moncton::organization(name,classification,&definition.division_id),
        _ => Organization::new(name,classification),
    };
    vec![organization]
}
