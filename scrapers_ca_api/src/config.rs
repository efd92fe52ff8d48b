//! Run configuration, read from config.toml in the working directory.
//!
//! Every key has a default, so the file only needs to list what differs.

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Context;
use serde::Deserialize;
use crate::divisions::DivisionRegistry;
use crate::naming::NamingContext;
use crate::parse_util::Fetcher;
use crate::type_names::TypeNames;

const CONFIG_FILE_NAME : &str = "config.toml";

const DD_USER_AGENT : &str = "scrapers-ca/api; https://represent.opennorth.ca/";

#[derive(Deserialize,Debug,Clone)]
#[serde(default)]
pub struct Config {
    /// The Open Civic Data division file for Canada.
    pub division_csv : PathBuf,
    /// Directory holding one sub directory per jurisdiction module.
    pub jurisdictions_dir : PathBuf,
    /// Directory holding the source of the bundled person scrapers, checked by sources_and_assertions.
    pub scrapers_source_dir : PathBuf,
    pub census_division_types_url : String,
    pub census_subdivision_types_url : String,
    /// Published csv export of the styles of address spreadsheet. `{gid}` is replaced by the sheet number.
    pub styles_of_address_url : String,
    pub user_agent : String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            division_csv: PathBuf::from("data/country-ca.csv"),
            jurisdictions_dir: PathBuf::from("jurisdictions"),
            scrapers_source_dir: PathBuf::from("scrapers_ca_api/src/scrapers"),
            census_division_types_url: "https://www12.statcan.gc.ca/census-recensement/2016/ref/dict/tab/t1_4-eng.cfm".to_string(),
            census_subdivision_types_url: "https://www12.statcan.gc.ca/census-recensement/2016/ref/dict/tab/t1_5-eng.cfm".to_string(),
            styles_of_address_url: "https://docs.google.com/spreadsheets/d/11qUKd5bHeG5KIzXYERtVgs3hKcd9yuZlt-tCTLBFRpI/pub?single=true&gid={gid}&output=csv".to_string(),
            user_agent: DD_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Read config.toml from the working directory, or use the defaults if there is none.
    pub fn load() -> anyhow::Result<Config> {
        Self::load_from(Path::new(CONFIG_FILE_NAME))
    }

    pub fn load_from(path:&Path) -> anyhow::Result<Config> {
        if !path.exists() {
            log::debug!("No {} found, using default configuration",path.display());
            return Ok(Config::default());
        }
        let file = fs::read_to_string(path).with_context(||format!("Could not read {}",path.display()))?;
        let config : Config = toml::de::from_str(&file).with_context(||format!("Could not parse {}",path.display()))?;
        Ok(config)
    }

    pub fn styles_of_address_url(&self,gid:u32) -> String {
        self.styles_of_address_url.replace("{gid}",&gid.to_string())
    }

    /// Load the division registry and set up the (lazily fetched) type name tables.
    pub fn naming_context<'f>(&self,fetcher:&'f dyn Fetcher) -> anyhow::Result<NamingContext<'f>> {
        let divisions = DivisionRegistry::load(&self.division_csv)?;
        let type_names = TypeNames::new(fetcher,&self.census_division_types_url,&self.census_subdivision_types_url);
        Ok(NamingContext::new(divisions,type_names))
    }
}

/// Logging for the binaries. Defaults to info level; override with RUST_LOG.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
