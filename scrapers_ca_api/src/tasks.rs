//! Maintenance reports over the scraper declarations of the jurisdiction modules.
//!
//! A module's `people.toml` has an optional top level `council_page` and one table, named
//! like `MonctonPersonScraper`, declaring the scraper:
//! ```text
//! council_page = "http://www.moncton.ca/Government/City_Council.htm"
//!
//! [MonctonPersonScraper]
//! base = "CanadianScraper"
//! ```
//! Scrapers reading a published csv file have `base = "CSVScraper"` and a `csv_url`, and
//! manually maintained files also an `updated_at` date and `contact_person`.
//!
//! Each report returns its lines; the binaries print them.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use anyhow::{anyhow, bail, Context};
use chrono::{Duration, NaiveDate};
use encoding_rs::UTF_8;
use itertools::Itertools;
use serde_with::DeserializeFromStr;
use crate::divisions::DivisionRegistry;
use crate::error::LookupError;
use crate::metadata::JurisdictionModule;
use crate::parse_util::{csv_dict_reader, Fetcher};

/// Settings a csv scraper may have without the publisher needing to fix anything.
const ACCEPTED_CSV_SETTINGS : [&str;10] = ["base","csv_url","filename","locale","many_posts_per_area","unique_roles","district_name_format_string","other_names","updated_at","contact_person"];
const ACCEPTED_ENCODINGS : [&str;2] = ["utf-8","windows-1252"];
/// Settings that csv_error explains individually.
const EXPLAINED_CSV_SETTINGS : [&str;3] = ["corrections","encoding","header_converter"];
const STALE_AFTER_DAYS : i64 = 365;

#[derive(Debug,Clone,Copy,PartialEq,Eq,DeserializeFromStr)]
pub enum ScraperBase {
    CanadianScraper,
    CSVScraper,
}

impl FromStr for ScraperBase {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CanadianScraper" => Ok(ScraperBase::CanadianScraper),
            "CSVScraper" => Ok(ScraperBase::CSVScraper),
            _ => Err(anyhow!("Unknown scraper base {}",s)),
        }
    }
}

impl Display for ScraperBase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f,"{:?}",self) }
}

#[derive(Debug,Clone)]
pub struct ScraperDeclaration {
    pub module_name : String,
    pub class_name : String,
    pub council_page : Option<String>,
    pub base : ScraperBase,
    /// Everything in the scraper table.
    pub settings : toml::Table,
}

impl ScraperDeclaration {
    pub fn parse(module_name:&str,content:&str) -> anyhow::Result<Self> {
        let table : toml::Table = toml::from_str(content)?;
        let council_page = table.get("council_page").and_then(|v|v.as_str()).map(|s|s.to_string());
        let (class_name,settings) = table.into_iter()
            .find_map(|(key,value)|match value {
                toml::Value::Table(settings) if key.contains("PersonScraper") => Some((key,settings)),
                _ => None,
            })
            .ok_or_else(||anyhow!("No PersonScraper table for {}",module_name))?;
        let base : ScraperBase = settings.get("base").cloned().ok_or_else(||anyhow!("{} has no base",class_name))?.try_into()?;
        Ok(ScraperDeclaration{ module_name: module_name.to_string(), class_name, council_page, base, settings })
    }

    fn setting(&self,key:&str) -> Option<&str> { self.settings.get(key).and_then(|v|v.as_str()) }
    pub fn csv_url(&self) -> Option<&str> { self.setting("csv_url") }
    pub fn contact_person(&self) -> Option<&str> { self.setting("contact_person") }
    pub fn encoding(&self) -> Option<&str> { self.setting("encoding") }

    /// When a manually maintained csv file was last updated. Either a toml date or a yyyy-mm-dd string.
    pub fn updated_at(&self) -> anyhow::Result<Option<NaiveDate>> {
        let text = match self.settings.get("updated_at") {
            None => return Ok(None),
            Some(toml::Value::Datetime(datetime)) => datetime.to_string(),
            Some(toml::Value::String(s)) => s.clone(),
            Some(other) => bail!("updated_at of {} is not a date: {}",self.module_name,other),
        };
        let date = NaiveDate::parse_from_str(&text,"%Y-%m-%d").with_context(||format!("updated_at of {} is not a date: {}",self.module_name,text))?;
        Ok(Some(date))
    }

    pub fn is_csv(&self) -> bool { self.base==ScraperBase::CSVScraper }
}

/// The scraper declarations of the modules that have a people file.
pub fn load_declarations(modules:&[JurisdictionModule]) -> anyhow::Result<Vec<ScraperDeclaration>> {
    let mut declarations = Vec::new();
    for module in modules {
        let path = module.people_path();
        if !path.is_file() {
            log::warn!("{} has no scraper declaration",module.name);
            continue;
        }
        let content = fs::read_to_string(&path).with_context(||format!("Could not read {}",path.display()))?;
        declarations.push(ScraperDeclaration::parse(&module.name,&content).with_context(||format!("Could not parse {}",path.display()))?);
    }
    Ok(declarations)
}

/// Each scraper's council page, or a warning if it is missing or unneeded.
pub fn council_pages(declarations:&[ScraperDeclaration]) -> Vec<String> {
    declarations.iter().filter_map(|d|match (d.is_csv(),d.council_page.as_deref()) {
        (true,Some(_)) => Some(format!("{:<60} Delete COUNCIL_PAGE",d.module_name)),
        (true,None) => None,
        (false,Some(page)) => Some(format!("{:<60} {}",d.module_name,page)),
        (false,None) => Some(format!("{:<60} Missing COUNCIL_PAGE",d.module_name)),
    }).collect()
}

/// Scrapers with csv data.
pub fn csv_list(declarations:&[ScraperDeclaration]) -> Vec<String> {
    declarations.iter().filter_map(|d|d.csv_url().map(|url|format!("{}: {}",d.module_name,url))).collect()
}

/// Scrapers whose manually maintained csv data is more than a year old.
pub fn csv_stale(declarations:&[ScraperDeclaration],today:NaiveDate) -> anyhow::Result<Vec<String>> {
    let cutoff = today-Duration::days(STALE_AFTER_DAYS);
    let mut lines = Vec::new();
    for declaration in declarations {
        if let Some(updated_at) = declaration.updated_at()? {
            if updated_at<cutoff {
                lines.push(format!("{}: Created on {} by {}",declaration.module_name,updated_at,declaration.contact_person().unwrap_or("nobody")));
            }
        }
    }
    Ok(lines)
}

/// Corrections that csv publishers should make.
pub fn csv_error(declarations:&[ScraperDeclaration]) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::new();
    for declaration in declarations.iter().filter(|d|d.is_csv()) {
        if declaration.module_name.contains("_candidates") && declaration.settings.contains_key("updated_at") { continue; }
        let mut keys : BTreeSet<&str> = declaration.settings.keys().map(|k|k.as_str()).filter(|k|!ACCEPTED_CSV_SETTINGS.contains(k)).collect();
        if declaration.encoding().map(|e|ACCEPTED_ENCODINGS.contains(&e)).unwrap_or(false) { keys.remove("encoding"); }
        if keys.is_empty() { continue; }
        lines.push(String::new());
        lines.push(declaration.module_name.clone());
        lines.push(declaration.csv_url().unwrap_or("(no csv_url)").to_string());
        let extra = keys.iter().filter(|k|!EXPLAINED_CSV_SETTINGS.contains(*k)).join(", ");
        if !extra.is_empty() { lines.push(format!("- Manually check the configuration of: {}",extra)); }
        if keys.contains("encoding") {
            lines.push(format!("- The CSV file should be encoded as 'utf-8' or 'windows-1252', not '{}'",declaration.settings["encoding"].as_str().unwrap_or("?")));
        }
        if keys.contains("corrections") {
            let corrections = declaration.settings["corrections"].as_table().ok_or_else(||anyhow!("corrections of {} should be a table",declaration.module_name))?;
            for (key,values) in corrections {
                let values = values.as_table().ok_or_else(||anyhow!("corrections.{} of {} should be a table",key,declaration.module_name))?;
                for (actual,expected) in values {
                    lines.push(format!("- Change '{}' to '{}' in {}",actual,expected.as_str().unwrap_or(&expected.to_string()),key));
                }
            }
        }
        if keys.contains("header_converter") {
            lines.push("- Correct column headers according to:".to_string());
            match &declaration.settings["header_converter"] {
                toml::Value::String(s) => lines.push(s.clone()),
                other => lines.push(other.to_string()),
            }
        }
    }
    Ok(lines)
}

/// Checks that the bundled scrapers cite a source for every page they fetch, and check that
/// they found someone.
pub fn sources_and_assertions(scrapers_dir:&Path) -> anyhow::Result<Vec<String>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(scrapers_dir).with_context(||format!("Could not list {}",scrapers_dir.display()))? {
        let path = entry?.path();
        let is_scraper = path.extension().map(|e|e=="rs").unwrap_or(false) && path.file_name().map(|n|n!="mod.rs").unwrap_or(false);
        if is_scraper { paths.push(path); }
    }
    paths.sort();
    let mut lines = Vec::new();
    for path in paths {
        let content = fs::read_to_string(&path).with_context(||format!("Could not read {}",path.display()))?;
        let source_count = content.matches("add_source(").count();
        let request_count = content.matches("fetch_html(").count()+content.matches("fetch_text(").count()+content.matches("fetch_bytes(").count();
        if source_count<request_count {
            lines.push(format!("Expected {} sources after {} requests {}",source_count,request_count,path.display()));
        }
        if request_count>0 && !content.contains("ensure!(") {
            lines.push(format!("Expected an assertion like: ensure!(!councillors.is_empty(),\"No councillors found\") {}",path.display()));
        }
    }
    Ok(lines)
}

/// The division identifier a spreadsheet means: a 2 digit province code, a 4 digit census
/// division code, a 7 digit census subdivision code, or a full identifier.
fn spreadsheet_identifier(divisions:&DivisionRegistry,identifier:&str) -> Result<String,LookupError> {
    match identifier.len() {
        2 => divisions.by_sgc(identifier).map(|d|d.id.clone()).ok_or_else(||LookupError::DivisionNotFound(identifier.to_string())),
        4 => Ok(format!("ocd-division/country:ca/cd:{}",identifier)),
        7 => Ok(format!("ocd-division/country:ca/csd:{}",identifier)),
        _ => Ok(identifier.to_string()),
    }
}

/// Check the identifiers and geographic names in a spreadsheet against the division registry.
pub fn validate_spreadsheet(divisions:&DivisionRegistry,fetcher:&dyn Fetcher,url:&str,identifier_header:&str,geographic_name_header:&str) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::new();
    for row in csv_dict_reader(fetcher,url,UTF_8)? {
        let identifier = row.get(identifier_header).ok_or_else(||anyhow!("No {} column in {}",identifier_header,url))?;
        let name = row.get(geographic_name_header).ok_or_else(||anyhow!("No {} column in {}",geographic_name_header,url))?;
        let identifier = spreadsheet_identifier(divisions,identifier.trim())?;
        let division = divisions.get(&identifier)?;
        if *name!=division.name {
            lines.push(format!("{}: name: {} not {}",identifier,division.name,name));
        }
    }
    Ok(lines)
}
