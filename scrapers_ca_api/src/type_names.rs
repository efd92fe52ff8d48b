//! Census division and census subdivision type names, e.g. "RM" is a "Regional municipality".
//!
//! Statistics Canada publishes these as html tables whose row header cells read
//! `RM – Regional municipality / Municipalité régionale`. Each table is fetched the first
//! time it is needed and kept for the life of the `TypeNames`.

use std::collections::HashMap;
use anyhow::anyhow;
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use scraper::Html;
use crate::error::LookupError;
use crate::parse_util::{selector, Fetcher};

static CODE_AND_NAME : Lazy<Regex> = Lazy::new(||Regex::new(r"(?s)^\s*(.+?)\s+–\s+(.+?)\s*$").unwrap());

pub struct TypeNames<'f> {
    fetcher : &'f dyn Fetcher,
    division_types_url : String,
    subdivision_types_url : String,
    division_types : OnceCell<HashMap<String,String>>,
    subdivision_types : OnceCell<HashMap<String,String>>,
}

impl <'f> TypeNames<'f> {
    pub fn new(fetcher:&'f dyn Fetcher,division_types_url:&str,subdivision_types_url:&str) -> Self {
        TypeNames {
            fetcher,
            division_types_url: division_types_url.to_string(),
            subdivision_types_url: subdivision_types_url.to_string(),
            division_types: OnceCell::new(),
            subdivision_types: OnceCell::new(),
        }
    }

    /// The name of a census division type, e.g. "Regional municipality" for "RM".
    pub fn division_type_name(&self,code:&str) -> anyhow::Result<&str> {
        let table = self.division_types.get_or_try_init(||fetch_type_names(self.fetcher,&self.division_types_url))?;
        lookup(table,"census division",code)
    }

    /// The name of a census subdivision type, e.g. "City" for "C".
    pub fn subdivision_type_name(&self,code:&str) -> anyhow::Result<&str> {
        let table = self.subdivision_types.get_or_try_init(||fetch_type_names(self.fetcher,&self.subdivision_types_url))?;
        lookup(table,"census subdivision",code)
    }
}

fn lookup<'a>(table:&'a HashMap<String,String>,table_name:&'static str,code:&str) -> anyhow::Result<&'a str> {
    table.get(code).map(|s|s.as_str()).ok_or_else(||LookupError::UnknownTypeName{ table: table_name, code: code.to_string() }.into())
}

fn fetch_type_names(fetcher:&dyn Fetcher,url:&str) -> anyhow::Result<HashMap<String,String>> {
    let document = fetcher.fetch_html(url)?;
    parse_type_names(&document).map_err(|e|e.context(format!("Could not read type names from {}",url)))
}

/// Read the `th[headers]` cells of the tables in a type name document.
/// Only the English half of the bilingual name is kept.
pub fn parse_type_names(document:&Html) -> anyhow::Result<HashMap<String,String>> {
    let header_cells = selector("table th[headers]")?;
    let mut names = HashMap::new();
    for th in document.select(&header_cells) {
        for text in th.children().filter_map(|node|node.value().as_text()) {
            if text.trim().is_empty() { continue; }
            let captures = CODE_AND_NAME.captures(text).ok_or_else(||anyhow!("Type name cell {:?} is not of the form code – name",&**text))?;
            let name = captures[2].split(" / ").next().unwrap_or("").trim();
            names.insert(captures[1].to_string(),name.to_string());
        }
    }
    if names.is_empty() { return Err(anyhow!("No type names found")); }
    Ok(names)
}
