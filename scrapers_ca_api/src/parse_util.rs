//! Utilities for fetching documents and picking apart the html and csv they contain.
//! Used by the auditor (type name tables, styles of address, spreadsheets) and by the person scrapers.

use std::collections::HashMap;
use anyhow::anyhow;
use encoding_rs::{Encoding, UTF_8};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Somewhere to get documents from. Blocking; a failure is not retried.
pub trait Fetcher {
    fn fetch_bytes(&self,url:&str) -> anyhow::Result<Vec<u8>>;

    /// Fetch and decode with the given encoding. Malformed sequences are replaced, with a warning.
    fn fetch_text(&self,url:&str,encoding:&'static Encoding) -> anyhow::Result<String> {
        let bytes = self.fetch_bytes(url)?;
        let (text,_,had_errors) = encoding.decode(&bytes);
        if had_errors { log::warn!("{} is not valid {}",url,encoding.name()); }
        Ok(text.into_owned())
    }

    fn fetch_html(&self,url:&str) -> anyhow::Result<Html> {
        Ok(Html::parse_document(&self.fetch_text(url,UTF_8)?))
    }
}

/// Fetch over http(s) with a polite user agent.
pub struct HttpFetcher {
    client : reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(user_agent:&str) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder().user_agent(user_agent).build()?;
        Ok(HttpFetcher{client})
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_bytes(&self,url:&str) -> anyhow::Result<Vec<u8>> {
        log::info!("Downloading {}",url);
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

/// Look up an encoding by a label such as "utf-8" or "windows-1252".
pub fn encoding_for_label(label:&str) -> anyhow::Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(||anyhow!("Unknown encoding {}",label))
}

/// Read a remote csv file as a list of rows, each a map from column header to value.
pub fn csv_dict_reader(fetcher:&dyn Fetcher,url:&str,encoding:&'static Encoding) -> anyhow::Result<Vec<HashMap<String,String>>> {
    let text = fetcher.fetch_text(url,encoding)?;
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row : HashMap<String,String> = record?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn relative_url(base_url:&str,url:&str) -> anyhow::Result<String> {
    let base = reqwest::Url::parse(base_url)?;
    let res = base.join(url)?;
    Ok(res.to_string())
}

/// Compile a css selector, turning the parse error into something that can outlive the input.
pub fn selector(css:&str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|e|anyhow!("Bad selector {} : {:?}",css,e))
}

/// All the text below an element, with runs of whitespace collapsed to single spaces.
pub fn element_text(element:ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

pub fn clean_text(s:&str) -> String {
    s.split_whitespace().join(" ")
}

/// The text of the first element below `element` matching `selector`, if any.
pub fn first_text(element:ElementRef,selector:&Selector) -> Option<String> {
    element.select(selector).next().map(element_text).filter(|s|!s.is_empty())
}

/// The address of the first mailto: link below an element.
pub fn get_email(element:ElementRef) -> anyhow::Result<Option<String>> {
    let mailto = selector(r#"a[href^="mailto:"]"#)?;
    Ok(element.select(&mailto)
        .filter_map(|a|a.value().attr("href"))
        .map(|href|href.trim_start_matches("mailto:").split('?').next().unwrap_or("").trim().to_string())
        .find(|email|!email.is_empty()))
}

static PHONE : Lazy<Regex> = Lazy::new(||Regex::new(r"(?:\+?1[\s.-]*)?\(?\b(\d{3})\)?[\s.-]*(\d{3})[\s.-]*(\d{4})\b").unwrap());

/// The first phone number in the text with one of the given area codes, formatted as 902-555-1234.
pub fn get_phone(text:&str,area_codes:&[&str]) -> Option<String> {
    PHONE.captures_iter(text)
        .find(|c|area_codes.contains(&&c[1]))
        .map(|c|format!("{}-{}-{}",&c[1],&c[2],&c[3]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticFetcher;

    #[test]
    fn test_get_phone() {
        assert_eq!(Some("902-424-4471".to_string()),get_phone("Phone: (902) 424-4471",&["902"]));
        assert_eq!(Some("902-424-4471".to_string()),get_phone("Tel 1-902-424-4471 ext 2",&["902"]));
        assert_eq!(Some("418-641-6411".to_string()),get_phone("Fax 613 555 0101 / Tél. 418 641-6411",&["418"])); // skips other area codes
        assert_eq!(None,get_phone("Phone: 613-555-0101",&["902"]));
        assert_eq!(None,get_phone("no number here",&["902"]));
    }

    #[test]
    fn test_get_email() {
        let html = Html::parse_fragment(r#"<div><a href="/x">Home</a><a href="mailto:mla@example.ns.ca?subject=Hi">Email</a></div>"#);
        assert_eq!(Some("mla@example.ns.ca".to_string()),get_email(html.root_element()).unwrap());
        let html = Html::parse_fragment(r#"<div><a href="/x">Home</a></div>"#);
        assert_eq!(None,get_email(html.root_element()).unwrap());
    }

    #[test]
    fn test_relative_url() {
        assert_eq!("https://nslegislature.ca/members/profiles/jane-doe",relative_url("https://nslegislature.ca/members/profiles","/members/profiles/jane-doe").unwrap());
        assert_eq!("https://elsewhere.ca/a",relative_url("https://nslegislature.ca/members/profiles","https://elsewhere.ca/a").unwrap());
    }

    #[test]
    fn test_clean_text() {
        assert_eq!("Jane Doe",clean_text("\n  Jane \u{a0} Doe\t"));
    }

    #[test]
    fn csv_rows_are_decoded_with_the_given_encoding() {
        let mut fetcher = StaticFetcher::default();
        fetcher.add_bytes("https://example.org/sheet.csv",b"Identifier,Name\nocd-division/country:ca/csd:2423027,Qu\xe9bec\n".to_vec());
        let rows = csv_dict_reader(&fetcher,"https://example.org/sheet.csv",encoding_for_label("windows-1252").unwrap()).unwrap();
        assert_eq!(rows.len(),1);
        assert_eq!(rows[0]["Name"],"Québec");
        assert_eq!(rows[0]["Identifier"],"ocd-division/country:ca/csd:2423027");
    }

    #[test]
    fn unknown_encoding_label() {
        assert!(encoding_for_label("utf-8").is_ok());
        assert!(encoding_for_label("not-an-encoding").is_err());
    }
}
