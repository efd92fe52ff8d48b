//! Styles of address ("Mayor", "Councillor", "MLA"...) for each division's leader and members.
//! Kept in a spreadsheet with three sheets; loaded fresh for each audit.

use std::collections::HashMap;
use encoding_rs::UTF_8;
use serde::Deserialize;
use crate::config::Config;
use crate::parse_util::Fetcher;

const SHEETS : u32 = 3;

#[derive(Deserialize)]
struct StyleRow {
    #[serde(rename = "Identifier")]
    identifier : String,
    #[serde(rename = "Leader")]
    leader : String,
    #[serde(rename = "Member")]
    member : String,
}

#[derive(Debug,Default)]
pub struct StylesOfAddress {
    leader : HashMap<String,String>,
    member : HashMap<String,String>,
}

impl StylesOfAddress {
    pub fn load(fetcher:&dyn Fetcher,config:&Config) -> anyhow::Result<Self> {
        let mut styles = StylesOfAddress::default();
        for gid in 0..SHEETS {
            let text = fetcher.fetch_text(&config.styles_of_address_url(gid),UTF_8)?;
            styles.add_sheet(&text)?;
        }
        log::info!("Loaded styles of address for {} divisions",styles.member.len());
        Ok(styles)
    }

    /// Add the rows of one csv sheet. Later rows replace earlier ones for the same identifier.
    pub fn add_sheet(&mut self,csv:&str) -> anyhow::Result<()> {
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        for row in reader.deserialize() {
            let row : StyleRow = row?;
            self.leader.insert(row.identifier.clone(),row.leader);
            self.member.insert(row.identifier,row.member);
        }
        Ok(())
    }

    pub fn leader(&self,division_id:&str) -> Option<&str> { self.leader.get(division_id).map(|s|s.as_str()) }
    pub fn member(&self,division_id:&str) -> Option<&str> { self.member.get(division_id).map(|s|s.as_str()) }
}
