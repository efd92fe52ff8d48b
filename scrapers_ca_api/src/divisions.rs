//! Political divisions - the country, provinces and territories, census divisions and subdivisions, arrondissements.
//!
//! Loaded once from the Open Civic Data division file (country-ca.csv) and read only afterwards.
//! Identifiers look like `ocd-division/country:ca/csd:1307022`; the type of a division is the key of
//! its last segment, and its parent is the identifier with the last segment removed.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use anyhow::{anyhow, Context};
use once_cell::sync::OnceCell;
use serde::{Serialize,Deserialize};
use crate::error::LookupError;

const OCD_DIVISION_ROOT : &str = "ocd-division";

#[derive(Debug,Clone,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum DivisionType {
    Country,
    Province,
    Territory,
    /// Census division, `cd`
    CensusDivision,
    /// Census subdivision, `csd`
    CensusSubdivision,
    Arrondissement,
    /// Wards, electoral districts and the like. Loaded, but no naming rules apply.
    Other(String),
}

impl DivisionType {
    pub fn as_str(&self) -> &str {
        match self {
            DivisionType::Country => "country",
            DivisionType::Province => "province",
            DivisionType::Territory => "territory",
            DivisionType::CensusDivision => "cd",
            DivisionType::CensusSubdivision => "csd",
            DivisionType::Arrondissement => "arrondissement",
            DivisionType::Other(s) => s,
        }
    }
}

impl From<&str> for DivisionType {
    fn from(s: &str) -> Self {
        match s {
            "country" => DivisionType::Country,
            "province" => DivisionType::Province,
            "territory" => DivisionType::Territory,
            "cd" => DivisionType::CensusDivision,
            "csd" => DivisionType::CensusSubdivision,
            "arrondissement" => DivisionType::Arrondissement,
            other => DivisionType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DivisionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug,Clone,PartialEq,Eq,Serialize)]
pub struct Division {
    pub id : String,
    pub name : String,
    pub division_type : DivisionType,
    pub parent_id : Option<String>,
    /// Standard Geographical Classification code, e.g. "13" for New Brunswick, "1307022" for Moncton.
    pub sgc : Option<String>,
    /// Census type code, e.g. "C" for a city.
    pub classification : Option<String>,
    pub url : Option<String>,
    pub name_fr : Option<String>,
}

impl Division {
    /// The part of the identifier after the last colon, e.g. "1307022" or "nb".
    pub fn type_id(&self) -> &str { type_id(&self.id) }

    pub fn is_province_or_territory(&self) -> bool {
        matches!(self.division_type,DivisionType::Province|DivisionType::Territory)
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// The part of an OCD identifier after the last colon.
pub fn type_id(id:&str) -> &str {
    id.rsplit_once(':').map(|(_,t)|t).unwrap_or(id)
}

/// Split an identifier into its type and its parent's identifier.
fn parse_id(id:&str) -> anyhow::Result<(DivisionType,Option<String>)> {
    let (parent,last) = id.rsplit_once('/').ok_or_else(||anyhow!("Malformed division identifier {}",id))?;
    if !id.starts_with(OCD_DIVISION_ROOT) { return Err(anyhow!("Division identifier {} does not start with {}",id,OCD_DIVISION_ROOT)); }
    let (type_key,_) = last.split_once(':').ok_or_else(||anyhow!("Malformed division identifier {}",id))?;
    let parent = if parent==OCD_DIVISION_ROOT { None } else { Some(parent.to_string()) };
    Ok((DivisionType::from(type_key),parent))
}

/// A row of country-ca.csv. Other columns are ignored.
#[derive(Deserialize)]
struct DivisionRecord {
    id : String,
    name : String,
    #[serde(default)]
    name_fr : String,
    #[serde(default)]
    classification : String,
    #[serde(default)]
    sgc : String,
    #[serde(default)]
    url : String,
}

fn non_empty(s:String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

pub struct DivisionRegistry {
    /// In source order.
    divisions : Vec<Division>,
    index : HashMap<String,usize>,
    /// Province/territory sgc code to index in `divisions`. Built on first use.
    province_codes : OnceCell<HashMap<String,usize>>,
}

impl DivisionRegistry {
    pub fn load(path:&Path) -> anyhow::Result<Self> {
        log::info!("Loading divisions from {}",path.display());
        let file = File::open(path).with_context(||format!("Could not open division file {}",path.display()))?;
        Self::from_reader(file).with_context(||format!("Could not load division file {}",path.display()))
    }

    pub fn from_reader<R:Read>(reader:R) -> anyhow::Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut divisions = Vec::new();
        let mut index = HashMap::new();
        for record in reader.deserialize() {
            let record : DivisionRecord = record?;
            let (division_type,parent_id) = parse_id(&record.id)?;
            if index.contains_key(&record.id) { return Err(anyhow!("Duplicate division {}",record.id)); }
            index.insert(record.id.clone(),divisions.len());
            divisions.push(Division{
                id: record.id,
                name: record.name,
                division_type,
                parent_id,
                sgc: non_empty(record.sgc),
                classification: non_empty(record.classification),
                url: non_empty(record.url),
                name_fr: non_empty(record.name_fr),
            });
        }
        for division in &divisions {
            match &division.parent_id {
                Some(parent) if !index.contains_key(parent) => return Err(anyhow!("Division {} has no parent {} in the registry",division.id,parent)),
                None if division.division_type!=DivisionType::Country => return Err(anyhow!("Division {} has no parent",division.id)),
                _ => {}
            }
        }
        log::debug!("Loaded {} divisions",divisions.len());
        Ok(DivisionRegistry{ divisions, index, province_codes: OnceCell::new() })
    }

    pub fn len(&self) -> usize { self.divisions.len() }
    pub fn is_empty(&self) -> bool { self.divisions.is_empty() }

    pub fn get(&self,id:&str) -> Result<&Division,LookupError> {
        self.index.get(id).map(|&i|&self.divisions[i]).ok_or_else(||LookupError::DivisionNotFound(id.to_string()))
    }

    /// Every division of a country, in source order.
    pub fn all<'a>(&'a self,country_code:&str) -> impl Iterator<Item=&'a Division> + 'a {
        let country = format!("{}/country:{}",OCD_DIVISION_ROOT,country_code);
        let prefix = format!("{}/",country);
        self.divisions.iter().filter(move |d|d.id==country || d.id.starts_with(&prefix))
    }

    /// The divisions directly inside `id`, optionally only those of one type.
    pub fn children<'a>(&'a self,id:&str,division_type:Option<DivisionType>) -> impl Iterator<Item=&'a Division> + 'a {
        let id = id.to_string();
        self.divisions.iter().filter(move |d|d.parent_id.as_deref()==Some(id.as_str()) && division_type.as_ref().map(|t|*t==d.division_type).unwrap_or(true))
    }

    pub fn parent(&self,division:&Division) -> Result<&Division,LookupError> {
        let parent_id = division.parent_id.as_deref().ok_or_else(||LookupError::NoParent(division.id.clone()))?;
        self.get(parent_id)
    }

    /// The division with the given Standard Geographical Classification code.
    pub fn by_sgc(&self,sgc:&str) -> Option<&Division> {
        self.divisions.iter().find(|d|d.sgc.as_deref()==Some(sgc))
    }

    /// The province or territory whose sgc code is `sgc_prefix`, e.g. "13" for New Brunswick.
    pub fn resolve_province_code(&self,sgc_prefix:&str) -> Result<&Division,LookupError> {
        let codes = self.province_codes.get_or_try_init(||{
            let codes : HashMap<String,usize> = self.divisions.iter().enumerate()
                .filter(|(_,d)|d.is_province_or_territory())
                .filter_map(|(i,d)|d.sgc.clone().map(|sgc|(sgc,i)))
                .collect();
            if codes.is_empty() { Err(LookupError::NoProvinces) } else { Ok(codes) }
        })?;
        codes.get(sgc_prefix).map(|&i|&self.divisions[i]).ok_or_else(||LookupError::UnknownProvinceCode(sgc_prefix.to_string()))
    }

    /// The province or territory abbreviation ("nb") for a census division or subdivision identifier.
    pub fn province_abbreviation(&self,division_id:&str) -> Result<&str,LookupError> {
        let code = type_id(division_id);
        let prefix = code.get(..2).ok_or_else(||LookupError::UnknownProvinceCode(code.to_string()))?;
        Ok(self.resolve_province_code(prefix)?.type_id())
    }
}
