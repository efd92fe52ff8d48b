//! Jurisdiction modules and what they declare about themselves.
//!
//! Each jurisdiction module is a directory under the jurisdictions directory, named like
//! `ca_nb_moncton`. Its `definition.toml` declares the jurisdiction as a table named after the
//! class:
//! ```text
//! [Moncton]
//! classification = "legislature"
//! division_id = "ocd-division/country:ca/csd:1307022"
//! division_name = "Moncton"
//! name = "Moncton City Council"
//! url = "http://www.moncton.ca"
//! ```
//! and its `people.toml` declares the person scraper (see tasks.rs).

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Context;
use serde::{Serialize,Deserialize};
use crate::error::LookupError;

pub const DEFINITION_FILE : &str = "definition.toml";
pub const PEOPLE_FILE : &str = "people.toml";
pub const DEFAULT_CLASSIFICATION : &str = "legislature";

#[derive(Debug,Clone,PartialEq,Eq)]
pub struct JurisdictionModule {
    pub name : String,
    pub dir : PathBuf,
}

impl JurisdictionModule {
    pub fn definition_path(&self) -> PathBuf { self.dir.join(DEFINITION_FILE) }
    pub fn people_path(&self) -> PathBuf { self.dir.join(PEOPLE_FILE) }
    /// Modules listing election candidates rather than officeholders.
    pub fn is_candidates(&self) -> bool { self.name.ends_with("_candidates") }
    /// Modules gathering all the municipalities of a province.
    pub fn is_municipalities(&self) -> bool { self.name.ends_with("_municipalities") }
}

/// The registered jurisdiction modules: every directory of `dir` with a definition file, sorted by name.
pub fn load_modules(dir:&Path) -> anyhow::Result<Vec<JurisdictionModule>> {
    let mut modules = Vec::new();
    for entry in fs::read_dir(dir).with_context(||format!("Could not list jurisdictions in {}",dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.join(DEFINITION_FILE).is_file() {
            if path.is_dir() { log::warn!("Ignoring {} which has no {}",path.display(),DEFINITION_FILE); }
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        modules.push(JurisdictionModule{ name, dir: path });
    }
    modules.sort_by(|a,b|a.name.cmp(&b.name));
    log::debug!("Found {} jurisdiction modules in {}",modules.len(),dir.display());
    Ok(modules)
}

/// The jurisdiction table of a definition file.
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq,Eq)]
pub struct JurisdictionDefinition {
    pub division_id : String,
    #[serde(default,skip_serializing_if = "Option::is_none")]
    pub division_name : Option<String>,
    #[serde(default,skip_serializing_if = "Option::is_none")]
    pub name : Option<String>,
    #[serde(default,skip_serializing_if = "Option::is_none")]
    pub url : Option<String>,
    #[serde(default,skip_serializing_if = "Option::is_none")]
    pub classification : Option<String>,
}

impl JurisdictionDefinition {
    pub fn jurisdiction_id(&self) -> String {
        jurisdiction_id(&self.division_id,self.classification.as_deref())
    }
}

/// What a module actually declares.
#[derive(Debug,Clone,PartialEq,Eq,Serialize)]
pub struct ObservedMetadata {
    pub class_name : String,
    pub division_id : String,
    pub division_name : Option<String>,
    pub name : Option<String>,
    pub url : Option<String>,
    pub classification : Option<String>,
    pub jurisdiction_id : String,
}

/// e.g. `ocd-jurisdiction/country:ca/csd:1307022/legislature`
pub fn jurisdiction_id(division_id:&str,classification:Option<&str>) -> String {
    format!("{}/{}",division_id.replace("ocd-division","ocd-jurisdiction"),classification.unwrap_or(DEFAULT_CLASSIFICATION))
}

/// Find the jurisdiction in a definition file: the first table, in file order, with a non empty division_id.
/// Returns the table name (the class name) and its contents.
pub fn read_definition(content:&str) -> anyhow::Result<Option<(String,JurisdictionDefinition)>> {
    let table : toml::Table = toml::from_str(content)?;
    for (key,value) in table {
        let has_division_id = value.get("division_id").and_then(|v|v.as_str()).map(|s|!s.is_empty()).unwrap_or(false);
        if has_division_id {
            let definition : JurisdictionDefinition = value.try_into()?;
            return Ok(Some((key,definition)));
        }
    }
    Ok(None)
}

/// Read a module's definition file.
pub fn load_definition(module:&JurisdictionModule) -> anyhow::Result<(String,JurisdictionDefinition)> {
    let path = module.definition_path();
    let content = fs::read_to_string(&path).with_context(||format!("Could not read {}",path.display()))?;
    let found = read_definition(&content).with_context(||format!("Could not parse {}",path.display()))?;
    Ok(found.ok_or(LookupError::DefinitionNotFound(path))?)
}

pub fn extract(module:&JurisdictionModule) -> anyhow::Result<ObservedMetadata> {
    let (class_name,definition) = load_definition(module)?;
    Ok(ObservedMetadata{
        jurisdiction_id: definition.jurisdiction_id(),
        class_name,
        division_id: definition.division_id,
        division_name: definition.division_name,
        name: definition.name,
        url: definition.url,
        classification: definition.classification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONCTON : &str = r#"
# Moncton, New Brunswick
[Moncton]
classification = "legislature"
division_id = "ocd-division/country:ca/csd:1307022"
division_name = "Moncton"
name = "Moncton City Council"
url = "http://www.moncton.ca"
"#;

    fn module_with(dir:&Path,name:&str,definition:&str) -> JurisdictionModule {
        let module_dir = dir.join(name);
        fs::create_dir_all(&module_dir).unwrap();
        fs::write(module_dir.join(DEFINITION_FILE),definition).unwrap();
        JurisdictionModule{ name: name.to_string(), dir: module_dir }
    }

    #[test]
    fn extracts_observed_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let module = module_with(dir.path(),"ca_nb_moncton",MONCTON);
        let observed = extract(&module).unwrap();
        assert_eq!(observed.class_name,"Moncton");
        assert_eq!(observed.division_id,"ocd-division/country:ca/csd:1307022");
        assert_eq!(observed.division_name.as_deref(),Some("Moncton"));
        assert_eq!(observed.name.as_deref(),Some("Moncton City Council"));
        assert_eq!(observed.url.as_deref(),Some("http://www.moncton.ca"));
        assert_eq!(observed.jurisdiction_id,"ocd-jurisdiction/country:ca/csd:1307022/legislature");
    }

    #[test]
    fn first_table_with_a_division_id_wins() {
        let content = r#"
[Settings]
encoding = "utf-8"

[Quebec]
division_id = "ocd-division/country:ca/csd:2423027"
classification = "government"

[Other]
division_id = "ocd-division/country:ca/csd:1307022"
"#;
        let (class_name,definition) = read_definition(content).unwrap().unwrap();
        assert_eq!(class_name,"Quebec");
        assert_eq!(definition.jurisdiction_id(),"ocd-jurisdiction/country:ca/csd:2423027/government");
        assert_eq!(definition.name,None);
    }

    #[test]
    fn classification_defaults_to_legislature() {
        assert_eq!(jurisdiction_id("ocd-division/country:ca/province:ns",None),"ocd-jurisdiction/country:ca/province:ns/legislature");
    }

    #[test]
    fn definition_without_division_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let module = module_with(dir.path(),"ca_nb_moncton","[Moncton]\nname = \"Moncton City Council\"\ndivision_id = \"\"\n");
        let error = extract(&module).unwrap_err();
        assert_eq!(error.downcast_ref::<LookupError>(),Some(&LookupError::DefinitionNotFound(module.definition_path())));
    }

    #[test]
    fn modules_are_sorted_and_need_a_definition() {
        let dir = tempfile::tempdir().unwrap();
        module_with(dir.path(),"ca_ns",MONCTON);
        module_with(dir.path(),"ca_nb_moncton",MONCTON);
        fs::create_dir_all(dir.path().join("not_a_module")).unwrap();
        fs::write(dir.path().join("README.md"),"jurisdictions").unwrap();
        let modules = load_modules(dir.path()).unwrap();
        let names : Vec<&str> = modules.iter().map(|m|m.name.as_str()).collect();
        assert_eq!(names,vec!["ca_nb_moncton","ca_ns"]);
    }

    #[test]
    fn module_name_conventions() {
        let module = JurisdictionModule{ name: "ca_nb_municipalities".to_string(), dir: PathBuf::from("x") };
        assert!(module.is_municipalities());
        assert!(!module.is_candidates());
        let module = JurisdictionModule{ name: "ca_on_candidates".to_string(), dir: PathBuf::from("x") };
        assert!(module.is_candidates());
    }
}
