//! The naming rules: given a division, what its jurisdiction module, legislative body
//! and class should be called.

use deunicode::deunicode;
use serde::Serialize;
use crate::divisions::{Division, DivisionRegistry, DivisionType};
use crate::error::LookupError;
use crate::type_names::TypeNames;

/// Vowels that take an elided article in French, "d'Amos" rather than "de Amos".
const FRENCH_VOWELS : [char;9] = ['A','À','E','É','I','Î','O','Ô','U'];
/// Standard Geographical Classification code of Québec; its municipal councils have French names.
const QUEBEC_SGC : &str = "24";
const AGGREGATION_SUFFIX : &str = "Municipalities";

/// What a jurisdiction module for a division is expected to declare.
#[derive(Debug,Clone,PartialEq,Eq,Serialize)]
pub struct ExpectedMetadata {
    pub module_name : String,
    pub name : String,
    pub class_name : String,
    pub url : Option<String>,
    pub division_name : String,
}

/// The lookup tables the naming rules need. Constructed once per run.
pub struct NamingContext<'f> {
    pub divisions : DivisionRegistry,
    pub type_names : TypeNames<'f>,
}

impl <'f> NamingContext<'f> {
    pub fn new(divisions:DivisionRegistry,type_names:TypeNames<'f>) -> Self {
        NamingContext{ divisions, type_names }
    }

    /// The expected configuration for the division with the given identifier.
    pub fn get_definition(&self,division_id:&str,aggregation:bool) -> anyhow::Result<ExpectedMetadata> {
        let division = self.divisions.get(division_id)?;
        self.derive(division,aggregation)
    }

    /// The expected configuration for a division. `aggregation` is for the pseudo jurisdiction
    /// gathering all the municipalities of a province.
    pub fn derive(&self,division:&Division,aggregation:bool) -> anyhow::Result<ExpectedMetadata> {
        let type_id = division.type_id();
        let (module_name,name) = match &division.division_type {
            DivisionType::Country => ("ca".to_string(),"Parliament of Canada".to_string()),
            DivisionType::Province | DivisionType::Territory => {
                let module_name = if aggregation { format!("ca_{}_municipalities",type_id) } else { format!("ca_{}",type_id) };
                let name = if aggregation {
                    format!("{} {}",division.name,AGGREGATION_SUFFIX)
                } else {
                    match type_id {
                        "nl" | "ns" => format!("{} House of Assembly",division.name),
                        "qc" => "Assemblée nationale du Québec".to_string(),
                        _ => format!("Legislative Assembly of {}",division.name),
                    }
                };
                (module_name,name)
            }
            DivisionType::CensusDivision => {
                let module_name = self.municipal_module_name(division)?;
                let infix = match self.type_names.division_type_name(classification(division)?)? {
                    "Regional municipality" => "Regional",
                    other => other,
                };
                (module_name,format!("{} {} Council",division.name,infix))
            }
            DivisionType::CensusSubdivision => {
                let module_name = self.municipal_module_name(division)?;
                let name = if type_id.starts_with(QUEBEC_SGC) {
                    if starts_with_vowel(&division.name) {
                        format!("Conseil municipal d'{}",division.name)
                    } else {
                        format!("Conseil municipal de {}",division.name)
                    }
                } else {
                    let infix = match self.type_names.subdivision_type_name(classification(division)?)? {
                        "Municipality" | "Specialized municipality" => "Municipal",
                        "District municipality" => "District",
                        "Regional municipality" => "Regional",
                        other => other,
                    };
                    format!("{} {} Council",division.name,infix)
                };
                (module_name,name)
            }
            DivisionType::Arrondissement => {
                let parent = self.divisions.parent(division)?;
                let module_name = format!("ca_{}_{}_{}",self.divisions.province_abbreviation(&parent.id)?,slug(&parent.name),slug(&division.name));
                let name = if starts_with_vowel(&division.name) {
                    format!("Conseil d'arrondissement d'{}",division.name)
                } else if let Some(rest) = division.name.strip_prefix("Le ") {
                    format!("Conseil d'arrondissement du {}",rest)
                } else {
                    format!("Conseil d'arrondissement de {}",division.name)
                };
                (module_name,name)
            }
            DivisionType::Other(division_type) => {
                return Err(LookupError::UnrecognizedType{ id: division.id.clone(), division_type: division_type.clone() }.into());
            }
        };
        let mut class_name = class_name(&division.name);
        if aggregation { class_name.push_str(AGGREGATION_SUFFIX); }
        Ok(ExpectedMetadata{
            module_name,
            name,
            class_name,
            url: division.url.clone(),
            division_name: division.name.clone(),
        })
    }

    /// ca_{province}_{slug}, for census divisions and subdivisions.
    fn municipal_module_name(&self,division:&Division) -> anyhow::Result<String> {
        Ok(format!("ca_{}_{}",self.divisions.province_abbreviation(&division.id)?,slug(&division.name)))
    }
}

fn classification(division:&Division) -> Result<&str,LookupError> {
    division.classification.as_deref().ok_or_else(||LookupError::MissingClassification(division.id.clone()))
}

fn starts_with_vowel(name:&str) -> bool {
    name.chars().next().map(|c|FRENCH_VOWELS.contains(&c)).unwrap_or(false)
}

/// A division name as an identifier: lowercase ascii, with spaces, apostrophes and dashes as
/// underscores, and periods dropped. "Saint-Jean-sur-Richelieu" becomes "saint_jean_sur_richelieu".
pub fn slug(name:&str) -> String {
    let translated = translate_slug_chars(&name.to_lowercase());
    // transliteration can produce upper case or punctuation of its own
    translate_slug_chars(&deunicode(&translated).to_lowercase())
}

fn translate_slug_chars(s:&str) -> String {
    s.chars().filter(|&c|c!='.').map(|c|match c {
        ' ' | '\'' | '-' | '—' | '–' => '_',
        c => c,
    }).collect()
}

/// A division name as a class identifier: "Rivière-du-Loup" becomes "RiviereDuLoup".
pub fn class_name(name:&str) -> String {
    let stripped : String = name.chars()
        .filter(|&c|c!='\'' && c!='.')
        .map(|c|if c=='—' || c=='–' { '-' } else { c })
        .collect();
    let joined : String = stripped.split([' ','-']).map(capitalize_word).collect();
    deunicode(&joined)
}

/// Words already starting with an upper case ascii letter are kept as is; others get an upper case
/// first letter and the rest in lower case.
fn capitalize_word(word:&str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) if first.is_ascii_uppercase() => word.to_string(),
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
    }
}
