//! Fixtures shared by the unit tests: an in memory fetcher, a cut down division file,
//! and copies of the Statistics Canada type tables.

use std::cell::RefCell;
use std::collections::HashMap;
use anyhow::anyhow;
use crate::divisions::DivisionRegistry;
use crate::naming::NamingContext;
use crate::parse_util::Fetcher;
use crate::type_names::TypeNames;

/// Serves canned documents and remembers what was asked for.
#[derive(Default)]
pub(crate) struct StaticFetcher {
    pages : HashMap<String,Vec<u8>>,
    pub(crate) requests : RefCell<Vec<String>>,
}

impl StaticFetcher {
    pub(crate) fn add(&mut self,url:&str,body:&str) {
        self.add_bytes(url,body.as_bytes().to_vec());
    }
    pub(crate) fn add_bytes(&mut self,url:&str,body:Vec<u8>) {
        self.pages.insert(url.to_string(),body);
    }
    pub(crate) fn request_count(&self,url:&str) -> usize {
        self.requests.borrow().iter().filter(|u|u.as_str()==url).count()
    }
}

impl Fetcher for StaticFetcher {
    fn fetch_bytes(&self,url:&str) -> anyhow::Result<Vec<u8>> {
        self.requests.borrow_mut().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(||anyhow!("No page at {}",url))
    }
}

pub(crate) const CD_TYPES_URL : &str = "https://statcan.example/t1_4-eng.cfm";
pub(crate) const CSD_TYPES_URL : &str = "https://statcan.example/t1_5-eng.cfm";

pub(crate) const CD_TYPES_HTML : &str = r#"<html><body>
<table>
<thead><tr><th id="h1">Census division type</th></tr></thead>
<tbody>
<tr><th headers="h1" id="r1">CDR – Census division / Division de recensement</th><td>Manitoba</td></tr>
<tr><th headers="h1" id="r2">CT – County / Comté</th><td>New Brunswick, Nova Scotia, Ontario</td></tr>
<tr><th headers="h1" id="r3">RM – Regional municipality / Municipalité régionale</th><td>Ontario</td></tr>
<tr><th headers="h1" id="r4">TÉ – Territoire équivalent / Equivalent territory</th><td>Quebec</td></tr>
</tbody>
</table>
</body></html>"#;

// Statistics Canada uses a non-breaking space before the dash in this table.
pub(crate) const CSD_TYPES_HTML : &str = "<html><body>
<table>
<thead><tr><th id=\"h1\">Census subdivision type</th></tr></thead>
<tbody>
<tr><th headers=\"h1\">C\u{a0}– City / Cité</th><td>New Brunswick</td></tr>
<tr><th headers=\"h1\">CY\u{a0}– City / Cité</th><td>Ontario</td></tr>
<tr><th headers=\"h1\">DM\u{a0}– District municipality / Municipalité de district</th><td>British Columbia</td></tr>
<tr><th headers=\"h1\">MU\u{a0}– Municipality / Municipalité</th><td>Ontario</td></tr>
<tr><th headers=\"h1\">RGM\u{a0}– Regional municipality / Municipalité régionale</th><td>Nova Scotia</td></tr>
<tr><th headers=\"h1\">SM\u{a0}– Specialized municipality / Municipalité spécialisée</th><td>Alberta</td></tr>
<tr><th headers=\"h1\">T\u{a0}– Town / Ville</th><td>Nova Scotia</td></tr>
<tr><th headers=\"h1\">V\u{a0}– Ville / City</th><td>Quebec</td></tr>
</tbody>
</table>
</body></html>";

pub(crate) const SAMPLE_DIVISIONS : &str = "id,name,name_fr,classification,sgc,url
ocd-division/country:ca,Canada,Canada,,01,https://www.ourcommons.ca
ocd-division/country:ca/province:nl,Newfoundland and Labrador,Terre-Neuve-et-Labrador,,10,
ocd-division/country:ca/province:ns,Nova Scotia,Nouvelle-Écosse,,12,https://nslegislature.ca
ocd-division/country:ca/province:nb,New Brunswick,Nouveau-Brunswick,,13,
ocd-division/country:ca/province:qc,Québec,Québec,,24,
ocd-division/country:ca/province:on,Ontario,Ontario,,35,
ocd-division/country:ca/province:ab,Alberta,Alberta,,48,
ocd-division/country:ca/territory:yt,Yukon,Yukon,,60,
ocd-division/country:ca/cd:1307,Westmorland,Westmorland,CT,1307,
ocd-division/country:ca/cd:3518,Durham,Durham,RM,3518,
ocd-division/country:ca/csd:1209034,Halifax,Halifax,RGM,1209034,
ocd-division/country:ca/csd:1217030,Cape Breton,Cap-Breton,RGM,1217030,http://www.cbrm.ns.ca
ocd-division/country:ca/csd:1301006,Saint John,Saint John,C,1301006,http://www.saintjohn.ca
ocd-division/country:ca/csd:1307022,Moncton,Moncton,C,1307022,http://www.moncton.ca
ocd-division/country:ca/csd:3518013,Oshawa,Oshawa,CY,3518013,
ocd-division/country:ca/csd:3518029,Clarington,Clarington,MU,3518029,
ocd-division/country:ca/csd:4811052,Strathcona County,Strathcona County,SM,4811052,
ocd-division/country:ca/csd:2423027,Québec,Québec,V,2423027,https://www.ville.quebec.qc.ca
ocd-division/country:ca/csd:2466023,Montréal,Montréal,V,2466023,
ocd-division/country:ca/csd:2488055,Amos,Amos,V,2488055,
ocd-division/country:ca/csd:2466023/arrondissement:le_plateau-mont-royal,Le Plateau-Mont-Royal,Le Plateau-Mont-Royal,,,
ocd-division/country:ca/csd:2466023/arrondissement:outremont,Outremont,Outremont,,,
ocd-division/country:ca/csd:2466023/arrondissement:verdun,Verdun,Verdun,,,
ocd-division/country:ca/ed:35001-2013,Ajax,Ajax,,,
";

pub(crate) fn sample_registry() -> DivisionRegistry {
    DivisionRegistry::from_reader(SAMPLE_DIVISIONS.as_bytes()).unwrap()
}

/// A fetcher that knows the two type name tables.
pub(crate) fn type_table_fetcher() -> StaticFetcher {
    let mut fetcher = StaticFetcher::default();
    fetcher.add(CD_TYPES_URL,CD_TYPES_HTML);
    fetcher.add(CSD_TYPES_URL,CSD_TYPES_HTML);
    fetcher
}

pub(crate) fn naming_context(fetcher:&dyn Fetcher) -> NamingContext<'_> {
    NamingContext::new(sample_registry(),TypeNames::new(fetcher,CD_TYPES_URL,CSD_TYPES_URL))
}
