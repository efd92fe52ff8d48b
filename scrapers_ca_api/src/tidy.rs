//! The consistency audit. Compares what each jurisdiction module declares with what the naming
//! rules expect, prints what needs a person's attention, and corrects class names, division
//! names and urls in place.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context};
use url::Url;
use crate::metadata::{extract, JurisdictionModule, DEFAULT_CLASSIFICATION};
use crate::naming::NamingContext;
use crate::source_edit::{rename_table, set_table_field};
use crate::styles::StylesOfAddress;

#[derive(Debug,Clone,Copy,Default)]
pub struct AuditOptions {
    /// Report corrections without writing them.
    pub dry_run : bool,
}

#[derive(Debug,Clone,PartialEq,Eq)]
pub enum FindingKind {
    DuplicateDivisionId(String),
    DuplicateJurisdictionId(String),
    MissingMemberStyle,
    MissingLeaderStyle,
    /// A url that is not just a home page, for a division with no canonical url.
    CheckUrl(String),
    NameMismatch{ found : Option<String>, expected : String },
    Classification(Option<String>),
    ModuleName{ expected : String },
}

/// Something needing a person's attention.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct Finding {
    pub module_name : String,
    pub kind : FindingKind,
}

impl Display for Finding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = &self.module_name;
        match &self.kind {
            FindingKind::DuplicateDivisionId(id) => write!(f,"{:<60} Duplicate division_id {}",name,id),
            FindingKind::DuplicateJurisdictionId(id) => write!(f,"{:<60} Duplicate jurisdiction_id {}",name,id),
            FindingKind::MissingMemberStyle => write!(f,"{:<60} Missing member style of address",name),
            FindingKind::MissingLeaderStyle => write!(f,"{:<60} Missing leader style of address",name),
            FindingKind::CheckUrl(url) => write!(f,"{:<60} Check: {}",name,url),
            FindingKind::NameMismatch{found,expected} => write!(f,"{:<60} Expected {}",found.as_deref().unwrap_or("(no name)"),expected),
            FindingKind::Classification(classification) => write!(f,"{:<60} Expected {} ({})",classification.as_deref().unwrap_or("(no classification)"),DEFAULT_CLASSIFICATION,name),
            FindingKind::ModuleName{expected} => write!(f,"{:<60} Expected {}",name,expected),
        }
    }
}

/// A change made (or, in a dry run, that would be made) to a module's files.
#[derive(Debug,Clone,PartialEq,Eq)]
pub enum Correction {
    ClassRenamed{ path : PathBuf, from : String, to : String },
    FieldUpdated{ path : PathBuf, field : &'static str, from : Option<String>, to : String },
}

impl Display for Correction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Correction::ClassRenamed{path,from,to} => write!(f,"{}: class {} -> {}",path.display(),from,to),
            Correction::FieldUpdated{path,field,from,to} => write!(f,"{}: {} {} -> {}",path.display(),field,from.as_deref().unwrap_or("(none)"),to),
        }
    }
}

#[derive(Debug,Default)]
pub struct AuditReport {
    pub findings : Vec<Finding>,
    pub corrections : Vec<Correction>,
    pub files_written : Vec<PathBuf>,
}

impl AuditReport {
    fn add(&mut self,module:&JurisdictionModule,kind:FindingKind) {
        self.findings.push(Finding{ module_name: module.name.clone(), kind });
    }
}

/// The toml files of a module, as read and as edited so far.
struct ModuleFiles {
    files : Vec<EditedFile>,
}

struct EditedFile {
    path : PathBuf,
    original : String,
    current : String,
}

impl ModuleFiles {
    fn read(dir:&Path) -> anyhow::Result<Self> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).with_context(||format!("Could not list {}",dir.display()))? {
            let path = entry?.path();
            if path.is_file() && path.extension().map(|e|e=="toml").unwrap_or(false) { paths.push(path); }
        }
        paths.sort();
        let mut files = Vec::new();
        for path in paths {
            let original = fs::read_to_string(&path).with_context(||format!("Could not read {}",path.display()))?;
            files.push(EditedFile{ current: original.clone(), original, path });
        }
        Ok(ModuleFiles{files})
    }

    fn get_mut(&mut self,path:&Path) -> anyhow::Result<&mut EditedFile> {
        self.files.iter_mut().find(|f|f.path==path).ok_or_else(||anyhow!("{} disappeared during the audit",path.display()))
    }

    fn write_changed(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for file in self.files.iter().filter(|f|f.current!=f.original) {
            fs::write(&file.path,&file.current).with_context(||format!("Could not write {}",file.path.display()))?;
            log::info!("Updated {}",file.path.display());
            written.push(file.path.clone());
        }
        Ok(written)
    }
}

/// A url with an http(s) scheme and nothing after the host, not even a slash.
pub fn is_home_page_url(url:&str) -> bool {
    let Ok(parsed) = Url::parse(url) else { return false };
    let after_scheme = url.split_once("://").map(|(_,rest)|rest).unwrap_or("");
    matches!(parsed.scheme(),"http"|"https") && parsed.host().is_some() && !after_scheme.contains(['/','?','#'])
}

/// Audit the modules in order. Provincial municipality aggregations and candidate lists are
/// skipped. A division that cannot be resolved by the naming rules stops the audit.
pub fn audit(context:&NamingContext,modules:&[JurisdictionModule],styles:&StylesOfAddress,options:&AuditOptions) -> anyhow::Result<AuditReport> {
    let mut report = AuditReport::default();
    let mut division_ids = HashSet::new();
    let mut jurisdiction_ids = HashSet::new();
    for module in modules {
        if module.is_candidates() || module.is_municipalities() {
            log::debug!("Skipping {}",module.name);
            continue;
        }
        let observed = extract(module)?;
        log::debug!("Checking {} ({})",module.name,observed.division_id);
        // the first module to use an identifier keeps it
        if !division_ids.insert(observed.division_id.clone()) {
            report.add(module,FindingKind::DuplicateDivisionId(observed.division_id.clone()));
        }
        if !jurisdiction_ids.insert(observed.jurisdiction_id.clone()) {
            report.add(module,FindingKind::DuplicateJurisdictionId(observed.jurisdiction_id.clone()));
        }
        let expected = context.get_definition(&observed.division_id,false).with_context(||format!("Could not work out what {} should be called",module.name))?;

        if styles.member(&observed.division_id).is_none() { report.add(module,FindingKind::MissingMemberStyle); }
        if styles.leader(&observed.division_id).is_none() { report.add(module,FindingKind::MissingLeaderStyle); }

        let expected_url = expected.url.as_deref().filter(|u|!u.is_empty());
        if let Some(url) = observed.url.as_deref().filter(|u|!u.is_empty()) {
            if expected_url.is_none() && !is_home_page_url(url) { report.add(module,FindingKind::CheckUrl(url.to_string())); }
        }
        if observed.name.as_deref()!=Some(expected.name.as_str()) {
            report.add(module,FindingKind::NameMismatch{ found: observed.name.clone(), expected: expected.name.clone() });
        }
        if observed.classification.as_deref()!=Some(DEFAULT_CLASSIFICATION) {
            report.add(module,FindingKind::Classification(observed.classification.clone()));
        }

        let definition_path = module.definition_path();
        let mut files = ModuleFiles::read(&module.dir)?;
        let mut class_name = observed.class_name.clone();
        if observed.class_name!=expected.class_name {
            for file in files.files.iter_mut() {
                if let Some(renamed) = rename_table(&file.current,&observed.class_name,&expected.class_name)? {
                    file.current = renamed;
                    if file.path==definition_path { class_name = expected.class_name.clone(); }
                    report.corrections.push(Correction::ClassRenamed{ path: file.path.clone(), from: observed.class_name.clone(), to: expected.class_name.clone() });
                }
            }
        }
        if observed.division_name.as_deref()!=Some(expected.division_name.as_str()) {
            let definition = files.get_mut(&definition_path)?;
            definition.current = set_table_field(&definition.current,&class_name,"division_name",&expected.division_name)?;
            report.corrections.push(Correction::FieldUpdated{ path: definition_path.clone(), field: "division_name", from: observed.division_name.clone(), to: expected.division_name.clone() });
        }
        if let Some(url) = expected_url {
            if observed.url.as_deref()!=Some(url) {
                let definition = files.get_mut(&definition_path)?;
                definition.current = set_table_field(&definition.current,&class_name,"url",url)?;
                report.corrections.push(Correction::FieldUpdated{ path: definition_path.clone(), field: "url", from: observed.url.clone(), to: url.to_string() });
            }
        }
        if !options.dry_run {
            report.files_written.extend(files.write_changed()?);
        }

        if module.name!=expected.module_name {
            report.add(module,FindingKind::ModuleName{ expected: expected.module_name.clone() });
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{load_modules, DEFINITION_FILE, PEOPLE_FILE};
    use crate::divisions::DivisionRegistry;
    use crate::testing::{naming_context, type_table_fetcher, CD_TYPES_URL, CSD_TYPES_URL};
    use crate::type_names::TypeNames;

    const MONCTON : &str = r#"[Moncton]
classification = "legislature"
division_id = "ocd-division/country:ca/csd:1307022"
division_name = "Moncton"
name = "Moncton City Council"
url = "http://www.moncton.ca"
"#;

    const QUEBEC : &str = r#"[Quebec]
classification = "legislature"
division_id = "ocd-division/country:ca/csd:2423027"
division_name = "Québec"
name = "Conseil municipal de Québec"
url = "https://www.ville.quebec.qc.ca"
"#;

    const NOVA_SCOTIA : &str = r#"[NovaScotia]
classification = "legislature"
division_id = "ocd-division/country:ca/province:ns"
division_name = "Nova Scotia"
name = "Nova Scotia House of Assembly"
url = "https://nslegislature.ca"
"#;

    const DRIFTED_CAPE_BRETON : &str = r#"# Cape Breton Regional Municipality
[CapeBretonRegional]
classification = "legislature"
division_id = "ocd-division/country:ca/csd:1217030"
division_name = "Cape Breton Regional Municipality"
name = "Cape Breton Regional Municipality Council"
url = "http://www.cbrm.ns.ca/"
"#;

    const CAPE_BRETON_PEOPLE : &str = r#"council_page = "http://www.cbrm.ns.ca/councillors"

[CapeBretonRegionalPersonScraper]
base = "CanadianScraper"
"#;

    const CAPE_BRETON_POSTS : &str = r#"[[CapeBretonRegional.posts]]
label = "Cape Breton"
role = "Mayor"
"#;

    fn halifax(url:&str) -> String {
        format!("[Halifax]\nclassification = \"legislature\"\ndivision_id = \"ocd-division/country:ca/csd:1209034\"\ndivision_name = \"Halifax\"\nname = \"Halifax Regional Council\"\nurl = \"{}\"\n",url)
    }

    fn write_module(root:&Path,name:&str,files:&[(&str,&str)]) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for (file,content) in files { fs::write(dir.join(file),content).unwrap(); }
    }

    fn styles() -> StylesOfAddress {
        let mut styles = StylesOfAddress::default();
        styles.add_sheet("Identifier,Leader,Member
ocd-division/country:ca/province:ns,Premier,MLA
ocd-division/country:ca/csd:1307022,Mayor,Councillor
ocd-division/country:ca/csd:2423027,Maire,Conseiller
ocd-division/country:ca/csd:1217030,Mayor,Councillor
ocd-division/country:ca/csd:1209034,Mayor,Councillor
").unwrap();
        styles
    }

    fn run(root:&Path,options:AuditOptions) -> AuditReport {
        let fetcher = type_table_fetcher();
        let context = naming_context(&fetcher);
        let modules = load_modules(root).unwrap();
        audit(&context,&modules,&styles(),&options).unwrap()
    }

    fn drifted_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(),"ca_ns_cape_breton",&[(DEFINITION_FILE,DRIFTED_CAPE_BRETON),(PEOPLE_FILE,CAPE_BRETON_PEOPLE),("posts.toml",CAPE_BRETON_POSTS)]);
        dir
    }

    #[test]
    fn consistent_modules_have_nothing_to_report() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(),"ca_nb_moncton",&[(DEFINITION_FILE,MONCTON)]);
        write_module(dir.path(),"ca_qc_quebec",&[(DEFINITION_FILE,QUEBEC)]);
        write_module(dir.path(),"ca_ns",&[(DEFINITION_FILE,NOVA_SCOTIA)]);
        let report = run(dir.path(),AuditOptions::default());
        assert!(report.findings.is_empty());
        assert!(report.corrections.is_empty());
        assert!(report.files_written.is_empty());
    }

    #[test]
    fn drift_is_corrected_once() {
        let dir = drifted_tree();
        let module_dir = dir.path().join("ca_ns_cape_breton");
        let report = run(dir.path(),AuditOptions::default());
        assert_eq!(report.findings,vec![Finding{ module_name: "ca_ns_cape_breton".to_string(), kind: FindingKind::NameMismatch{ found: Some("Cape Breton Regional Municipality Council".to_string()), expected: "Cape Breton Regional Council".to_string() } }]);
        assert_eq!(report.corrections,vec![
            Correction::ClassRenamed{ path: module_dir.join(DEFINITION_FILE), from: "CapeBretonRegional".to_string(), to: "CapeBreton".to_string() },
            Correction::ClassRenamed{ path: module_dir.join("posts.toml"), from: "CapeBretonRegional".to_string(), to: "CapeBreton".to_string() },
            Correction::FieldUpdated{ path: module_dir.join(DEFINITION_FILE), field: "division_name", from: Some("Cape Breton Regional Municipality".to_string()), to: "Cape Breton".to_string() },
            Correction::FieldUpdated{ path: module_dir.join(DEFINITION_FILE), field: "url", from: Some("http://www.cbrm.ns.ca/".to_string()), to: "http://www.cbrm.ns.ca".to_string() },
        ]);
        let definition = fs::read_to_string(module_dir.join(DEFINITION_FILE)).unwrap();
        assert_eq!(definition,r#"# Cape Breton Regional Municipality
[CapeBreton]
classification = "legislature"
division_id = "ocd-division/country:ca/csd:1217030"
division_name = "Cape Breton"
name = "Cape Breton Regional Municipality Council"
url = "http://www.cbrm.ns.ca"
"#);
        assert_eq!(fs::read_to_string(module_dir.join("posts.toml")).unwrap(),"[[CapeBreton.posts]]\nlabel = \"Cape Breton\"\nrole = \"Mayor\"\n");
        // the scraper table only starts with the class name
        assert_eq!(fs::read_to_string(module_dir.join(PEOPLE_FILE)).unwrap(),CAPE_BRETON_PEOPLE);
        assert_eq!(report.files_written.len(),2);

        let again = run(dir.path(),AuditOptions::default());
        assert!(again.corrections.is_empty());
        assert!(again.files_written.is_empty());
        assert_eq!(again.findings,report.findings);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = drifted_tree();
        let module_dir = dir.path().join("ca_ns_cape_breton");
        let report = run(dir.path(),AuditOptions{ dry_run: true });
        assert_eq!(report.corrections.len(),4);
        assert!(report.files_written.is_empty());
        assert_eq!(fs::read_to_string(module_dir.join(DEFINITION_FILE)).unwrap(),DRIFTED_CAPE_BRETON);
        assert_eq!(fs::read_to_string(module_dir.join("posts.toml")).unwrap(),CAPE_BRETON_POSTS);
    }

    #[test]
    fn duplicates_are_reported_once_against_the_later_module() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(),"ca_ns_halifax",&[(DEFINITION_FILE,&halifax("https://www.halifax.ca"))]);
        write_module(dir.path(),"ca_ns_halifax_regional",&[(DEFINITION_FILE,&halifax("https://www.halifax.ca"))]);
        let report = run(dir.path(),AuditOptions::default());
        let duplicates : Vec<&Finding> = report.findings.iter().filter(|f|matches!(f.kind,FindingKind::DuplicateDivisionId(_)|FindingKind::DuplicateJurisdictionId(_))).collect();
        assert_eq!(duplicates,vec![
            &Finding{ module_name: "ca_ns_halifax_regional".to_string(), kind: FindingKind::DuplicateDivisionId("ocd-division/country:ca/csd:1209034".to_string()) },
            &Finding{ module_name: "ca_ns_halifax_regional".to_string(), kind: FindingKind::DuplicateJurisdictionId("ocd-jurisdiction/country:ca/csd:1209034/legislature".to_string()) },
        ]);
        assert!(report.findings.contains(&Finding{ module_name: "ca_ns_halifax_regional".to_string(), kind: FindingKind::ModuleName{ expected: "ca_ns_halifax".to_string() } }));
    }

    #[test]
    fn urls_beyond_a_home_page_need_checking() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(),"ca_ns_halifax",&[(DEFINITION_FILE,&halifax("https://www.halifax.ca/city-hall/regional-council"))]);
        let report = run(dir.path(),AuditOptions::default());
        assert_eq!(report.findings,vec![Finding{ module_name: "ca_ns_halifax".to_string(), kind: FindingKind::CheckUrl("https://www.halifax.ca/city-hall/regional-council".to_string()) }]);
        // without a canonical url, the declared one is left alone
        assert!(report.corrections.is_empty());
    }

    #[test]
    fn home_page_urls() {
        assert!(is_home_page_url("https://www.halifax.ca"));
        assert!(is_home_page_url("http://www.moncton.ca"));
        assert!(!is_home_page_url("http://www.moncton.ca/"));
        assert!(!is_home_page_url("http://www.moncton.ca?lang=fr"));
        assert!(!is_home_page_url("http://www.moncton.ca#council"));
        assert!(!is_home_page_url("ftp://www.moncton.ca"));
        assert!(!is_home_page_url("www.moncton.ca"));
    }

    #[test]
    fn missing_styles_and_odd_classification() {
        let dir = tempfile::tempdir().unwrap();
        let saint_john = "[SaintJohn]\nclassification = \"government\"\ndivision_id = \"ocd-division/country:ca/csd:1301006\"\ndivision_name = \"Saint John\"\nname = \"Saint John City Council\"\nurl = \"http://www.saintjohn.ca\"\n";
        write_module(dir.path(),"ca_nb_saint_john",&[(DEFINITION_FILE,saint_john)]);
        let report = run(dir.path(),AuditOptions::default());
        let kinds : Vec<FindingKind> = report.findings.into_iter().map(|f|f.kind).collect();
        assert_eq!(kinds,vec![FindingKind::MissingMemberStyle,FindingKind::MissingLeaderStyle,FindingKind::Classification(Some("government".to_string()))]);
    }

    #[test]
    fn aggregations_and_candidates_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(),"ca_nb_municipalities",&[(DEFINITION_FILE,"[NewBrunswickMunicipalities]\ndivision_id = \"ocd-division/country:ca/province:nb\"\n")]);
        write_module(dir.path(),"ca_on_candidates",&[(DEFINITION_FILE,"[OntarioCandidates]\ndivision_id = \"ocd-division/country:ca/ed:35001-2013\"\n")]);
        let report = run(dir.path(),AuditOptions::default());
        assert!(report.findings.is_empty());
        assert!(report.corrections.is_empty());
    }

    #[test]
    fn unrecognized_division_stops_the_audit() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(),"ca_on_ajax",&[(DEFINITION_FILE,"[Ajax]\nclassification = \"legislature\"\ndivision_id = \"ocd-division/country:ca/ed:35001-2013\"\n")]);
        let fetcher = type_table_fetcher();
        let context = naming_context(&fetcher);
        let modules = load_modules(dir.path()).unwrap();
        assert!(audit(&context,&modules,&styles(),&AuditOptions::default()).is_err());
    }

    #[test]
    fn bundled_jurisdictions_are_consistent() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
        let fetcher = type_table_fetcher();
        let context = NamingContext::new(DivisionRegistry::load(&root.join("data/country-ca.csv")).unwrap(),TypeNames::new(&fetcher,CD_TYPES_URL,CSD_TYPES_URL));
        let modules = load_modules(&root.join("jurisdictions")).unwrap();
        let report = audit(&context,&modules,&StylesOfAddress::default(),&AuditOptions{ dry_run: true }).unwrap();
        let problems : Vec<&Finding> = report.findings.iter().filter(|f|!matches!(f.kind,FindingKind::MissingMemberStyle|FindingKind::MissingLeaderStyle)).collect();
        assert!(problems.is_empty(),"{:?}",problems);
        assert!(report.corrections.is_empty(),"{:?}",report.corrections);
    }

    #[test]
    fn finding_lines_are_aligned() {
        let finding = Finding{ module_name: "ca_ns".to_string(), kind: FindingKind::MissingLeaderStyle };
        assert_eq!(finding.to_string(),format!("ca_ns{} Missing leader style of address"," ".repeat(55)));
    }
}
