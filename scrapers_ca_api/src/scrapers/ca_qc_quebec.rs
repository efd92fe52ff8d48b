//! Conseil municipal de Québec.

use anyhow::{anyhow, ensure};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use crate::parse_util::{element_text, get_phone, selector, Fetcher};
use crate::person::Person;
use super::PersonScraper;

const COUNCIL_PAGE : &str = "https://www.ville.quebec.qc.ca/apropos/gouvernance/conseil-municipal/membres.aspx";

static DISTRICT : Lazy<Regex> = Lazy::new(||Regex::new(r"^District (?:de|du|des) ([\w —–-]+)").unwrap());

pub struct QuebecPersonScraper;

/// The element children of `element` with the given tag name.
fn children_named<'a>(element:ElementRef<'a>,name:&'a str) -> impl Iterator<Item=ElementRef<'a>> + 'a {
    element.children().filter_map(ElementRef::wrap).filter(move |e|e.value().name()==name)
}

/// The nearest h2 before the section, which says whether it is the mayor's office or the council.
fn section_heading(section:ElementRef) -> Option<String> {
    section.prev_siblings().filter_map(ElementRef::wrap).find(|e|e.value().name()=="h2").map(element_text)
}

/// District names as the division registry spells them.
fn normalize_district(district:&str) -> String {
    match district {
        "Monts" => "Les Monts".to_string(),
        "Plateau" => "Le Plateau".to_string(),
        _ => {
            let district = district.trim().replace('–',"—");
            match district.strip_prefix("la ") {
                Some(rest) => format!("La {}",rest),
                None => district,
            }
        }
    }
}

impl PersonScraper for QuebecPersonScraper {
    fn scrape(&self,fetcher:&dyn Fetcher) -> anyhow::Result<Vec<Person>> {
        let page = fetcher.fetch_html(COUNCIL_PAGE)?;
        let sections : Vec<ElementRef> = page.select(&selector("div.membres-conseil-municipal")?).collect();
        ensure!(!sections.is_empty(),"No councillors found");
        let select_job_title = selector(r#"p[itemprop="jobTitle"] > a"#)?;
        let select_image = selector("figure [src]")?;
        let mut people = Vec::new();
        for section in sections {
            let councillors : Vec<ElementRef> = children_named(section,"div").collect();
            ensure!(!councillors.is_empty(),"No councillors found");
            let heading = section_heading(section).ok_or_else(||anyhow!("Council section without a heading"))?;
            for councillor in councillors {
                let name = children_named(councillor,"h3").next().map(element_text).ok_or_else(||anyhow!("Councillor without a name"))?;
                if name.contains("vacant") { continue; }
                let (district,role) = if heading.contains("Mairie") {
                    ("Québec".to_string(),"Maire")
                } else {
                    let title = councillor.select(&select_job_title).next().map(element_text).ok_or_else(||anyhow!("No district for {}",name))?;
                    let captures = DISTRICT.captures(&title).ok_or_else(||anyhow!("Could not find the district in {:?}",title))?;
                    (normalize_district(&captures[1]),"Conseiller")
                };
                let mut person = Person::new(&name,&district,role);
                person.add_source(COUNCIL_PAGE);
                let image = councillor.select(&select_image).next().and_then(|e|e.value().attr("src")).ok_or_else(||anyhow!("No photo of {}",name))?;
                person.image = Some(image.to_string());
                person.add_contact("voice",get_phone(&element_text(councillor),&["418"]).as_deref(),Some("legislature"));
                people.push(person);
            }
        }
        Ok(people)
    }
}
