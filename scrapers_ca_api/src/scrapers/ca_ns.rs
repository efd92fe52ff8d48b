//! Members of the Nova Scotia House of Assembly.

use std::collections::HashMap;
use anyhow::{anyhow, ensure};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use crate::parse_util::{element_text, first_text, get_email, get_phone, relative_url, selector, Fetcher};
use crate::person::Person;
use super::PersonScraper;

const COUNCIL_PAGE : &str = "https://nslegislature.ca/members/profiles";

static PARTIES : Lazy<HashMap<&'static str,&'static str>> = Lazy::new(||HashMap::from([
    ("Liberal","Nova Scotia Liberal Party"),
    ("PC","Progressive Conservative Association of Nova Scotia"),
    ("NDP","Nova Scotia New Democratic Party"),
    ("Independent","Independent"),
]));

static HONORIFICS : Lazy<Regex> = Lazy::new(||Regex::new(r"Honourable |\(MLA Elect\)|\(New MLA Elect\)").unwrap());

pub struct NovaScotiaPersonScraper;

impl PersonScraper for NovaScotiaPersonScraper {
    fn scrape(&self,fetcher:&dyn Fetcher) -> anyhow::Result<Vec<Person>> {
        let page = fetcher.fetch_html(COUNCIL_PAGE)?;
        let members : Vec<ElementRef> = page.select(&selector(r#"div.view-display-id-page_mlas_current_tiles div[class*="views-row-"]"#)?).collect();
        ensure!(!members.is_empty(),"No members found");
        let select_district = selector("div.views-field-field-constituency > div")?;
        let select_party = selector("span.party-name")?;
        let select_link = selector("[href]")?;
        let select_name = selector("div.views-field-field-last-name > div > h1")?;
        let select_image = selector(r#"div.field-content img[typeof="foaf:Image"]"#)?;
        let select_contact = selector("div.mla-current-profile-contact")?;
        let mut people = Vec::new();
        for member in members {
            let district = first_text(member,&select_district).ok_or_else(||anyhow!("Member without a constituency"))?;
            let party = first_text(member,&select_party).ok_or_else(||anyhow!("No party for {}",district))?;
            if party=="Vacant" { continue; }
            let party = party.replace("LIberal","Liberal");
            let party = PARTIES.get(party.as_str()).ok_or_else(||anyhow!("Unknown party {} in {}",party,district))?;

            let href = member.select(&select_link).next().and_then(|a|a.value().attr("href")).ok_or_else(||anyhow!("No profile link for {}",district))?;
            let detail_url = relative_url(COUNCIL_PAGE,href)?;
            let detail = fetcher.fetch_html(&detail_url)?;

            let name = detail.select(&select_name).next().map(element_text).ok_or_else(||anyhow!("No name on {}",detail_url))?;
            let name = HONORIFICS.replace_all(&name,"");
            let mut person = Person::new(&name,&district,"MLA");
            person.party = Some(party.to_string());
            person.image = detail.select(&select_image).next().and_then(|img|img.value().attr("src")).map(|src|src.to_string());

            let contact = detail.select(&select_contact).next().ok_or_else(||anyhow!("No contact details on {}",detail_url))?;
            person.add_contact("email",get_email(contact)?.as_deref(),None);
            person.add_contact("voice",get_phone(&element_text(contact),&["902"]).as_deref(),Some("constituency"));

            person.add_source(COUNCIL_PAGE);
            person.add_source(&detail_url);
            people.push(person);
        }
        Ok(people)
    }
}
