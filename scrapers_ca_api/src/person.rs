//! People holding office, and the organizations and posts they hold it in.

use serde::Serialize;

#[derive(Debug,Clone,Serialize,PartialEq,Eq)]
pub struct ContactDetail {
    /// e.g. "email", "voice", "fax"
    #[serde(rename = "type")]
    pub contact_type : String,
    pub value : String,
    /// Where the contact is, e.g. "legislature" or "constituency".
    #[serde(default,skip_serializing_if = "Option::is_none")]
    pub note : Option<String>,
}

/// Information about a representative.
/// Not all fields are known for each person.
#[derive(Debug,Clone,Serialize,PartialEq,Eq)]
pub struct Person {
    pub name : String,
    pub district : String,
    pub role : String,
    /// The classification of the organization the person sits in, usually "legislature".
    pub primary_org : String,
    #[serde(default,skip_serializing_if = "Option::is_none")]
    pub party : Option<String>,
    #[serde(default,skip_serializing_if = "Option::is_none")]
    pub image : Option<String>,
    pub contact_details : Vec<ContactDetail>,
    pub links : Vec<String>,
    pub sources : Vec<String>,
}

impl Person {
    pub fn new(name:&str,district:&str,role:&str) -> Self {
        Person{
            name: name.trim().to_string(),
            district: district.trim().to_string(),
            role: role.to_string(),
            primary_org: "legislature".to_string(),
            party: None,
            image: None,
            contact_details: vec![],
            links: vec![],
            sources: vec![],
        }
    }

    /// Blank values are ignored, so a missing phone number or e-mail can be passed straight through.
    pub fn add_contact(&mut self,contact_type:&str,value:Option<&str>,note:Option<&str>) {
        if let Some(value) = value.map(str::trim).filter(|v|!v.is_empty()) {
            self.contact_details.push(ContactDetail{ contact_type: contact_type.to_string(), value: value.to_string(), note: note.map(|n|n.to_string()) });
        }
    }

    pub fn add_link(&mut self,url:&str) {
        if !self.links.iter().any(|l|l==url) { self.links.push(url.to_string()); }
    }

    pub fn add_source(&mut self,url:&str) {
        if !self.sources.iter().any(|s|s==url) { self.sources.push(url.to_string()); }
    }

    pub fn contact(&self,contact_type:&str) -> Option<&str> {
        self.contact_details.iter().find(|c|c.contact_type==contact_type).map(|c|c.value.as_str())
    }
}

#[derive(Debug,Clone,Serialize,PartialEq,Eq)]
pub struct Post {
    pub role : String,
    pub label : String,
    pub division_id : String,
}

/// A body people are members of, with the seats in it.
#[derive(Debug,Clone,Serialize,PartialEq,Eq)]
pub struct Organization {
    pub name : String,
    pub classification : String,
    pub posts : Vec<Post>,
}

impl Organization {
    pub fn new(name:&str,classification:&str) -> Self {
        Organization{ name: name.to_string(), classification: classification.to_string(), posts: vec![] }
    }

    pub fn add_post(&mut self,role:&str,label:&str,division_id:&str) {
        self.posts.push(Post{ role: role.to_string(), label: label.to_string(), division_id: division_id.to_string() });
    }
}
