use crate::person::Organization;

/// Moncton City Council: a mayor, two councillors at large, and two councillors for each of four wards.
pub(super) fn organization(name:&str,classification:&str,division_id:&str) -> Organization {
    let mut organization = Organization::new(name,classification);
    organization.add_post("Mayor","Moncton",division_id);
    for seat in 1..=2 {
        organization.add_post("Councillor at Large",&format!("Moncton (seat {})",seat),division_id);
    }
    for ward in 1..=4 {
        for seat in 1..=2 {
            organization.add_post("Councillor",&format!("Ward {} (seat {})",ward,seat),&format!("{}/ward:{}",division_id,ward));
        }
    }
    organization
}

#[cfg(test)]
mod tests {
    use crate::metadata::read_definition;
    use crate::scrapers::organizations;

    #[test]
    fn moncton_posts() {
        let (_,definition) = read_definition("[Moncton]\nclassification = \"legislature\"\ndivision_id = \"ocd-division/country:ca/csd:1307022\"\nname = \"Moncton City Council\"\n").unwrap().unwrap();
        let organizations = organizations("ca_nb_moncton",&definition);
        assert_eq!(organizations.len(),1);
        let council = &organizations[0];
        assert_eq!(council.name,"Moncton City Council");
        assert_eq!(council.posts.len(),11);
        assert_eq!(council.posts[0].role,"Mayor");
        assert_eq!(council.posts.iter().filter(|p|p.role=="Councillor at Large").count(),2);
        assert_eq!(council.posts[3].label,"Ward 1 (seat 1)");
        assert_eq!(council.posts[3].division_id,"ocd-division/country:ca/csd:1307022/ward:1");
        assert_eq!(council.posts[10].label,"Ward 4 (seat 2)");
    }
}
