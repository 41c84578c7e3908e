use shared_types::Contact;
use std::collections::BTreeSet;

/// Search box plus role and city drop-downs of the contact list.
/// Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    pub search: String,
    pub role: String,
    pub city: String,
}

impl ContactFilter {
    pub fn matches(&self, contact: &Contact) -> bool {
        let term = self.search.trim().to_lowercase();
        let matches_search = term.is_empty() || search_text(contact).contains(&term);
        let matches_role = self.role.is_empty() || contact.role == self.role;
        let matches_city = self.city.is_empty() || contact.city == self.city;

        matches_search && matches_role && matches_city
    }

    pub fn apply<'a>(&self, contacts: &'a [Contact]) -> Vec<&'a Contact> {
        contacts.iter().filter(|c| self.matches(c)).collect()
    }
}

fn search_text(contact: &Contact) -> String {
    let name = contact.display_name();
    let id = contact.id.map(|id| id.to_string()).unwrap_or_default();
    let parts = [
        name.as_str(),
        contact.email.as_str(),
        contact.role.as_str(),
        contact.city.as_str(),
        id.as_str(),
    ];

    let text = parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    text.to_lowercase()
}

/// Distinct non-empty roles, sorted.
pub fn role_options(contacts: &[Contact]) -> Vec<String> {
    distinct(contacts.iter().map(|c| c.role.as_str()))
}

/// Distinct non-empty cities, sorted.
pub fn city_options(contacts: &[Contact]) -> Vec<String> {
    distinct(contacts.iter().map(|c| c.city.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
