use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::validation::{require, ValidationError};

/// Canonical contact with split first/last name.
///
/// Deserialization always goes through [`RawContact`], so a payload in the
/// legacy single-`name` shape comes out normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[serde(from = "RawContact")]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub city: String,
    pub email: String,
    pub phone: String,
    /// Comma-separated, free text.
    pub tags: String,
    pub consent: bool,
    pub consent_date: Option<String>,
    pub last_touch: Option<String>,
    pub next_followup: Option<String>,
}

impl Contact {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Required form fields. Only the client enforces these.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("firstName", &self.first_name)?;
        require("lastName", &self.last_name)?;
        Ok(())
    }
}

/// Every field either contact shape may carry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContact {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default, deserialize_with = "boolean_or_absent")]
    pub consent: Option<bool>,
    #[serde(default)]
    pub consent_date: Option<String>,
    #[serde(default)]
    pub last_touch: Option<String>,
    #[serde(default)]
    pub next_followup: Option<String>,
}

impl From<RawContact> for Contact {
    fn from(raw: RawContact) -> Self {
        let legacy_name = raw.name.unwrap_or_default();
        let mut tokens = legacy_name.split_whitespace();
        let derived_first = tokens.next().unwrap_or_default().to_string();
        let derived_last = tokens.collect::<Vec<_>>().join(" ");

        Contact {
            id: raw.id,
            first_name: explicit_or(raw.first_name, derived_first),
            last_name: explicit_or(raw.last_name, derived_last),
            role: raw.role.unwrap_or_default(),
            city: raw.city.unwrap_or_default(),
            email: raw.email.unwrap_or_default(),
            phone: raw.phone.unwrap_or_default(),
            tags: raw.tags.unwrap_or_default(),
            consent: raw.consent.unwrap_or(false),
            consent_date: raw.consent_date,
            last_touch: raw.last_touch,
            next_followup: raw.next_followup,
        }
    }
}

// A blank explicit name part still wins over the legacy name, but as "".
fn explicit_or(explicit: Option<String>, derived: String) -> String {
    match explicit {
        Some(value) if value.trim().is_empty() => String::new(),
        Some(value) => value,
        None => derived,
    }
}

/// Backend shape with a single `name` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct LegacyContact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub tags: String,
    pub consent: bool,
    pub consent_date: String,
    pub last_touch: String,
    pub next_followup: String,
}

impl From<LegacyContact> for RawContact {
    fn from(legacy: LegacyContact) -> Self {
        RawContact {
            id: legacy.id,
            name: Some(legacy.name),
            role: legacy.role,
            city: legacy.city,
            email: legacy.email,
            phone: legacy.phone,
            tags: Some(legacy.tags),
            consent: Some(legacy.consent),
            consent_date: Some(legacy.consent_date),
            last_touch: Some(legacy.last_touch),
            next_followup: Some(legacy.next_followup),
            ..RawContact::default()
        }
    }
}

impl From<LegacyContact> for Contact {
    fn from(legacy: LegacyContact) -> Self {
        RawContact::from(legacy).into()
    }
}

/// Body of `GET /api/contacts`. Some backends wrap the array in `items` or
/// `data`; any other shape is an empty list. A malformed element fails the
/// whole decode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct ContactList(pub Vec<Contact>);

impl ContactList {
    pub fn into_contacts(self) -> Vec<Contact> {
        self.0
    }
}

impl TryFrom<Value> for ContactList {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let list = match value {
            list @ Value::Array(_) => list,
            Value::Object(mut wrapper) => {
                match take_list(&mut wrapper, "items").or_else(|| take_list(&mut wrapper, "data")) {
                    Some(list) => list,
                    None => return Ok(ContactList(Vec::new())),
                }
            }
            _ => return Ok(ContactList(Vec::new())),
        };

        serde_json::from_value(list).map(ContactList)
    }
}

// `null` counts as absent, so `{"items": null, "data": [...]}` uses `data`.
fn take_list(wrapper: &mut Map<String, Value>, key: &str) -> Option<Value> {
    wrapper.remove(key).filter(|list| !list.is_null())
}

/// Edit body the UI posts to the proxy on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub phone: Option<String>,
    /// Anything other than a JSON boolean counts as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "boolean_or_absent")]
    #[ts(optional)]
    pub consent: Option<bool>,
}

impl From<&Contact> for ContactPayload {
    fn from(contact: &Contact) -> Self {
        ContactPayload {
            name: None,
            first_name: Some(contact.first_name.clone()),
            last_name: Some(contact.last_name.clone()),
            role: non_empty(&contact.role),
            city: non_empty(&contact.city),
            email: non_empty(&contact.email),
            phone: non_empty(&contact.phone),
            consent: Some(contact.consent),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// `POST /api/contacts` body expected by the backend.
///
/// `role`, `city` and `email` are sent as `null` when unknown; `name` is
/// left out entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
pub struct BackendCreateContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,
    pub role: Option<String>,
    pub city: Option<String>,
    pub email: Option<String>,
    pub consent: bool,
}

impl From<ContactPayload> for BackendCreateContact {
    fn from(payload: ContactPayload) -> Self {
        let ContactPayload {
            name,
            first_name,
            last_name,
            role,
            city,
            email,
            consent,
            ..
        } = payload;

        let name = name.filter(|name| !name.is_empty()).or_else(|| {
            let joined = [first_name, last_name]
                .into_iter()
                .flatten()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            let joined = joined.trim();
            (!joined.is_empty()).then(|| joined.to_string())
        });

        BackendCreateContact {
            name,
            role,
            city,
            email,
            // Differs from the read-side default of `false`; the backend
            // relies on it.
            consent: consent.unwrap_or(true),
        }
    }
}

/// `PUT /api/contacts/{id}` body: only the fields the edit carried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
pub struct BackendUpdateContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub consent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub phone: Option<String>,
}

impl From<ContactPayload> for BackendUpdateContact {
    fn from(payload: ContactPayload) -> Self {
        BackendUpdateContact {
            name: payload.name,
            email: payload.email,
            role: payload.role,
            city: payload.city,
            consent: payload.consent,
            phone: payload.phone,
        }
    }
}

fn boolean_or_absent<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| value.as_bool()))
}
