use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::{require, ValidationError};

pub const DEFAULT_ORG_NAME: &str = "JU Flörsheim";
pub const PDF_FILE_NAME: &str = "einladung.pdf";

/// Meeting invitation sent to the backend for HTML preview or PDF rendering.
/// Forwarded unchanged; nothing here is canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct InvitationRequest {
    pub org_name: String,
    /// `YYYY-MM-DD`
    pub meeting_date: String,
    /// `HH:mm`
    pub meeting_time: String,
    pub location_name: String,
    pub location_street: String,
    pub location_city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub letter_city: Option<String>,
    pub agenda: Vec<String>,
}

impl Default for InvitationRequest {
    fn default() -> Self {
        Self {
            org_name: DEFAULT_ORG_NAME.to_string(),
            meeting_date: String::new(),
            meeting_time: String::new(),
            location_name: String::new(),
            location_street: String::new(),
            location_city: String::new(),
            letter_city: Some(String::new()),
            agenda: vec![
                "Begrüßung".to_string(),
                "Bericht des Vorsitzenden".to_string(),
                "Verschiedenes".to_string(),
            ],
        }
    }
}

impl InvitationRequest {
    /// One agenda item per line. Lines are kept verbatim, blank ones and a
    /// trailing empty segment included.
    pub fn agenda_from_text(text: &str) -> Vec<String> {
        text.split('\n').map(str::to_string).collect()
    }

    pub fn agenda_text(&self) -> String {
        self.agenda.join("\n")
    }

    pub fn set_agenda_text(&mut self, text: &str) {
        self.agenda = Self::agenda_from_text(text);
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("orgName", &self.org_name)?;
        require("meetingDate", &self.meeting_date)?;
        require("meetingTime", &self.meeting_time)?;
        require("locationName", &self.location_name)?;
        require("locationStreet", &self.location_street)?;
        require("locationCity", &self.location_city)?;

        NaiveDate::parse_from_str(&self.meeting_date, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(self.meeting_date.clone()))?;
        NaiveTime::parse_from_str(&self.meeting_time, "%H:%M")
            .map_err(|_| ValidationError::InvalidTime(self.meeting_time.clone()))?;

        Ok(())
    }
}
