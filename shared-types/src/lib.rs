use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod contact;
pub mod invitation;
pub mod validation;

pub use contact::{
    BackendCreateContact, BackendUpdateContact, Contact, ContactList, ContactPayload,
    LegacyContact, RawContact,
};
pub use invitation::InvitationRequest;
pub use validation::ValidationError;

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
