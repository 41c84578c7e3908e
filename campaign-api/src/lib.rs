pub mod config;
pub mod handlers;
pub mod helpers;
pub mod integrations;

pub use handlers::ProxyState;
pub use integrations::backend::{BackendClient, BackendError};
