//! # REST API Interface Layer
//!
//! Translates HTTP requests into domain calls and domain results into JSON,
//! files or event streams. No business rules live here.
//!
//! ## Endpoints (all under `/api`)
//!
//! - `GET /donors`, `POST /donors`, `DELETE /donors`
//! - `POST /donors/validate-phone`
//! - `GET /donors/events` (server-sent events)
//! - `GET /stats`, `GET /dashboard`
//! - `GET /export/csv`, `POST /export/camp-details`

pub mod donor_apis;
pub mod error;
pub mod events_apis;
pub mod export_apis;
pub mod mappers;
pub mod stats_apis;

pub use donor_apis::{clear_donors, create_donor, list_donors, validate_phone};
pub use error::ApiError;
pub use events_apis::donor_events;
pub use export_apis::{export_camp_details, export_csv};
pub use stats_apis::{get_dashboard, get_stats};
