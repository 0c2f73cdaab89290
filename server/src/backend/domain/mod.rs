//! # Domain Module
//!
//! Contains all business logic for the donor camp registry. It operates
//! independently of the HTTP layer and of the concrete store.
//!
//! ## Module Organization
//!
//! - **validation**: phone number rules, name normalization, form validation
//! - **stats**: dashboard counts derived from the full donor set
//! - **donor_service**: registration with duplicate detection, listing, clearing
//! - **dashboard**: background refresh of the live dashboard snapshot
//! - **export_service** / **camp_document**: delimited text and printable report
//!
//! ## Business Rules
//!
//! - A donor is identified by name (ignoring case and spacing) plus phone number
//! - Phone numbers are exactly 10 digits and must look like a real mobile number
//! - Listings are newest first; exports are in registration order
//! - Every donation counts as 450 ml and every 50th donor is a milestone

pub mod camp_document;
pub mod commands;
pub mod dashboard;
pub mod donor_service;
pub mod errors;
pub mod export_service;
pub mod models;
pub mod stats;
pub mod validation;

pub use dashboard::{DashboardHandle, DashboardRefresher};
pub use donor_service::DonorService;
pub use errors::{DonorError, ExportError, PhoneNumberError, ValidationError};
pub use export_service::{CsvExport, DocumentExport, ExportService};
