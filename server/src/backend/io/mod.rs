//! # IO Module
//!
//! External interfaces of the registry. Everything goes over HTTP: JSON
//! endpoints for the forms and tables, a server-sent event stream for live
//! views, and file downloads for exports.

pub mod rest;

pub use rest::*;
