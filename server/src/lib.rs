//! Donor camp registry server.
//!
//! The HTTP surface lives in [`backend::io`], business rules in
//! [`backend::domain`] and persistence in [`backend::storage`].

pub mod backend;
