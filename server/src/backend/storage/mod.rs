//! # Storage Module
//!
//! Handles donor persistence and change notification.
//!
//! The domain layer only sees the [`DonorStorage`] trait. The shipped
//! implementation keeps donors in SQLite through SQLx and announces every
//! insert and bulk delete on a [`ChangeFeed`], which is how open dashboards
//! learn they should re-fetch.
//!
//! ## Guarantees
//!
//! - `(name_key, phone_number)` is unique at the table level
//! - `created_at` never goes backwards in insertion order
//! - listings are ordered by `created_at`, ties broken by insertion order

pub mod change_feed;
pub mod connection;
pub mod repositories;
pub mod traits;

pub use change_feed::ChangeFeed;
pub use connection::DbConnection;
pub use repositories::DonorRepository;
pub use traits::{DonorStorage, InsertOutcome, SortOrder};
