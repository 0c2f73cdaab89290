//! # Storage Traits
//!
//! The donor store seam. The domain layer talks to this trait only, so the
//! store could equally be a hosted database reached over the network.

use anyhow::Result;
use async_trait::async_trait;
use shared::DonorChangeEvent;
use tokio::sync::broadcast;

use crate::backend::domain::models::donor::{Donor, NewDonor};

/// Ordering of a full listing by `created_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    OldestFirst,
    NewestFirst,
}

/// Result of an insert attempt
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// Stored, with the store-assigned `id` and `created_at` filled in
    Inserted(Donor),
    /// Rejected by the `(name_key, phone_number)` uniqueness constraint
    Conflict,
}

#[async_trait]
pub trait DonorStorage: Send + Sync {
    /// Insert one donor. The store assigns `id` and `created_at`.
    async fn insert_donor(&self, donor: &NewDonor) -> Result<InsertOutcome>;

    /// Every donor, ordered by `created_at`
    async fn list_donors(&self, order: SortOrder) -> Result<Vec<Donor>>;

    /// Donors whose phone number equals `phone_number` exactly
    async fn find_by_phone(&self, phone_number: &str) -> Result<Vec<Donor>>;

    /// Remove every donor; returns the number removed
    async fn delete_all(&self) -> Result<u64>;

    /// Subscribe to insert/delete notifications for the donor table
    fn subscribe(&self) -> broadcast::Receiver<DonorChangeEvent>;
}
