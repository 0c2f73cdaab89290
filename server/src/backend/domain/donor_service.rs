use anyhow::Result;
use chrono::Local;
use log::{info, warn};
use shared::{CreateDonorRequest, DonorChangeEvent, DonorStats};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::backend::domain::commands::donors::{AddDonorResult, ClearDonorsResult};
use crate::backend::domain::errors::DonorError;
use crate::backend::domain::models::donor::Donor;
use crate::backend::domain::stats::compute_stats;
use crate::backend::domain::validation::validate_new_donor;
use crate::backend::storage::{DonorStorage, InsertOutcome, SortOrder};

/// Registration, listing and clearing of donors
#[derive(Clone)]
pub struct DonorService {
    storage: Arc<dyn DonorStorage>,
}

impl DonorService {
    pub fn new(storage: Arc<dyn DonorStorage>) -> Self {
        Self { storage }
    }

    /// Validate and register a donor.
    ///
    /// The name/phone pre-check is not atomic with the insert. Two identical
    /// concurrent submissions can both pass it; the store's uniqueness
    /// constraint then rejects one, and that rejection is reported as the same
    /// `Duplicate` outcome.
    pub async fn add_donor(&self, request: CreateDonorRequest) -> Result<AddDonorResult, DonorError> {
        let candidate = validate_new_donor(&request)?;
        info!(
            "Registering donor '{}' ({}, {})",
            candidate.name, candidate.blood_type, candidate.phone_number
        );

        let key = candidate.name_key();
        let same_phone = self.storage.find_by_phone(&candidate.phone_number).await?;
        if same_phone.iter().any(|existing| existing.name_key() == key) {
            warn!("Duplicate donor '{}' / {}", candidate.name, candidate.phone_number);
            return Err(DonorError::Duplicate);
        }

        match self.storage.insert_donor(&candidate).await? {
            InsertOutcome::Inserted(donor) => {
                info!("Registered donor {} ({})", donor.id, donor.name);
                Ok(AddDonorResult {
                    success_message: format!("Donor {} added successfully", donor.name),
                    donor,
                })
            }
            InsertOutcome::Conflict => {
                warn!(
                    "Store rejected '{}' / {} as duplicate after pre-check",
                    candidate.name, candidate.phone_number
                );
                Err(DonorError::Duplicate)
            }
        }
    }

    /// All donors, newest first
    pub async fn list_donors(&self) -> Result<Vec<Donor>> {
        let donors = self.storage.list_donors(SortOrder::NewestFirst).await?;
        info!("Found {} donors", donors.len());
        Ok(donors)
    }

    /// All donors in registration order, as exports list them
    pub async fn list_donors_oldest_first(&self) -> Result<Vec<Donor>> {
        self.storage.list_donors(SortOrder::OldestFirst).await
    }

    /// Current counts, with "today" in the server's local timezone
    pub async fn stats(&self) -> Result<DonorStats> {
        let donors = self.storage.list_donors(SortOrder::NewestFirst).await?;
        Ok(compute_stats(&donors, &Local::now()))
    }

    /// Remove every donor
    pub async fn clear_donors(&self) -> Result<ClearDonorsResult> {
        warn!("Clearing all donor data");
        let deleted_count = self.storage.delete_all().await?;
        Ok(ClearDonorsResult {
            deleted_count,
            success_message: "All donor data deleted.".to_string(),
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DonorChangeEvent> {
        self.storage.subscribe()
    }
}
