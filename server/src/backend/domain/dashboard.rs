//! Live dashboard state.
//!
//! A background task listens to the donor change feed and rebuilds the
//! dashboard snapshot after every change. Readers get the latest snapshot
//! from a `watch` channel without touching the store.

use anyhow::{Context, Result};
use chrono::{Local, SecondsFormat, Utc};
use log::{debug, error, info, warn};
use shared::DashboardSnapshot;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::watch;

use crate::backend::domain::donor_service::DonorService;
use crate::backend::domain::stats::{blood_units_ml, compute_stats, is_milestone, recent_donors};

/// How many of the latest registrations the dashboard shows
pub const RECENT_DONOR_COUNT: usize = 3;

/// Read side of the dashboard state
#[derive(Clone)]
pub struct DashboardHandle {
    receiver: watch::Receiver<DashboardSnapshot>,
}

impl DashboardHandle {
    /// The most recently published snapshot
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait until a snapshot newer than the last one seen by this handle is
    /// published.
    pub async fn changed(&mut self) -> Result<()> {
        self.receiver
            .changed()
            .await
            .context("Dashboard refresher has stopped")
    }
}

/// Recompute everything the dashboard shows from the current donor set.
pub async fn build_snapshot(donor_service: &DonorService) -> Result<DashboardSnapshot> {
    let donors = donor_service.list_donors().await?;
    let stats = compute_stats(&donors, &Local::now());

    Ok(DashboardSnapshot {
        blood_units_ml: blood_units_ml(stats.total),
        milestone: is_milestone(stats.total),
        recent_donors: recent_donors(&donors, RECENT_DONOR_COUNT)
            .iter()
            .cloned()
            .map(Into::into)
            .collect(),
        refreshed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        stats,
    })
}

pub struct DashboardRefresher;

impl DashboardRefresher {
    /// Build the first snapshot and start refreshing on every change.
    ///
    /// The task stops as soon as every `DashboardHandle` has been dropped.
    pub async fn spawn(donor_service: DonorService) -> Result<DashboardHandle> {
        // Subscribe first so a change made while the initial snapshot is
        // being built still triggers a refresh.
        let mut changes = donor_service.subscribe();
        let initial = build_snapshot(&donor_service).await?;
        info!(
            "Dashboard ready: {} donors, {} ml collected",
            initial.stats.total, initial.blood_units_ml
        );

        let (sender, receiver) = watch::channel(initial);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = sender.closed() => {
                        debug!("No dashboard readers left, stopping refresher");
                        break;
                    }
                    received = changes.recv() => match received {
                        Ok(event) => debug!("Dashboard refresh after {:?}", event.kind),
                        Err(RecvError::Lagged(missed)) => {
                            warn!("Dashboard missed {} change events, refreshing", missed)
                        }
                        Err(RecvError::Closed) => {
                            info!("Donor change feed closed, stopping dashboard refresher");
                            break;
                        }
                    },
                }

                // One rebuild covers every change already queued
                loop {
                    match changes.try_recv() {
                        Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                        Err(_) => break,
                    }
                }

                match build_snapshot(&donor_service).await {
                    Ok(snapshot) => {
                        if snapshot.milestone {
                            info!("🎉 Milestone reached: {} donors", snapshot.stats.total);
                        }
                        if sender.send(snapshot).is_err() {
                            debug!("No dashboard readers left, stopping refresher");
                            break;
                        }
                    }
                    Err(e) => error!("Failed to refresh dashboard: {}", e),
                }
            }
        });

        Ok(DashboardHandle { receiver })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::{ChangeFeed, DbConnection, DonorRepository, DonorStorage};
    use shared::{BloodType, CreateDonorRequest};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    async fn setup_test() -> DonorService {
        let db = DbConnection::in_memory()
            .await
            .expect("Failed to create test database");
        DonorService::new(Arc::new(DonorRepository::new(db, ChangeFeed::new(16))))
    }

    fn request(name: &str, phone: &str) -> CreateDonorRequest {
        CreateDonorRequest {
            name: name.to_string(),
            gender: "male".to_string(),
            blood_type: "B+".to_string(),
            phone_number: phone.to_string(),
            is_first_time: true,
            ..Default::default()
        }
    }

    /// Wait until the handle shows `total` donors
    async fn wait_for_total(handle: &mut DashboardHandle, total: usize) -> DashboardSnapshot {
        timeout(Duration::from_secs(5), async {
            loop {
                let snapshot = handle.snapshot();
                if snapshot.stats.total == total {
                    return snapshot;
                }
                handle.changed().await.expect("refresher stopped");
            }
        })
        .await
        .expect("dashboard did not refresh in time")
    }

    #[tokio::test]
    async fn test_initial_snapshot_of_empty_store() {
        let service = setup_test().await;
        let handle = DashboardRefresher::spawn(service).await.unwrap();

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.stats.total, 0);
        assert_eq!(snapshot.blood_units_ml, 0);
        assert!(snapshot.recent_donors.is_empty());
        assert!(!snapshot.milestone);
    }

    #[tokio::test]
    async fn test_snapshot_follows_inserts_and_clear() {
        let service = setup_test().await;
        let mut handle = DashboardRefresher::spawn(service.clone()).await.unwrap();

        for (i, name) in ["Asha", "Ravi", "Meena", "Kiran"].iter().enumerate() {
            service
                .add_donor(request(name, &format!("912345678{}", i)))
                .await
                .unwrap();
        }

        let snapshot = wait_for_total(&mut handle, 4).await;
        assert_eq!(snapshot.blood_units_ml, 1800);
        assert_eq!(snapshot.stats.by_blood_type[&BloodType::BPositive], 4);
        let recent: Vec<_> = snapshot.recent_donors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(recent, vec!["Kiran", "Meena", "Ravi"]);

        service.clear_donors().await.unwrap();
        let snapshot = wait_for_total(&mut handle, 0).await;
        assert!(snapshot.recent_donors.is_empty());
    }

    #[tokio::test]
    async fn test_refresher_stops_when_handles_are_dropped() {
        let db = DbConnection::in_memory()
            .await
            .expect("Failed to create test database");
        let storage: Arc<dyn DonorStorage> = Arc::new(DonorRepository::new(db, ChangeFeed::new(16)));
        let handle = DashboardRefresher::spawn(DonorService::new(storage.clone()))
            .await
            .unwrap();
        let copy = handle.clone();

        drop(handle);
        tokio::task::yield_now().await;
        // Still one reader, so the task keeps its service
        assert_eq!(Arc::strong_count(&storage), 2);

        drop(copy);
        timeout(Duration::from_secs(5), async {
            while Arc::strong_count(&storage) > 1 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("refresher kept running without readers");
    }

    #[tokio::test]
    async fn test_build_snapshot_flags_milestone() {
        let service = setup_test().await;
        for i in 0..50 {
            service
                .add_donor(request(&format!("Donor {}", i), &format!("91234567{:02}", i)))
                .await
                .unwrap();
        }

        let snapshot = build_snapshot(&service).await.unwrap();
        assert_eq!(snapshot.stats.total, 50);
        assert!(snapshot.milestone);
        assert_eq!(snapshot.recent_donors.len(), RECENT_DONOR_COUNT);
        assert_eq!(snapshot.recent_donors[0].name, "Donor 49");
    }
}
