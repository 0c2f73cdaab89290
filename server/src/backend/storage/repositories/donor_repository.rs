use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{info, warn};
use shared::{DonorChangeEvent, DonorChangeKind};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::backend::domain::models::donor::{Donor, NewDonor};
use crate::backend::storage::change_feed::ChangeFeed;
use crate::backend::storage::connection::DbConnection;
use crate::backend::storage::traits::{DonorStorage, InsertOutcome, SortOrder};

const DONOR_COLUMNS: &str = "id, name, gender, blood_type, phone_number, age, address, city, \
                             is_first_time, is_dikshit, created_at";

/// SQLite-backed donor store with a change feed
#[derive(Clone)]
pub struct DonorRepository {
    db: DbConnection,
    feed: ChangeFeed,
}

impl DonorRepository {
    pub fn new(db: DbConnection, feed: ChangeFeed) -> Self {
        Self { db, feed }
    }

    /// Fixed-width UTC timestamps so that text order equals time order
    fn format_timestamp(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
        Ok(DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("Invalid created_at in store: {}", raw))?
            .with_timezone(&Utc))
    }

    fn donor_from_row(row: &SqliteRow) -> Result<Donor> {
        let gender: String = row.try_get("gender")?;
        let blood_type: String = row.try_get("blood_type")?;
        let age: Option<i64> = row.try_get("age")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Donor {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            gender: gender.parse().map_err(|e: String| anyhow!(e))?,
            blood_type: blood_type.parse().map_err(|e: String| anyhow!(e))?,
            phone_number: row.try_get("phone_number")?,
            age: age.map(u8::try_from).transpose().context("Stored age out of range")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            is_first_time: row.try_get("is_first_time")?,
            is_dikshit: row.try_get("is_dikshit")?,
            created_at: Self::parse_timestamp(&created_at)?,
        })
    }
}

#[async_trait]
impl DonorStorage for DonorRepository {
    async fn insert_donor(&self, donor: &NewDonor) -> Result<InsertOutcome> {
        let id = Uuid::new_v4().to_string();
        let now = Self::format_timestamp(&Utc::now());

        // created_at is clamped to the newest stored value inside the INSERT
        // itself, so concurrent writers cannot interleave between the read and
        // the write.
        let result = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO donors (id, name, name_key, gender, blood_type, phone_number, age,
                                address, city, is_first_time, is_dikshit, created_at)
            SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                   MAX(?, COALESCE((SELECT MAX(created_at) FROM donors), ''))
            RETURNING created_at
            "#,
        )
        .bind(&id)
        .bind(&donor.name)
        .bind(donor.name_key())
        .bind(donor.gender.as_str())
        .bind(donor.blood_type.label())
        .bind(&donor.phone_number)
        .bind(donor.age.map(i64::from))
        .bind(&donor.address)
        .bind(&donor.city)
        .bind(donor.is_first_time)
        .bind(donor.is_dikshit)
        .bind(&now)
        .fetch_one(self.db.pool())
        .await;

        let stored_at = match result {
            Ok(stored_at) => stored_at,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                warn!(
                    "Store rejected duplicate donor '{}' / {}",
                    donor.name, donor.phone_number
                );
                return Ok(InsertOutcome::Conflict);
            }
            Err(e) => return Err(e.into()),
        };

        info!("Stored donor {} ({})", id, donor.name);
        self.feed.publish(DonorChangeKind::Inserted);

        let created_at = Self::parse_timestamp(&stored_at)?;
        Ok(InsertOutcome::Inserted(donor.clone().into_donor(id, created_at)))
    }

    async fn list_donors(&self, order: SortOrder) -> Result<Vec<Donor>> {
        let direction = match order {
            SortOrder::OldestFirst => "ASC",
            SortOrder::NewestFirst => "DESC",
        };
        let query_str = format!(
            "SELECT {} FROM donors ORDER BY created_at {}, ROWID {}",
            DONOR_COLUMNS, direction, direction
        );

        let rows = sqlx::query(&query_str).fetch_all(self.db.pool()).await?;
        rows.iter().map(Self::donor_from_row).collect()
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Vec<Donor>> {
        let query_str = format!(
            "SELECT {} FROM donors WHERE phone_number = ? ORDER BY created_at ASC, ROWID ASC",
            DONOR_COLUMNS
        );

        let rows = sqlx::query(&query_str)
            .bind(phone_number)
            .fetch_all(self.db.pool())
            .await?;
        rows.iter().map(Self::donor_from_row).collect()
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM donors")
            .execute(self.db.pool())
            .await?;
        let deleted = result.rows_affected();

        info!("Deleted all donors ({} rows)", deleted);
        if deleted > 0 {
            self.feed.publish(DonorChangeKind::Cleared);
        }
        Ok(deleted)
    }

    fn subscribe(&self) -> broadcast::Receiver<DonorChangeEvent> {
        self.feed.subscribe()
    }
}
