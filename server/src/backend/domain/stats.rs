//! Summary counts for the dashboard.
//!
//! Everything here is recomputed from the full record set on each call;
//! nothing is cached between calls.

use chrono::{DateTime, TimeZone};
use shared::{BloodType, DonorStats, Gender};
use std::collections::BTreeMap;

use crate::backend::domain::models::donor::Donor;

/// Volume collected from one donation
pub const ML_PER_DONATION: u64 = 450;

/// Every N-th donor is celebrated on the big-screen display
pub const MILESTONE_INTERVAL: usize = 50;

/// Reduce a donor set into dashboard counts.
///
/// `today` counts records whose `created_at` falls on `now`'s calendar date in
/// `now`'s timezone; the server passes local time.
pub fn compute_stats<Tz: TimeZone>(records: &[Donor], now: &DateTime<Tz>) -> DonorStats {
    let tz = now.timezone();
    let today_date = now.date_naive();

    let mut by_gender: BTreeMap<Gender, usize> = Gender::ALL.iter().map(|g| (*g, 0)).collect();
    let mut by_blood_type: BTreeMap<BloodType, usize> =
        BloodType::ALL.iter().map(|bt| (*bt, 0)).collect();
    let mut first_time = 0;
    let mut today = 0;

    for donor in records {
        *by_gender.entry(donor.gender).or_insert(0) += 1;
        *by_blood_type.entry(donor.blood_type).or_insert(0) += 1;
        if donor.is_first_time {
            first_time += 1;
        }
        if donor.created_at.with_timezone(&tz).date_naive() == today_date {
            today += 1;
        }
    }

    DonorStats {
        total: records.len(),
        today,
        first_time,
        by_gender,
        by_blood_type,
    }
}

pub fn blood_units_ml(total: usize) -> u64 {
    total as u64 * ML_PER_DONATION
}

/// The first `n` donors of a newest-first listing
pub fn recent_donors(newest_first: &[Donor], n: usize) -> &[Donor] {
    &newest_first[..n.min(newest_first.len())]
}

pub fn is_milestone(total: usize) -> bool {
    total > 0 && total % MILESTONE_INTERVAL == 0
}
