use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A registered blood donor.
///
/// Field order matters: the delimited-text export uses the serialized field
/// order (minus `id`) as its header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    /// Store-assigned identifier (UUID v4)
    pub id: String,
    /// Whitespace-normalized full name
    pub name: String,
    pub gender: Gender,
    pub blood_type: BloodType,
    /// Exactly 10 digits
    pub phone_number: String,
    /// Only present for registrations that captured an age (14..=80)
    pub age: Option<u8>,
    pub address: String,
    pub city: String,
    pub is_first_time: bool,
    pub is_dikshit: bool,
    /// Store-assigned insert time (RFC 3339, UTC)
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("Unknown gender: {}", other)),
        }
    }
}

/// ABO/Rh blood group. Ordering follows the dashboard's display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BloodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the typographic minus some keyboards produce
        let label = s.trim().to_ascii_uppercase().replace('\u{2212}', "-");
        BloodType::ALL
            .iter()
            .find(|bt| bt.label() == label)
            .copied()
            .ok_or_else(|| format!("Unknown blood type: {}", s.trim()))
    }
}

/// Raw add-donor form input. Every field arrives as typed by the volunteer;
/// the server validates and normalizes it, so absent fields deserialize as
/// empty and are reported by validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateDonorRequest {
    pub name: String,
    pub gender: String,
    pub blood_type: String,
    pub phone_number: String,
    pub age: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub is_first_time: bool,
    pub is_dikshit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDonorResponse {
    pub donor: Donor,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorListResponse {
    /// Newest first
    pub donors: Vec<Donor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearDonorsResponse {
    pub deleted_count: u64,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneValidationRequest {
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneValidationResponse {
    pub valid: bool,
    /// Digits-only form, present when valid
    pub normalized: Option<String>,
    /// Rejection reason, present when invalid
    pub reason: Option<String>,
}

/// Aggregate counts over the full donor set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorStats {
    pub total: usize,
    pub today: usize,
    pub first_time: usize,
    /// Always contains both genders
    pub by_gender: BTreeMap<Gender, usize>,
    /// Always contains all eight blood types
    pub by_blood_type: BTreeMap<BloodType, usize>,
}

/// What the dashboard and the big-screen display render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub stats: DonorStats,
    pub blood_units_ml: u64,
    pub recent_donors: Vec<Donor>,
    /// True when the total just hit a multiple of 50
    pub milestone: bool,
    pub refreshed_at: String,
}

/// Descriptive camp details printed at the top of the exported document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonorChangeKind {
    Inserted,
    Cleared,
}

/// Change-feed notification. Carries no row data: receivers re-fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorChangeEvent {
    pub kind: DonorChangeKind,
    pub occurred_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blood_type_labels_round_trip_through_from_str() {
        for bt in BloodType::ALL {
            assert_eq!(bt.label().parse::<BloodType>(), Ok(bt));
        }
        assert_eq!("ab\u{2212}".parse::<BloodType>(), Ok(BloodType::AbNegative));
        assert!("C+".parse::<BloodType>().is_err());
    }

    #[test]
    fn test_gender_parse_is_case_insensitive() {
        assert_eq!(" Female ".parse::<Gender>(), Ok(Gender::Female));
        assert!("other".parse::<Gender>().is_err());
    }

    #[test]
    fn test_create_request_tolerates_missing_fields() {
        let request: CreateDonorRequest =
            serde_json::from_str(r#"{"name": "Asha", "phone_number": "9123456789"}"#).unwrap();
        assert_eq!(request.name, "Asha");
        assert!(request.gender.is_empty());
        assert!(request.blood_type.is_empty());
        assert!(request.age.is_none());
        assert!(!request.is_first_time);
    }

    #[test]
    fn test_blood_type_serializes_with_label() {
        let json = serde_json::to_string(&BloodType::OPositive).unwrap();
        assert_eq!(json, "\"O+\"");
    }

    #[test]
    fn test_stats_maps_serialize_with_string_keys() {
        let mut by_gender = BTreeMap::new();
        by_gender.insert(Gender::Male, 2);
        by_gender.insert(Gender::Female, 1);
        let mut by_blood_type = BTreeMap::new();
        by_blood_type.insert(BloodType::AbNegative, 3);
        let stats = DonorStats {
            total: 3,
            today: 0,
            first_time: 1,
            by_gender,
            by_blood_type,
        };
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["by_gender"]["male"], 2);
        assert_eq!(value["by_blood_type"]["AB-"], 3);
    }
}
