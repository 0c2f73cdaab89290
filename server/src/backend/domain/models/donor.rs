//! Domain model for a donor registration.
use chrono::{DateTime, SecondsFormat, Utc};
use shared::{BloodType, Gender};

use crate::backend::domain::validation::name_key;

/// A stored donor.
#[derive(Debug, Clone, PartialEq)]
pub struct Donor {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub blood_type: BloodType,
    pub phone_number: String,
    pub age: Option<u8>,
    pub address: String,
    pub city: String,
    pub is_first_time: bool,
    pub is_dikshit: bool,
    pub created_at: DateTime<Utc>,
}

impl Donor {
    /// Case- and whitespace-insensitive form of the name used for duplicates
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

/// A validated registration that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDonor {
    pub name: String,
    pub gender: Gender,
    pub blood_type: BloodType,
    pub phone_number: String,
    pub age: Option<u8>,
    pub address: String,
    pub city: String,
    pub is_first_time: bool,
    pub is_dikshit: bool,
}

impl NewDonor {
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }

    /// Attach the store-assigned identity
    pub fn into_donor(self, id: String, created_at: DateTime<Utc>) -> Donor {
        Donor {
            id,
            name: self.name,
            gender: self.gender,
            blood_type: self.blood_type,
            phone_number: self.phone_number,
            age: self.age,
            address: self.address,
            city: self.city,
            is_first_time: self.is_first_time,
            is_dikshit: self.is_dikshit,
            created_at,
        }
    }
}

impl From<Donor> for shared::Donor {
    fn from(donor: Donor) -> Self {
        shared::Donor {
            id: donor.id,
            name: donor.name,
            gender: donor.gender,
            blood_type: donor.blood_type,
            phone_number: donor.phone_number,
            age: donor.age,
            address: donor.address,
            city: donor.city,
            is_first_time: donor.is_first_time,
            is_dikshit: donor.is_dikshit,
            created_at: donor.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}
