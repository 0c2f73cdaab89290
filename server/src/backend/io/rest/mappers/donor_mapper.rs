//! Mappers for converting donor domain results into shared DTOs.

use shared::{
    ClearDonorsResponse, CreateDonorResponse, Donor as SharedDonor, DonorListResponse,
    PhoneValidationResponse,
};

use crate::backend::domain::commands::donors::{AddDonorResult, ClearDonorsResult};
use crate::backend::domain::errors::PhoneNumberError;
use crate::backend::domain::models::donor::Donor as DomainDonor;

pub struct DonorMapper;

impl DonorMapper {
    pub fn to_dto(domain: DomainDonor) -> SharedDonor {
        domain.into()
    }

    pub fn to_create_response(result: AddDonorResult) -> CreateDonorResponse {
        CreateDonorResponse {
            donor: Self::to_dto(result.donor),
            success_message: result.success_message,
        }
    }

    pub fn to_list_response(donors: Vec<DomainDonor>) -> DonorListResponse {
        DonorListResponse {
            donors: donors.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_clear_response(result: ClearDonorsResult) -> ClearDonorsResponse {
        ClearDonorsResponse {
            deleted_count: result.deleted_count,
            success_message: result.success_message,
        }
    }

    pub fn to_phone_validation_response(
        result: Result<String, PhoneNumberError>,
    ) -> PhoneValidationResponse {
        match result {
            Ok(normalized) => PhoneValidationResponse {
                valid: true,
                normalized: Some(normalized),
                reason: None,
            },
            Err(e) => PhoneValidationResponse {
                valid: false,
                normalized: None,
                reason: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::{BloodType, Gender};

    #[test]
    fn test_to_dto_formats_created_at_as_utc() {
        let domain = DomainDonor {
            id: "abc".to_string(),
            name: "Asha".to_string(),
            gender: Gender::Female,
            blood_type: BloodType::ONegative,
            phone_number: "9123456789".to_string(),
            age: Some(25),
            address: String::new(),
            city: "Surat".to_string(),
            is_first_time: false,
            is_dikshit: true,
            created_at: Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap(),
        };

        let dto = DonorMapper::to_dto(domain);
        assert_eq!(dto.created_at, "2025-01-15T09:30:00.000000Z");
        assert_eq!(dto.blood_type, BloodType::ONegative);
        assert!(dto.is_dikshit);
    }

    #[test]
    fn test_phone_validation_response() {
        let ok = DonorMapper::to_phone_validation_response(Ok("9123456789".to_string()));
        assert!(ok.valid);
        assert_eq!(ok.normalized.as_deref(), Some("9123456789"));
        assert!(ok.reason.is_none());

        let bad = DonorMapper::to_phone_validation_response(Err(PhoneNumberError::WrongLength(9)));
        assert!(!bad.valid);
        assert!(bad.normalized.is_none());
        assert_eq!(
            bad.reason.as_deref(),
            Some("Phone number must have exactly 10 digits (got 9)")
        );
    }
}
