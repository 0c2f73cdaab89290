//! Domain-level result types.
//! These are used inside the domain layer and are **not** exposed over the
//! public API; the REST layer maps them to the DTOs in the `shared` crate.

pub mod donors {
    use crate::backend::domain::models::donor::Donor;

    /// Result of a successful registration
    #[derive(Debug, Clone)]
    pub struct AddDonorResult {
        pub donor: Donor,
        pub success_message: String,
    }

    /// Result of the administrative bulk clear
    #[derive(Debug, Clone)]
    pub struct ClearDonorsResult {
        pub deleted_count: u64,
        pub success_message: String,
    }
}
