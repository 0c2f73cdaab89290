pub mod donor_mapper;

pub use donor_mapper::DonorMapper;
