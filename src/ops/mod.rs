//! High-level operations.

pub mod build_asset;
pub mod doctor;

pub use build_asset::{build_asset, AssetOptions, AssetOutput};
pub use doctor::{doctor, format_report, DoctorReport};
