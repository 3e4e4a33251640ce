//! CLI command implementations

pub mod address;
pub mod export_view_key;
pub mod info;
pub mod keygen;
pub mod pay;
pub mod recover;
pub mod register;
pub mod scan;
