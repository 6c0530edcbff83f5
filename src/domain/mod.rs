pub mod cadence;
pub mod errors;
pub mod models;
pub mod repositories;
