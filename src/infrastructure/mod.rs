pub mod batch;
pub mod messaging;
pub mod repositories;
