pub mod carrier;
pub mod repository;
