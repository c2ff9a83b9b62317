pub mod airports;
pub mod error;
pub mod planes;
