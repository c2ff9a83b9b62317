pub mod aircraft;
pub mod airport;
pub mod cache;
pub mod conflict;
pub mod geodesy;
pub mod source;
pub mod web;
