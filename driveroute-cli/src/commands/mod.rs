pub mod config;
pub mod geocode;
pub mod route;
