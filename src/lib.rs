pub mod app;
pub mod calendar;
pub mod config;
pub mod core;
pub mod error;
pub mod intake;
pub mod notify;
pub mod store;
