pub mod app;
pub mod auth;
pub mod calc;
pub mod config;
pub mod error;
pub mod state;
pub mod telemetry;
pub mod users;
