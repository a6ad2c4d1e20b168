pub mod commands;
pub mod config;
pub mod errors;
pub mod models;
pub mod pagination;
pub mod services;
pub mod utils;
