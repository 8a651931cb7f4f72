//! Invoice tracking client: typed backend access, dashboard state and a
//! terminal front-end.

pub mod commands;
pub mod components;
pub mod config;
pub mod errors;
pub mod models;
pub mod router;
pub mod services;
pub mod utils;
