pub mod api;
pub mod dashboard;
pub mod invoice_service;
pub mod sample;
pub mod state;
pub mod upload;
pub mod watcher;
