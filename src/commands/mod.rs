pub mod dashboard;
pub mod invoices;
pub mod settings;
