pub mod client;
pub mod models;

pub use client::EnerginetClient;
pub use models::{BalanceRecord, BalanceResponse};
