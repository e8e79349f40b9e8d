//! Command-line argument groups.

mod bank;
mod log;

pub use bank::BankArgs;
pub use log::LogArgs;
