//! API endpoint handlers.

pub mod activation;
pub mod report;
pub mod sales;
