// Scraped records
pub mod constituent;
pub mod historical;

// Table ordering
pub mod sorting;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
