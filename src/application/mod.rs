// Page objects
pub mod ftse100_page;
pub mod homepage;

// Pure transforms and checks
pub mod monthly_average;
pub mod validation;

// Scenario orchestration
pub mod reports;
