pub mod core;
pub mod csv_report;
pub mod factory;
pub mod lse;
pub mod mock;
pub mod refinitiv;

pub use csv_report::CsvReportWriter;
pub use factory::ServiceFactory;
