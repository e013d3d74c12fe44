pub mod report_service;
pub use report_service::ReportAggregator;
