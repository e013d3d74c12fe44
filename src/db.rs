pub mod reporting_source;
pub use reporting_source::ReportingDataSource;
pub mod http_source;
pub use http_source::HttpReportingSource;
pub mod pg_source;
pub use pg_source::PgReportingSource;
