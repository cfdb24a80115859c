//! GitHub repository report: REST client, response models, report composition
//! and the chat command that ties them together.

pub mod client;
pub mod command;
pub mod models;
pub mod report;

pub use command::{RepoReportBuilder, ReportSettings, FETCH_ERROR_TEXT};
