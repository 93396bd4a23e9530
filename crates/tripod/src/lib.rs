//! Configuration and reporting for the `tripod` command-line tool.

pub mod config;
pub mod report;
