pub mod analyzers;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod filter;
pub mod output;
pub mod pagination;
pub mod record;
pub mod table;
