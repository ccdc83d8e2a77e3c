pub mod aggregate;
pub mod config;
pub mod detail_fetch;
pub mod error;
pub mod http_client;
pub mod name_match;
pub mod pipeline;
pub mod provider;
pub mod quote_export;
pub mod quote_types;
pub mod report;
pub mod roster;
pub mod schedule_fetch;
