pub mod aggregate;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod error;
pub mod export;
pub mod logging;
pub mod sources;
pub mod table;
