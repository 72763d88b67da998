pub mod context;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod profile;
pub mod readers;
pub mod selection;
pub mod sink;
pub mod source;
pub mod writers;
