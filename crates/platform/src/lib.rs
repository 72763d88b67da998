pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod filter;
pub mod secret;
