#![allow(dead_code)]

pub mod integration;
pub mod utils;

/// Device ids used across the integration scenarios.
pub const PUMP: &str = "4711";
pub const VALVE: &str = "4712";
pub const GATEWAY: &str = "4713";
