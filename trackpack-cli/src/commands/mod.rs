//! Command implementations for trackpack CLI

pub mod config;
pub mod layout;
pub mod plan;
pub mod report;
