//! API handlers

pub mod analyze;
pub mod health;
pub mod report;
pub mod sample;
pub mod upload;
