//! Dockside - a conversational front-end for fuel-supply telemetry.
//!
//! This library exposes the core modules for use in integration tests.

pub mod chart;
pub mod classify;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod intent;
pub mod llm;
pub mod logging;
pub mod orchestrator;
pub mod query;
pub mod session;
pub mod ui;
