//! Integration tests for dockside.

pub mod chart_test;
pub mod conversation_test;
pub mod mysql_test;
pub mod streaming_test;
