//! jira-helper - compose, save and run JQL searches from a terminal REPL.
//!
//! The REPL binds single keys to commands that run JQL against a JIRA
//! server, flatten the returned issues onto chosen fields, and remember
//! queries and field selections between runs.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod repl;
pub mod search;
pub mod store;
