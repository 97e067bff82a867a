//! Command handlers for the CLI
//!
//! Each handler loads what it needs from [`Config`](crate::config::Config),
//! builds a [`DataSource`](crate::datasource::DataSource), invokes one host
//! operation and prints the outcome.
//!
//! - `query`  - run a query request and print the result frames
//! - `health` - run the health check

pub mod health;
pub mod query;
