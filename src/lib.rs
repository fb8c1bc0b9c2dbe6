//! Guardian oracle: watches a content registry on one chain, classifies each
//! submission, and flags the authors of malicious content on a guardian
//! contract deployed to a second chain.

#![warn(missing_docs)]

pub mod classifier;
pub mod config;
pub mod context;
pub mod contracts;
pub mod engine;
pub mod http_client;
pub mod http_server;
pub mod models;
pub mod persistence;
pub mod providers;
pub mod supervisor;
pub mod test_helpers;
pub mod transactor;
