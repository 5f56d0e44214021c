//! Chronological browsing-history report from a Firefox places store.
//!
//! [`store`] opens the database, [`parsers::places`] extracts and annotates
//! visits, [`report`] renders them (enriching video visits through
//! [`enrich`]) and [`pipeline`] ties one run together.

pub mod cli;
pub mod config;
pub mod enrich;
pub mod logging;
pub mod parsers;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod transition;
pub mod url;
