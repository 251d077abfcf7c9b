//! `leadboard` - A server-rendered lead analytics dashboard over SmartSuite records
//!
//! This library fetches lead records from a SmartSuite table, normalizes them,
//! fills in missing coordinates through a geocoder chain, and serves a
//! dashboard with state, company and radius filters.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analytics;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod geo;
pub mod lead;
pub mod logging;
pub mod smartsuite;
pub mod states;
pub mod store;
pub mod web;

pub use config::Config;
pub use error::{Error, Result};
pub use geo::{GeocodeResult, Geocoder};
pub use lead::{Coordinates, Lead, ScoredLead};
pub use logging::init_logging;
pub use smartsuite::SmartSuiteClient;
pub use store::{LeadSource, LeadStore, LoadState, Refresher};
