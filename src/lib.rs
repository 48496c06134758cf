//! Batch cleaning pipelines for European aviation and population statistics.
//!
//! Ingests yearly CSV extracts of airport traffic and per-state CO2
//! emissions plus a European population table, filters them to the EU-27
//! member states, aggregates by year/month/state, derives fuel-consumption
//! and population-growth metrics, and writes cleaned CSVs.

pub mod emissions;
pub mod error;
pub mod frame;
pub mod members;
pub mod population;
pub mod schema;
pub mod traffic;

pub use error::StatError;
