#![forbid(unsafe_code)]

//! Core domain model and engine for the Meetbook swim meet system.
//!
//! This crate provides:
//! - Domain types (swimmers, entries, races, heats, results)
//! - Category classification across the four category systems
//! - Race discovery and program sequencing with a persisted custom order
//! - Heat seeding with centre-out lane assignment
//! - Result ranking, medals and medal tables
//! - CSV export of heat sheets and result books

pub mod types;
pub mod error;
pub mod time;
pub mod category;
pub mod races;
pub mod program;
pub mod store;
pub mod heats;
pub mod results;
pub mod medals;
pub mod config;
pub mod logging;
pub mod meet;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use category::{classify, sort_key, AgeGroup, Category, SchoolLevel};
pub use races::discover;
pub use program::{Direction, ProgramSequencer};
pub use store::{JsonOrderStore, MemoryOrderStore, ProgramOrderStore};
pub use heats::{HeatBuilder, TieBreak};
pub use results::rank;
pub use medals::{best_swimmers, tabulate_clubs, tabulate_swimmers};
pub use config::Config;
pub use meet::{Meet, RaceHeats};
