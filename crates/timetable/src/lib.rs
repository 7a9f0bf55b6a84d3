//! Weekly class timetable planner.
//!
//! Users search a catalog of scheduled course sessions, check the ones they
//! want and apply them to a personal day x slot grid. Applying commits
//! sessions first-come first-served, rejects those whose cell is already
//! taken and derives the other meetings of every committed course.
//!
//! - [`planner`]: search, selection, clash resolution and grid projection
//! - [`catalog`]: catalog providers and caching
//! - [`server`]: HTTP API hosting one planning session per client token

pub mod catalog;
pub mod config;
pub mod planner;
pub mod server;
pub mod session;
pub mod types;
