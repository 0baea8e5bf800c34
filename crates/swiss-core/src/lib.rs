//! Core types for swiss: configuration, logging, tournament data, and the
//! player completion service.

pub mod complete;
pub mod config;
pub mod logging;
pub mod tournament;
