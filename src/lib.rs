//! Placement Engine
//!
//! This crate assigns candidates to a fixed set of locations using merit
//! scores, ranked preference lists and a tiered lottery fallback. The engine
//! consumes plain snapshots and produces assignment records; persistence and
//! presentation are left to the caller.

#![warn(missing_docs)]

pub mod allocation;
pub mod config;
pub mod error;
pub mod models;

pub use allocation::{Allocator, allocate, final_score};
