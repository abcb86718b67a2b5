//! Marketplace state machines driven by handlers and background jobs.
//!
//! - [`booking_flow`] -- party-initiated booking actions (accept, pay, ...).
//! - [`dispute_resolution`] -- closing a dispute and settling the escrow.

pub mod booking_flow;
pub mod dispute_resolution;
