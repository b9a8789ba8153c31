//! POS provider adapter for Tillsync
//!
//! Implements the core's [`ReportSource`](tillsync_core::ports::ReportSource)
//! and [`DocumentGenerator`](tillsync_core::ports::DocumentGenerator) ports
//! over a Zettle-style HTTP API:
//! - [`client`] - login and raw endpoint calls
//! - [`provider`] - port implementations mapping provider DTOs to domain
//!   types

pub mod client;
pub mod provider;

pub use client::{PosClient, PosCredentials};
