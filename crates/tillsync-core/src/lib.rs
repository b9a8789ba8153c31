//! Tillsync Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `User`, `Report`, `StoredFile`, `MissingReport`
//! - **Identity model** - canonical filename derivation for reports
//! - **Directory index** - name-to-folder lookup over a drive listing
//! - **Reconciler** - computes which reports lack a stored document
//! - **Port definitions** - Traits for adapters: `ReportSource`,
//!   `StorageIndex`, `DocumentGenerator`
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain, identity, index, and reconcile modules contain pure business
//! logic with no I/O. Ports define trait interfaces that adapter crates
//! implement. The orchestration engine (tillsync-engine) drives the domain
//! through the port interfaces.

pub mod config;
pub mod domain;
pub mod identity;
pub mod index;
pub mod ports;
pub mod reconcile;
