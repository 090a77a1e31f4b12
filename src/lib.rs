//! # galeri-listings
//!
//! REST backend for a dealership vehicle catalog.
//!
//! This crate stores vehicle listings, serves the public catalog with its
//! filters, exposes the create / read / update / delete API used by the
//! admin panel, and ingests listings from an external marketplace keyed by
//! their scrape id.
//!
//! ## Architecture
//!
//! ```text
//! Clients (catalog page, admin panel)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── VehicleService, IngestionService (service/)
//!     │
//!     ├── VehicleStore (persistence/)
//!     │     ├── PostgreSQL
//!     │     └── in-memory
//!     │
//!     └── Vehicle, CatalogFilter (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
