//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: in-memory entity store used without a database
//! - **media**: filesystem and in-memory blob stores
//! - **static_site**: filesystem and HTTP sources for the front-end bundle
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business rules.

pub mod media;
pub mod memory;
pub mod persistence;
pub mod static_site;
