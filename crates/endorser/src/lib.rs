//! Endorsement tables for access-control decision points.
//!
//! An endorsement records a security attribute under a 64-bit key at one
//! point of a control-flow path so a later point can verify the attribute has
//! not drifted in between. This crate provides:
//! - [`Table`]: a fixed-width, reader/writer-locked hash table of endorsements
//! - [`Variant`]: the payload representations a table can hold
//! - [`Registry`]: the named tables a host creates at startup
//! - [`RegistryConfig`]: TOML declarations for a registry
//! - [`StatsSnapshot`]: per-table and aggregate counters for inspectors
//!
//! ```
//! use amulet_endorser::{Evictable, Table, Variant};
//!
//! let creds = Table::<Evictable>::create("task_cred", 10, Variant::Blob)?;
//! creds.record(42, b"uid=0 gid=0".to_vec())?;
//! assert!(creds.verify(42, b"uid=0 gid=0"));
//! assert!(!creds.verify(42, b"uid=1000 gid=0"));
//! assert!(creds.remove(42));
//! # Ok::<(), amulet_endorser::Error>(())
//! ```

mod chain;
pub mod config;
pub mod counters;
pub mod error;
pub mod registry;
pub mod retention;
pub mod stats;
pub mod table;
pub mod variant;

pub use config::{ObjectKind, RegistryConfig, TableConfig};
pub use counters::{CounterSnapshot, Counters};
pub use error::{Error, Result};
pub use registry::{Registry, RegistryBuilder, Slot};
pub use retention::{AppendOnly, Evictable, Retention, RetentionKind};
pub use stats::{StatsSnapshot, TableStats};
pub use table::{DuplicatePolicy, MAX_BITS, Recorded, Table};
pub use variant::{InlineName, Payload, Probe, Value, Variant};
