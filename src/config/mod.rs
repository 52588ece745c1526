//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! deployment annotations        config map data
//!     → layer.rs (parse_layer)      → layer.rs (parse_layer)
//!           │  keys.rs resolves dotted keys, coerces values
//!           └──────────────┬──────────────┘
//!                          ▼
//!     merge.rs (defaults ← annotations ← config map)
//!     → RouterConfig (schema.rs)
//!     → validation.rs (semantic checks)
//!     → handed to the template renderer
//! ```
//!
//! # Design Decisions
//! - A fresh RouterConfig per reconciliation pass; never mutated after render
//! - Key dispatch is an explicit table, not derived from field names
//! - Unknown keys are skipped so unrelated annotations never break a merge
//! - A malformed value for a known key aborts the whole merge

pub mod keys;
pub mod layer;
pub mod loader;
pub mod merge;
pub mod schema;
pub mod validation;

pub use keys::{ConfigField, KeyPath, LayerSource, ValueKind, KEY_TABLE};
pub use layer::{parse_layer, Layer, MergeError};
pub use loader::{load_snapshot, RouterSnapshot, SnapshotError};
pub use merge::{merge_router_config, merge_router_config_with, Precedence};
pub use schema::{AppConfig, BuilderConfig, GzipConfig, HstsConfig, RouterConfig, SslConfig};
pub use validation::{validate_config, ValidationError};
