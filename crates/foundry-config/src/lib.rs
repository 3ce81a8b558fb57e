//! Asset Foundry config primitives
//!
//! Immutable configuration snapshots addressed by typed field paths.
//!
//! # Core Concepts
//!
//! - [`Config`]: JSON-object snapshot of one asset configuration
//! - [`FieldPath`]: dot-delimited address of a leaf or subtree
//! - [`accessor`]: `get` / `set` / `merge` over snapshots, never in place
//! - [`view`]: the serialized view, a total function of the config
//! - [`Fingerprint`]: Blake3 hash of a config's canonical form
//!
//! # Example
//!
//! ```rust,ignore
//! use foundry_config::{accessor, Config, FieldPath};
//!
//! let path: FieldPath = "form.ornamentation".parse()?;
//! let next = accessor::set(&config, &path, json!(0.9));
//! println!("{}", foundry_config::view::render(&next));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod accessor;
mod config;
mod hash;
mod path;
pub mod view;

pub use config::{Config, ConfigError};
pub use hash::{Fingerprint, FingerprintError};
pub use path::{FieldPath, PathError};
pub use view::ViewFormat;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
