//! Asset Foundry schemas
//!
//! Declares what a valid asset config looks like and checks configs
//! against it.
//!
//! # Core Concepts
//!
//! - [`Variant`]: asset shape selector (`npc_portrait`, `weapon_item`, `environment_concept`)
//! - [`Schema`]: declared field set of one variant, see [`schema`]
//! - [`Validator`]: async validation contract; [`SchemaValidator`] runs in process
//! - [`ValidationResult`]: errors and warnings pinned to field paths
//! - [`rules`]: ordered cross-field business rules
//!
//! # Example
//!
//! ```rust,ignore
//! use foundry_schema::{schema, SchemaValidator, Variant};
//!
//! let config = schema(Variant::WeaponItem).default_config(42);
//! let result = SchemaValidator::new().check(&config);
//! assert!(result.success);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod catalog;
mod field;
mod result;
pub mod rules;
mod schema;
mod validator;
mod variant;

pub use field::{FieldDefault, FieldKind, FieldSpec};
pub use result::{ValidationIssue, ValidationResult};
pub use rules::{Rule, Severity};
pub use schema::{schema, Schema};
pub use validator::{SchemaValidator, ValidationServiceError, Validator};
pub use variant::{UnknownVariant, Variant};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
