//! Asset Foundry Core - editing sessions
//!
//! Owns the live configuration of one asset and everything that happens to
//! it:
//! - Applies edits through typed field paths checked against the schema
//! - Debounces validation and drops answers for superseded revisions
//! - Switches asset types without carrying fields over
//! - Gates generation on a valid config and records results in a ledger
//!
//! # Core Concepts
//!
//! - [`ConfigStore`]: the session handle; every transition is published as a [`StoreSnapshot`]
//! - [`ValidationState`]: lifecycle checked by [`state_machine`]
//! - [`Generation`]: revision tag that makes stale async results detectable
//! - [`HistoryLedger`]: append-only record of generated assets
//! - [`services`]: async seams for defaults, generation and history backends
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use foundry_core::{ConfigStore, Variant};
//!
//! # async fn example(generator: Arc<dyn foundry_core::GenerationService>) -> Result<(), foundry_core::FoundryError> {
//! let store = ConfigStore::builder(generator).build()?;
//! store.switch_variant(Variant::WeaponItem).await?;
//! store.set_str("item.rarity", "legendary".into())?;
//! store.set_str("form.ornamentation", 0.95.into())?;
//!
//! let snapshot = store.flush().await?;
//! if snapshot.can_generate() {
//!     let record = store.generate().await?;
//!     println!("generated {}", record.result().locator);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod ledger;
pub mod services;
pub mod settings;
pub mod state_machine;
pub mod store;
pub mod types;

pub use error::{
    FoundryError, PreconditionError, ServiceError, SettingsError, StoreError, TransitionError,
};
pub use ledger::{HistoryLedger, InMemoryHistory};
pub use services::{DefaultsProvider, GenerationService, HistoryProvider, SchemaDefaults, SeedPolicy};
pub use settings::StoreSettings;
pub use store::{ConfigStore, ConfigStoreBuilder, StoreSnapshot};
pub use types::{
    AssetRecord, DefaultsResponse, Generation, LastKnownGood, RecordId, ResultDescriptor,
    ValidationState,
};

pub use foundry_config::{Config, FieldPath};
pub use foundry_schema::{ValidationIssue, ValidationResult, Variant};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a session
    pub use crate::{
        Config, ConfigStore, FieldPath, FoundryError, GenerationService, StoreSettings,
        StoreSnapshot, ValidationState, Variant,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
