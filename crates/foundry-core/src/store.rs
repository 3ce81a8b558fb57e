//! Session store
//!
//! [`ConfigStore`] owns one editing session: the active variant, its config,
//! the latest validation outcome and the live view. Every mutation goes
//! through a single `parking_lot::Mutex` and is checked against the
//! lifecycle table in [`state_machine`](crate::state_machine) before it is
//! applied. After each transition the store publishes one [`StoreSnapshot`]
//! on a `watch` channel, so observers never see the view, the state and the
//! result disagree.
//!
//! # Async work
//!
//! Edits never wait. Each edit bumps the [`Generation`] and spawns a timer
//! tagged with it; when the quiet period elapses the timer issues validation
//! only if its tag is still current. Validation responses are applied by
//! [`ConfigStore::complete_validation`] under the same rule, so late answers
//! for an older config are dropped. No lock is held across an `.await`.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::watch;

use foundry_config::{accessor, Config, FieldPath};
use foundry_schema::{
    schema, SchemaValidator, ValidationIssue, ValidationResult, ValidationServiceError, Validator,
    Variant,
};

use crate::error::{FoundryError, PreconditionError, ServiceError, StoreError, TransitionError};
use crate::ledger::HistoryLedger;
use crate::services::{DefaultsProvider, GenerationService, SchemaDefaults};
use crate::settings::StoreSettings;
use crate::state_machine::validate_transition;
use crate::types::{AssetRecord, Generation, LastKnownGood, RecordId, ValidationState};

/// Consistent view of a session at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    /// Active variant; `None` while empty
    pub variant: Option<Variant>,
    /// Current config
    pub config: Config,
    /// Serialized config in the configured view format
    pub view: String,
    /// Validation lifecycle state
    pub state: ValidationState,
    /// Outcome for the current config, once validated
    pub result: Option<ValidationResult>,
    /// Revision tag of `config`
    pub generation: Generation,
    /// Last validation service failure, cleared by the next answer
    pub service_error: Option<ServiceError>,
    /// A generation call is in flight
    pub generating: bool,
    /// Provider notes that came with the loaded defaults
    pub notes: Vec<ValidationIssue>,
}

impl StoreSnapshot {
    /// Whether [`ConfigStore::generate`] would be accepted now
    #[inline]
    #[must_use]
    pub fn can_generate(&self) -> bool {
        self.state == ValidationState::Valid && !self.generating
    }

    /// Whether the validation service is currently reported unavailable
    #[inline]
    #[must_use]
    pub fn service_unavailable(&self) -> bool {
        self.service_error.is_some()
    }
}

#[derive(Debug)]
struct Session {
    variant: Option<Variant>,
    config: Config,
    view: String,
    state: ValidationState,
    result: Option<ValidationResult>,
    generation: Generation,
    service_error: Option<ServiceError>,
    generating: bool,
    notes: Vec<ValidationIssue>,
    last_known_good: Option<LastKnownGood>,
}

impl Session {
    fn new(settings: &StoreSettings) -> Self {
        let config = Config::new();
        Self {
            variant: None,
            view: settings.view_format.render(&config),
            config,
            state: ValidationState::Empty,
            result: None,
            generation: Generation::default(),
            service_error: None,
            generating: false,
            notes: Vec::new(),
            last_known_good: None,
        }
    }

    fn transition(&mut self, to: ValidationState) -> Result<(), TransitionError> {
        validate_transition(self.state, to)?;
        tracing::trace!(from = %self.state, %to, generation = %self.generation, "transition");
        self.state = to;
        Ok(())
    }

    fn replace_config(&mut self, config: Config, settings: &StoreSettings) {
        self.view = settings.view_format.render(&config);
        self.config = config;
    }

    fn active_variant(&self) -> Result<Variant, StoreError> {
        self.variant.ok_or(StoreError::NoActiveVariant)
    }

    fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            variant: self.variant,
            config: self.config.clone(),
            view: self.view.clone(),
            state: self.state,
            result: self.result.clone(),
            generation: self.generation,
            service_error: self.service_error.clone(),
            generating: self.generating,
            notes: self.notes.clone(),
        }
    }
}

struct Inner {
    session: Mutex<Session>,
    snapshots: watch::Sender<StoreSnapshot>,
    runtime: Handle,
    settings: StoreSettings,
    defaults: Arc<dyn DefaultsProvider>,
    validator: Arc<dyn Validator>,
    generator: Arc<dyn GenerationService>,
    ledger: HistoryLedger,
}

impl Inner {
    fn publish(&self, session: &Session) {
        self.snapshots.send_replace(session.snapshot());
    }
}

/// Handle to one editing session
///
/// Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("session", &*self.inner.session.lock())
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ConfigStore`]
pub struct ConfigStoreBuilder {
    settings: StoreSettings,
    defaults: Arc<dyn DefaultsProvider>,
    validator: Arc<dyn Validator>,
    generator: Arc<dyn GenerationService>,
    ledger: HistoryLedger,
}

impl ConfigStoreBuilder {
    /// With settings
    #[must_use]
    pub fn with_settings(mut self, settings: StoreSettings) -> Self {
        self.settings = settings;
        self
    }

    /// With defaults provider
    #[must_use]
    pub fn with_defaults(mut self, defaults: Arc<dyn DefaultsProvider>) -> Self {
        self.defaults = defaults;
        self
    }

    /// With validation service
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    /// With history ledger
    #[must_use]
    pub fn with_ledger(mut self, ledger: HistoryLedger) -> Self {
        self.ledger = ledger;
        self
    }

    /// Build the store on the current Tokio runtime
    ///
    /// # Errors
    /// Returns [`StoreError::NoRuntime`] when called outside a runtime.
    pub fn build(self) -> Result<ConfigStore, StoreError> {
        let runtime = Handle::try_current().map_err(|_| StoreError::NoRuntime)?;
        let session = Session::new(&self.settings);
        let (snapshots, _) = watch::channel(session.snapshot());
        Ok(ConfigStore {
            inner: Arc::new(Inner {
                session: Mutex::new(session),
                snapshots,
                runtime,
                settings: self.settings,
                defaults: self.defaults,
                validator: self.validator,
                generator: self.generator,
                ledger: self.ledger,
            }),
        })
    }
}

impl ConfigStore {
    /// Start building a store around `generator`
    ///
    /// Defaults to [`SchemaDefaults`], [`SchemaValidator`] and an in-memory
    /// ledger.
    #[must_use]
    pub fn builder(generator: Arc<dyn GenerationService>) -> ConfigStoreBuilder {
        ConfigStoreBuilder {
            settings: StoreSettings::default(),
            defaults: Arc::new(SchemaDefaults::new()),
            validator: Arc::new(SchemaValidator::new()),
            generator,
            ledger: HistoryLedger::in_memory(),
        }
    }

    // === Observation ===

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        self.inner.snapshots.borrow().clone()
    }

    /// Receiver notified after every transition
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.inner.snapshots.subscribe()
    }

    /// Live serialized view of the config
    #[must_use]
    pub fn view(&self) -> String {
        self.inner.snapshots.borrow().view.clone()
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> ValidationState {
        self.inner.snapshots.borrow().state
    }

    /// Most recent config that validated without errors
    #[must_use]
    pub fn last_known_good(&self) -> Option<LastKnownGood> {
        self.inner.session.lock().last_known_good.clone()
    }

    /// Generation history
    #[inline]
    #[must_use]
    pub fn history(&self) -> &HistoryLedger {
        &self.inner.ledger
    }

    /// Store settings
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &StoreSettings {
        &self.inner.settings
    }

    // === Loading ===

    /// Replace the config wholesale with the stock config of `variant`
    ///
    /// The current config stays visible until the defaults arrive. Provider
    /// warnings are kept on the snapshot as `notes`. If the provider fails,
    /// validation of the current config is re-armed.
    ///
    /// # Errors
    /// - [`ServiceError::NotFound`] if the provider does not know `variant`
    /// - [`StoreError::Superseded`] if a newer load, restore or reset landed
    ///   while the defaults were in flight
    pub async fn load_defaults(&self, variant: Variant) -> Result<StoreSnapshot, FoundryError> {
        let ticket = {
            let mut session = self.inner.session.lock();
            let ticket = session.generation.bump();
            self.inner.publish(&session);
            ticket
        };

        let response = self.inner.defaults.request_defaults(variant).await;

        let mut session = self.inner.session.lock();
        if session.generation != ticket {
            tracing::debug!(%variant, %ticket, current = %session.generation, "stale defaults discarded");
            return Err(StoreError::Superseded { variant }.into());
        }
        let response = match response {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%variant, error = %err, "defaults request failed");
                // the ticket made pending work for the current config stale
                if session.state == ValidationState::Validating {
                    session.transition(ValidationState::Editing)?;
                }
                if session.state == ValidationState::Editing && session.variant.is_some() {
                    self.schedule_debounce(session.generation);
                }
                self.inner.publish(&session);
                return Err(err.into());
            }
        };

        session.transition(ValidationState::Defaulted)?;
        session.variant = Some(variant);
        session.replace_config(response.config, &self.inner.settings);
        session.result = None;
        session.service_error = None;
        session.generation.bump();
        for warning in &response.warnings {
            tracing::info!(%variant, %warning, "defaults note");
        }
        session.notes = response.warnings;
        tracing::info!(%variant, generation = %session.generation, "defaults loaded");

        if self.inner.settings.validate_on_load {
            self.spawn_validation(&mut session)?;
        }
        self.inner.publish(&session);
        Ok(session.snapshot())
    }

    /// Discard the session and load `variant` from scratch
    ///
    /// Outstanding validation for the old config becomes stale. Nothing of
    /// the old config carries over.
    ///
    /// # Errors
    /// As [`load_defaults`](Self::load_defaults); on `NotFound` the store
    /// stays empty.
    pub async fn switch_variant(&self, variant: Variant) -> Result<StoreSnapshot, FoundryError> {
        let from = self.reset();
        tracing::info!(from = ?from, to = %variant, "switching asset type");
        self.load_defaults(variant).await
    }

    /// [`switch_variant`](Self::switch_variant) by wire id or alias
    ///
    /// # Errors
    /// [`ServiceError::NotFound`] for an unknown name, leaving the store
    /// empty; otherwise as [`switch_variant`](Self::switch_variant).
    pub async fn switch_variant_named(&self, name: &str) -> Result<StoreSnapshot, FoundryError> {
        match name.parse::<Variant>() {
            Ok(variant) => self.switch_variant(variant).await,
            Err(err) => {
                self.reset();
                tracing::warn!(name, "unknown asset type");
                Err(ServiceError::NotFound(err.to_string()).into())
            }
        }
    }

    /// Drop everything and return to `Empty`
    ///
    /// Returns the variant that was active.
    pub fn reset(&self) -> Option<Variant> {
        let mut session = self.inner.session.lock();
        let previous = session.variant.take();
        // every state may reset
        session.state = ValidationState::Empty;
        session.replace_config(Config::new(), &self.inner.settings);
        session.result = None;
        session.service_error = None;
        session.notes.clear();
        session.generation.bump();
        tracing::debug!(generation = %session.generation, "session reset");
        self.inner.publish(&session);
        previous
    }

    /// Load a history record's variant and config in one transition
    ///
    /// # Errors
    /// Only if the lifecycle table refuses the reload.
    pub fn restore(&self, record: &AssetRecord) -> Result<StoreSnapshot, StoreError> {
        let mut session = self.inner.session.lock();
        session.transition(ValidationState::Defaulted)?;
        session.variant = Some(record.variant());
        session.replace_config(record.config().clone(), &self.inner.settings);
        session.result = None;
        session.service_error = None;
        session.notes.clear();
        session.generation.bump();
        tracing::info!(
            id = %record.id(),
            variant = %record.variant(),
            generation = %session.generation,
            "record restored"
        );
        if self.inner.settings.validate_on_load {
            self.spawn_validation(&mut session)?;
        }
        self.inner.publish(&session);
        Ok(session.snapshot())
    }

    /// Look up a record in the ledger and [`restore`](Self::restore) it
    ///
    /// # Errors
    /// [`ServiceError::NotFound`] if the ledger has no such record.
    pub async fn restore_by_id(&self, id: RecordId) -> Result<StoreSnapshot, FoundryError> {
        let record = self
            .inner
            .ledger
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("history record {id}")))?;
        Ok(self.restore(&record)?)
    }

    // === Editing ===

    /// Write `value` at `path`
    ///
    /// A group path takes an object of its declared fields and merges it
    /// into the group; fields it does not name keep their values. Clears the
    /// previous result, bumps the generation and restarts the debounce
    /// timer. Returns the new generation.
    ///
    /// # Errors
    /// - [`StoreError::NoActiveVariant`] before any variant is loaded
    /// - [`StoreError::UndeclaredField`] if the write would add a leaf the
    ///   active variant does not declare, or turn a group into a scalar
    pub fn set(&self, path: &FieldPath, value: Value) -> Result<Generation, StoreError> {
        let mut session = self.inner.session.lock();
        let variant = session.active_variant()?;
        let schema = schema(variant);
        if !schema.declares(path) {
            return Err(StoreError::UndeclaredField {
                path: path.to_string(),
                variant,
            });
        }
        tracing::trace!(%path, %value, group = schema.is_group(path), "set");
        let edit = Config::new().with(path, value);
        check_declared(variant, &edit)?;
        let config = accessor::merge(&session.config, &edit);
        Ok(self.commit_edit(&mut session, config)?)
    }

    /// [`set`](Self::set) with a dotted path
    ///
    /// # Errors
    /// [`StoreError::Path`] for a malformed path, otherwise as
    /// [`set`](Self::set).
    pub fn set_str(&self, path: &str, value: Value) -> Result<Generation, StoreError> {
        let path: FieldPath = path.parse()?;
        self.set(&path, value)
    }

    /// Deep-merge `overrides` onto the config as a single edit
    ///
    /// # Errors
    /// [`StoreError::UndeclaredField`] for the first leaf of `overrides`
    /// that is not a declared field; otherwise as [`set`](Self::set).
    pub fn apply_overrides(&self, overrides: &Config) -> Result<Generation, StoreError> {
        let mut session = self.inner.session.lock();
        let variant = session.active_variant()?;
        check_declared(variant, overrides)?;
        tracing::trace!(fields = overrides.leaf_paths().len(), "apply overrides");
        let config = accessor::merge(&session.config, overrides);
        Ok(self.commit_edit(&mut session, config)?)
    }

    fn commit_edit(
        &self,
        session: &mut Session,
        config: Config,
    ) -> Result<Generation, TransitionError> {
        session.transition(ValidationState::Editing)?;
        session.replace_config(config, &self.inner.settings);
        session.result = None;
        let tag = session.generation.bump();
        self.schedule_debounce(tag);
        self.inner.publish(session);
        Ok(tag)
    }

    // === Validation ===

    fn schedule_debounce(&self, tag: Generation) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let delay = self.inner.settings.debounce();
        tracing::debug!(%tag, ?delay, "debounce scheduled");
        self.inner.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                ConfigStore { inner }.debounce_elapsed(tag);
            }
        });
    }

    fn debounce_elapsed(&self, tag: Generation) {
        let mut session = self.inner.session.lock();
        let pending = matches!(
            session.state,
            ValidationState::Editing | ValidationState::Defaulted
        );
        if session.generation != tag || !pending {
            tracing::debug!(%tag, current = %session.generation, "debounce superseded");
            return;
        }
        if let Err(err) = self.spawn_validation(&mut session) {
            tracing::warn!(error = %err, "debounced validation not started");
            return;
        }
        self.inner.publish(&session);
    }

    /// Move to `Validating` and capture what to validate
    fn begin_validation(session: &mut Session) -> Result<(Generation, Config), TransitionError> {
        if session.state != ValidationState::Validating {
            session.transition(ValidationState::Validating)?;
        }
        Ok((session.generation, session.config.clone()))
    }

    fn spawn_validation(&self, session: &mut Session) -> Result<Generation, TransitionError> {
        let (tag, config) = Self::begin_validation(session)?;
        let store = self.clone();
        self.inner.runtime.spawn(async move {
            let outcome = store.inner.validator.validate(&config).await;
            store.complete_validation(tag, outcome);
        });
        Ok(tag)
    }

    /// Apply a validation outcome issued for generation `tag`
    ///
    /// Returns `false` and changes nothing if `tag` is no longer current or
    /// no validation is outstanding. A normalized config replaces the local
    /// one only when the result passed. A service failure raises the
    /// unavailable flag and returns the session to `Editing`; the last
    /// known-good state is kept.
    pub fn complete_validation(
        &self,
        tag: Generation,
        outcome: Result<ValidationResult, ValidationServiceError>,
    ) -> bool {
        let mut session = self.inner.session.lock();
        if session.generation != tag || session.state != ValidationState::Validating {
            tracing::debug!(%tag, current = %session.generation, state = %session.state, "stale validation discarded");
            return false;
        }

        match outcome {
            Ok(mut result) => {
                if let Some(normalized) = result.normalized_config.take() {
                    if !result.is_valid() {
                        tracing::debug!(%tag, "normalized config of a failed result ignored");
                    } else if normalized_matches(&normalized, session.variant) {
                        session.replace_config(normalized.clone(), &self.inner.settings);
                        result.normalized_config = Some(normalized);
                    } else {
                        tracing::warn!(%tag, "normalized config for another asset type ignored");
                    }
                }
                let to = if result.is_valid() {
                    ValidationState::Valid
                } else {
                    ValidationState::Invalid
                };
                if let Err(err) = session.transition(to) {
                    tracing::warn!(error = %err, "validation outcome not applied");
                    return false;
                }
                session.service_error = None;
                if let (ValidationState::Valid, Some(variant)) = (to, session.variant) {
                    session.last_known_good = Some(LastKnownGood {
                        variant,
                        config: session.config.clone(),
                        result: result.clone(),
                    });
                }
                tracing::debug!(
                    %tag,
                    state = %to,
                    errors = result.errors.len(),
                    warnings = result.warnings.len(),
                    "validation applied"
                );
                session.result = Some(result);
            }
            Err(err) => {
                tracing::warn!(%tag, error = %err, "validation service failed");
                if let Err(refused) = session.transition(ValidationState::Editing) {
                    tracing::warn!(error = %refused, "validation failure not applied");
                    return false;
                }
                session.service_error = Some(err.into());
            }
        }
        self.inner.publish(&session);
        true
    }

    /// Validate the current config now and wait for the outcome
    ///
    /// Skips the debounce window. A settled session is returned as is.
    ///
    /// # Errors
    /// [`StoreError::NoActiveVariant`] when empty; the validation service's
    /// error if it fails (the unavailable flag is raised as well).
    pub async fn flush(&self) -> Result<StoreSnapshot, FoundryError> {
        let (tag, config) = {
            let mut session = self.inner.session.lock();
            session.active_variant()?;
            if session.state.is_settled() {
                return Ok(session.snapshot());
            }
            let pending = Self::begin_validation(&mut session)?;
            self.inner.publish(&session);
            pending
        };

        let outcome = self.inner.validator.validate(&config).await;
        let failure = outcome.as_ref().err().cloned();
        self.complete_validation(tag, outcome);
        match failure {
            Some(err) => Err(err.into()),
            None => Ok(self.snapshot()),
        }
    }

    /// Re-issue validation for the current config after a service failure
    ///
    /// Returns the generation the request is tagged with.
    ///
    /// # Errors
    /// [`StoreError::NoActiveVariant`] when empty, [`StoreError::Transition`]
    /// if the session is already settled.
    pub fn retry_validation(&self) -> Result<Generation, StoreError> {
        let mut session = self.inner.session.lock();
        session.active_variant()?;
        let tag = self.spawn_validation(&mut session)?;
        tracing::info!(%tag, "validation retried");
        self.inner.publish(&session);
        Ok(tag)
    }

    // === Generation ===

    /// Generate an asset from the current config and record it
    ///
    /// Checked at call time: the session must be `Valid` and no other
    /// generation may be running. Rejections never reach the service.
    ///
    /// # Errors
    /// - [`PreconditionError`] when the checks above fail
    /// - [`ServiceError`] from the generation service or the ledger
    pub async fn generate(&self) -> Result<AssetRecord, FoundryError> {
        let (variant, config, tag) = {
            let mut session = self.inner.session.lock();
            if session.state != ValidationState::Valid {
                return Err(PreconditionError::NotValid {
                    state: session.state,
                }
                .into());
            }
            if session.generating {
                return Err(PreconditionError::GenerationInFlight.into());
            }
            let variant = session
                .variant
                .ok_or(PreconditionError::NoActiveVariant)?;
            session.generating = true;
            self.inner.publish(&session);
            (variant, session.config.clone(), session.generation)
        };
        let _busy = GeneratingGuard { store: self };

        tracing::info!(%variant, %tag, fingerprint = %config.fingerprint().short(), "generation started");
        let descriptor = match self.inner.generator.request_generation(&config).await {
            Ok(descriptor) => descriptor,
            Err(err) => {
                tracing::warn!(%variant, %tag, error = %err, "generation failed");
                return Err(err.into());
            }
        };
        let record = self.inner.ledger.append(variant, config, descriptor).await?;
        tracing::info!(%variant, id = %record.id(), locator = %record.result().locator, "generation finished");
        Ok(record)
    }
}

/// Clears the busy flag when a generation ends, including on cancellation
struct GeneratingGuard<'a> {
    store: &'a ConfigStore,
}

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        let mut session = self.store.inner.session.lock();
        session.generating = false;
        self.store.inner.publish(&session);
    }
}

/// Every leaf `edit` writes must be a declared field of `variant`
fn check_declared(variant: Variant, edit: &Config) -> Result<(), StoreError> {
    match schema(variant).first_undeclared_leaf(edit) {
        None => Ok(()),
        Some(path) => Err(StoreError::UndeclaredField {
            path: path.to_string(),
            variant,
        }),
    }
}

fn normalized_matches(normalized: &Config, variant: Option<Variant>) -> bool {
    let Some(variant) = variant else {
        return false;
    };
    let asset_type = FieldPath::single("assetType").ok();
    asset_type
        .as_ref()
        .and_then(|path| normalized.get_str(path))
        .is_some_and(|name| name == variant.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResultDescriptor;
    use serde_json::json;

    struct NullGenerator;

    #[async_trait::async_trait]
    impl GenerationService for NullGenerator {
        async fn request_generation(
            &self,
            _config: &Config,
        ) -> Result<ResultDescriptor, ServiceError> {
            Ok(ResultDescriptor::new("mem://null", 1, 1))
        }
    }

    fn store() -> ConfigStore {
        ConfigStore::builder(Arc::new(NullGenerator)).build().unwrap()
    }

    #[test]
    fn build_requires_runtime() {
        let err = ConfigStore::builder(Arc::new(NullGenerator)).build().unwrap_err();
        assert_eq!(err, StoreError::NoRuntime);
    }

    #[tokio::test]
    async fn new_store_is_empty() {
        let store = store();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.state, ValidationState::Empty);
        assert_eq!(snapshot.variant, None);
        assert_eq!(snapshot.view, "{}");
        assert!(!snapshot.can_generate());
    }

    #[tokio::test]
    async fn set_without_variant_rejected() {
        let store = store();
        let err = store.set_str("seed", json!(1)).unwrap_err();
        assert_eq!(err, StoreError::NoActiveVariant);
        assert_eq!(
            store.set_str("", json!(1)).unwrap_err(),
            StoreError::Path(foundry_config::PathError::Empty)
        );
    }

    #[tokio::test]
    async fn set_rejects_undeclared_path() {
        let store = store();
        store.switch_variant(Variant::WeaponItem).await.unwrap();
        let err = store.set_str("identity.age", json!("young")).unwrap_err();
        assert!(matches!(err, StoreError::UndeclaredField { variant: Variant::WeaponItem, .. }));
    }

    #[tokio::test]
    async fn set_clears_result_and_regenerates_view() {
        let store = store();
        store.switch_variant(Variant::WeaponItem).await.unwrap();
        let settled = store.flush().await.unwrap();
        assert_eq!(settled.state, ValidationState::Valid);

        store.set_str("form.ornamentation", json!(0.9)).unwrap();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.state, ValidationState::Editing);
        assert!(snapshot.result.is_none());
        assert!(snapshot.view.contains("0.9"));
    }

    #[tokio::test]
    async fn stale_completion_ignored() {
        let store = store();
        store.switch_variant(Variant::NpcPortrait).await.unwrap();
        let old = store.set_str("seed", json!(5)).unwrap();
        store.set_str("seed", json!(6)).unwrap();
        assert!(!store.complete_validation(old, Ok(ValidationResult::valid())));
        assert_eq!(store.state(), ValidationState::Editing);
    }

    #[test]
    fn normalized_must_match_variant() {
        let config = Config::from_value(json!({"assetType": "weapon_item"})).unwrap();
        assert!(normalized_matches(&config, Some(Variant::WeaponItem)));
        assert!(!normalized_matches(&config, Some(Variant::NpcPortrait)));
        assert!(!normalized_matches(&config, None));
    }
}
