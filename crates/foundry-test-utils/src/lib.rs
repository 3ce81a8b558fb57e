//! Testing utilities for Asset Foundry
//!
//! Scripted collaborators that count, hold back or fail calls, plus config
//! fixtures.

#![allow(missing_docs)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Semaphore;

use foundry_config::{Config, FieldPath};
use foundry_core::{
    ConfigStore, ConfigStoreBuilder, DefaultsProvider, DefaultsResponse, GenerationService,
    ResultDescriptor, SchemaDefaults, ServiceError, StoreSettings,
};
use foundry_schema::{
    schema, SchemaValidator, ValidationIssue, ValidationResult, ValidationServiceError, Validator,
    Variant,
};

/// Seed used by every fixture
pub const FIXTURE_SEED: u64 = 42;

/// Stock config of `variant` with [`FIXTURE_SEED`]
pub fn defaults(variant: Variant) -> Config {
    schema(variant).default_config(FIXTURE_SEED)
}

/// Parse a dotted path, panicking on malformed input
pub fn path(s: &str) -> FieldPath {
    s.parse().unwrap()
}

/// `config` with `value` written at the dotted `at`
pub fn with(config: &Config, at: &str, value: Value) -> Config {
    config.with(&path(at), value)
}

/// Settings with the given debounce window
pub fn settings(debounce_ms: u64) -> StoreSettings {
    StoreSettings::new().with_debounce_ms(debounce_ms)
}

/// Builder with the given validator and generator
pub fn store_builder(
    validator: Arc<dyn Validator>,
    generator: Arc<dyn GenerationService>,
) -> ConfigStoreBuilder {
    ConfigStore::builder(generator).with_validator(validator)
}

/// Store over the local schema with a recording generator
pub fn schema_store(generator: Arc<RecordingGenerator>) -> ConfigStore {
    ConfigStore::builder(generator).build().unwrap()
}

/// Calls released by a test, one permit per call
#[derive(Debug, Clone)]
pub struct Gate {
    permits: Arc<Semaphore>,
}

impl Gate {
    /// Gate that holds every call
    pub fn closed() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(0)),
        }
    }

    /// Let `n` more calls through
    pub fn release(&self, n: usize) {
        self.permits.add_permits(n);
    }

    async fn pass(&self) -> bool {
        match self.permits.acquire().await {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(_) => false,
        }
    }
}

/// Validator that delegates to [`SchemaValidator`] and records every call
#[derive(Debug, Default)]
pub struct CountingValidator {
    seen: Mutex<Vec<Config>>,
    gate: Option<Gate>,
}

impl CountingValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold each call until `gate` releases it
    pub fn gated(gate: Gate) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            gate: Some(gate),
        }
    }

    /// Number of validation requests received
    pub fn calls(&self) -> usize {
        self.seen.lock().len()
    }

    /// Configs in the order they were received
    pub fn seen(&self) -> Vec<Config> {
        self.seen.lock().clone()
    }
}

#[async_trait::async_trait]
impl Validator for CountingValidator {
    async fn validate(&self, config: &Config) -> Result<ValidationResult, ValidationServiceError> {
        self.seen.lock().push(config.clone());
        if let Some(gate) = &self.gate {
            if !gate.pass().await {
                return Err(ValidationServiceError::Unavailable("gate closed".into()));
            }
        }
        Ok(SchemaValidator::new().check(config))
    }
}

/// Validator that fails a fixed number of times, then delegates
#[derive(Debug)]
pub struct FlakyValidator {
    failures_left: AtomicUsize,
    calls: AtomicUsize,
}

impl FlakyValidator {
    /// Fail the first `failures` calls
    pub fn failing(failures: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail the next `failures` calls from now on
    pub fn fail_next(&self, failures: usize) {
        self.failures_left.store(failures, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Validator for FlakyValidator {
    async fn validate(&self, config: &Config) -> Result<ValidationResult, ValidationServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ValidationServiceError::Unavailable(
                "validation service unreachable".into(),
            ));
        }
        Ok(SchemaValidator::new().check(config))
    }
}

/// Validator that answers every call with the same result
#[derive(Debug)]
pub struct ScriptedValidator {
    answer: ValidationResult,
    calls: AtomicUsize,
}

impl ScriptedValidator {
    pub fn answering(answer: ValidationResult) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Validator for ScriptedValidator {
    async fn validate(&self, _config: &Config) -> Result<ValidationResult, ValidationServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

/// Generator that records requests and answers with an in-memory locator
#[derive(Debug, Default)]
pub struct RecordingGenerator {
    requests: Mutex<Vec<Config>>,
    gate: Option<Gate>,
    failure: Option<String>,
}

impl RecordingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold each call until `gate` releases it
    pub fn gated(gate: Gate) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    /// Fail every call with `reason`
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    /// Number of generation requests received
    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    /// Configs in the order they were received
    pub fn requests(&self) -> Vec<Config> {
        self.requests.lock().clone()
    }
}

#[async_trait::async_trait]
impl GenerationService for RecordingGenerator {
    async fn request_generation(&self, config: &Config) -> Result<ResultDescriptor, ServiceError> {
        let n = {
            let mut requests = self.requests.lock();
            requests.push(config.clone());
            requests.len()
        };
        if let Some(gate) = &self.gate {
            if !gate.pass().await {
                return Err(ServiceError::Generation("gate closed".into()));
            }
        }
        if let Some(reason) = &self.failure {
            return Err(ServiceError::Generation(reason.clone()));
        }
        Ok(ResultDescriptor::new(format!("mem://asset/{n}"), 1024, 1024).with_byte_size(4096))
    }
}

/// Defaults provider with a fixed table and optional hold-back
#[derive(Debug, Default)]
pub struct StaticDefaults {
    table: HashMap<Variant, Config>,
    notes: Vec<ValidationIssue>,
    gate: Option<Gate>,
    calls: AtomicUsize,
}

impl StaticDefaults {
    /// Every variant, from the local schema with [`FIXTURE_SEED`]
    pub fn all() -> Self {
        let defaults = SchemaDefaults::new();
        Self {
            table: Variant::ALL
                .into_iter()
                .map(|variant| (variant, defaults.defaults_for(variant)))
                .collect(),
            ..Self::default()
        }
    }

    /// Only the listed variants; others answer `NotFound`
    pub fn only(variants: &[Variant]) -> Self {
        let mut provider = Self::all();
        provider.table.retain(|variant, _| variants.contains(variant));
        provider
    }

    /// Attach `note` to every response
    pub fn with_note(mut self, note: ValidationIssue) -> Self {
        self.notes.push(note);
        self
    }

    /// Hold each call until `gate` releases it
    pub fn with_gate(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DefaultsProvider for StaticDefaults {
    async fn request_defaults(&self, variant: Variant) -> Result<DefaultsResponse, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            if !gate.pass().await {
                return Err(ServiceError::NotFound("gate closed".into()));
            }
        }
        let config = self
            .table
            .get(&variant)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(variant.to_string()))?;
        Ok(DefaultsResponse {
            config,
            warnings: self.notes.clone(),
        })
    }
}
