//! Composition Root
//!
//! Threads [`AppConfig`] through start-up: scan modules, apply decoration
//! steps, then freeze everything into a [`ServiceProvider`].
//!
//! ```text
//! AppConfig → CompositionRoot ─ scan ──────→ ServiceCollection
//!                             ─ decorate ──→ (rewrites bindings)
//!                             ─ build ─────→ ServiceProvider
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut root = init_composition(ConfigLoader::new().load()?)?
//!     .with_module(LinkedModule::new("orders").into());
//! root.scan(&handlers, &table)?;
//! root.decorate_generic("validation", &handler_shape, &validation, &validatable)?;
//! let provider = root.build()?;
//! ```
//!
//! Steps run in call order and the first error aborts start-up. Named
//! decoration steps listed in `composition.disabled_decorators` are skipped.

use std::sync::Arc;

use cqx_application::use_cases::{
    DecorationComposer, Decorator, GenericDecorator, RegistrationDispatcher, RegistrationTable,
    ScanReport, ShapeFamily,
};
use cqx_domain::error::Result;
use cqx_domain::ports::ModuleSource;
use cqx_domain::value_objects::{ContractKey, ContractShape};
use tracing::info;

use super::collection::ServiceCollection;
use super::provider::ServiceProvider;
use crate::config::AppConfig;
use crate::logging::init_logging;

/// Start-up composition state
pub struct CompositionRoot {
    config: Arc<AppConfig>,
    services: ServiceCollection,
    modules: Vec<Arc<dyn ModuleSource>>,
}

impl CompositionRoot {
    /// Empty composition over `config`
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            services: ServiceCollection::new(),
            modules: Vec::new(),
        }
    }

    /// Add a module to scan
    pub fn with_module(mut self, module: Arc<dyn ModuleSource>) -> Self {
        self.modules.push(module);
        self
    }

    /// Add several modules to scan, keeping their order
    pub fn with_modules(mut self, modules: impl IntoIterator<Item = Arc<dyn ModuleSource>>) -> Self {
        self.modules.extend(modules);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Registered modules, in scan order
    pub fn modules(&self) -> &[Arc<dyn ModuleSource>] {
        &self.modules
    }

    /// Bindings collected so far
    pub fn services(&self) -> &ServiceCollection {
        &self.services
    }

    /// Direct access for manual registrations
    pub fn services_mut(&mut self) -> &mut ServiceCollection {
        &mut self.services
    }

    /// Scan every registered module for `family` and register what is found
    pub fn scan(&mut self, family: &ShapeFamily, table: &RegistrationTable) -> Result<ScanReport> {
        RegistrationDispatcher::new(&mut self.services).scan_and_register(
            family,
            &self.modules,
            table,
        )
    }

    /// Named fixed decoration step; returns 0 when the step is disabled
    pub fn decorate(&mut self, step: &str, key: &ContractKey, decorator: &Decorator) -> Result<usize> {
        if !self.config.composition.is_enabled(step) {
            info!(step, contract = %key, "Decoration step disabled");
            return Ok(0);
        }
        DecorationComposer::new(&mut self.services).decorate_fixed(key, decorator)
    }

    /// Named parameterized decoration step; returns no keys when the step is disabled
    pub fn decorate_generic(
        &mut self,
        step: &str,
        shape: &ContractShape,
        decorator: &GenericDecorator,
        tag: &ContractShape,
    ) -> Result<Vec<ContractKey>> {
        if !self.config.composition.is_enabled(step) {
            info!(step, shape = %shape, "Decoration step disabled");
            return Ok(Vec::new());
        }
        DecorationComposer::new(&mut self.services).decorate_parameterized(shape, decorator, tag)
    }

    /// Freeze the collected bindings
    ///
    /// With `composition.eager_singletons` set, every singleton is
    /// constructed here and the first constructor error is returned.
    pub fn build(self) -> Result<ServiceProvider> {
        let provider = self.services.build_provider();
        if self.config.composition.eager_singletons {
            provider.validate_singletons()?;
        }
        info!(bindings = provider.len(), "Composition complete");
        Ok(provider)
    }
}

impl std::fmt::Debug for CompositionRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositionRoot")
            .field("bindings", &self.services.iter().count())
            .field("modules", &self.modules.len())
            .finish_non_exhaustive()
    }
}

/// Initialize logging from `config` and open a composition root over it
pub fn init_composition(config: AppConfig) -> Result<CompositionRoot> {
    init_logging(&config.logging)?;
    info!("Starting composition");
    Ok(CompositionRoot::new(config))
}
