//! Module sources
//!
//! [`ModuleSource`] implementations handed to scanning:
//!
//! - [`StaticModule`] - components listed explicitly in code
//! - [`LinkedModule`] - components contributed through the `COMPONENTS`
//!   distributed slice, filtered by module name

use std::sync::Arc;

use cqx_application::ports::registry::{components_in, list_modules};
use cqx_domain::error::{Error, Result};
use cqx_domain::ports::ModuleSource;
use cqx_domain::value_objects::Component;
use tracing::{debug, warn};

/// Module whose components are supplied in code
#[derive(Debug, Clone)]
pub struct StaticModule {
    name: String,
    components: Vec<Arc<Component>>,
}

impl StaticModule {
    /// Empty module
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }

    /// Append a component
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(Arc::new(component));
        self
    }

    /// Type-erase into a shareable module handle
    pub fn into_source(self) -> Arc<dyn ModuleSource> {
        Arc::new(self)
    }
}

impl ModuleSource for StaticModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_types(&self) -> Result<Vec<Arc<Component>>> {
        Ok(self.components.clone())
    }
}

/// Module backed by link-time component registration
#[derive(Debug, Clone)]
pub struct LinkedModule {
    name: String,
}

impl LinkedModule {
    /// Module collecting every entry registered under `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// One module per distinct module name found in the slice
    pub fn all() -> Vec<Arc<dyn ModuleSource>> {
        list_modules()
            .into_iter()
            .map(|name| Arc::new(Self::new(name)) as Arc<dyn ModuleSource>)
            .collect()
    }
}

impl ModuleSource for LinkedModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_types(&self) -> Result<Vec<Arc<Component>>> {
        let mut components = Vec::new();
        for entry in components_in(&self.name) {
            match (entry.describe)() {
                Ok(component) => components.push(Arc::new(component)),
                Err(error) => {
                    warn!(module = %self.name, component = entry.name, %error, "Component description failed");
                    return Err(Error::module_introspection(
                        &self.name,
                        format!("{}: {error}", entry.name),
                    ));
                }
            }
        }
        debug!(module = %self.name, components = components.len(), "Listed linked module");
        Ok(components)
    }
}
