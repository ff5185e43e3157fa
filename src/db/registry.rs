//! Registry mapping backend identifiers to connector factories.

use super::{connector_for, Backend, Connector};
use crate::error::{ProxyError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Produces a fresh, unconnected connector for each request.
pub type ConnectorFactory = Arc<dyn Fn() -> Box<dyn Connector> + Send + Sync>;

/// Immutable after startup; shared read-only between requests.
#[derive(Clone, Default)]
pub struct DriverRegistry {
    factories: HashMap<String, ConnectorFactory>,
}

impl DriverRegistry {
    /// Creates a registry with no backends.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in backend.
    pub fn standard() -> Self {
        Backend::ALL
            .into_iter()
            .fold(Self::empty(), |registry, backend| {
                registry.with_factory(backend.as_str(), move || connector_for(backend))
            })
    }

    /// Registers (or replaces) the factory for `id`.
    pub fn with_factory<F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Connector> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Arc::new(factory));
        self
    }

    /// Creates a new connector for `id`.
    pub fn create(&self, id: &str) -> Result<Box<dyn Connector>> {
        self.factories
            .get(id)
            .map(|factory| factory())
            .ok_or_else(|| ProxyError::unsupported_backend(id))
    }

    /// Registered identifiers, sorted.
    pub fn backends(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("backends", &self.backends())
            .finish()
    }
}
