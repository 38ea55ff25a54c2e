//! Ordered registry of the package managers yoink knows how to drive.
//!
//! Detection walks the registry in registration order and picks the first
//! backend that is installed and answers a probe. The default order is
//! apt, dnf, pacman.

use crate::error::{Result, YoinkError};
use crate::packages::PackageManager;
use crate::packages::{apt::AptManager, dnf::DnfManager, pacman::PacmanManager};
use crate::ui;

/// Factory function for creating package manager instances
pub type BackendFactory = Box<dyn Fn() -> Box<dyn PackageManager> + Send + Sync>;

pub struct BackendRegistry {
    factories: Vec<(String, BackendFactory)>,
}

impl BackendRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Register a backend. Re-registering a name replaces the factory in place.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn PackageManager> + Send + Sync + 'static,
    {
        if let Some(slot) = self.factories.iter_mut().find(|(n, _)| n == name) {
            slot.1 = Box::new(factory);
        } else {
            self.factories.push((name.to_string(), Box::new(factory)));
        }
    }

    pub fn register_defaults(&mut self) {
        self.register("apt", || Box::new(AptManager::new()));
        self.register("dnf", || Box::new(DnfManager::new()));
        self.register("pacman", || Box::new(PacmanManager::new()));
    }

    /// Registered names, in detection order
    pub fn names(&self) -> Vec<String> {
        self.factories.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn has_backend(&self, name: &str) -> bool {
        self.factories.iter().any(|(n, _)| n == name)
    }

    pub fn create_manager(&self, name: &str) -> Option<Box<dyn PackageManager>> {
        self.factories
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, factory)| factory())
    }

    /// Keep only `allowed`, in the order given. Unknown names are an error.
    pub fn restrict_to(&mut self, allowed: &[String]) -> Result<()> {
        if allowed.is_empty() {
            return Ok(());
        }

        if let Some(unknown) = allowed.iter().find(|name| !self.has_backend(name)) {
            return Err(YoinkError::ConfigError(format!(
                "Unknown backend '{}' (supported: {})",
                unknown,
                self.names().join(", ")
            )));
        }

        let mut remaining = std::mem::take(&mut self.factories);
        for name in allowed {
            if let Some(pos) = remaining.iter().position(|(n, _)| n == name) {
                self.factories.push(remaining.remove(pos));
            }
        }
        Ok(())
    }

    /// First available backend in registration order
    pub fn get_active(&self) -> Option<Box<dyn PackageManager>> {
        for (name, factory) in &self.factories {
            let manager = factory();
            if manager.is_available() {
                ui::verbose(&format!("Using backend: {}", name));
                return Some(manager);
            }
            ui::verbose(&format!("Backend '{}' not available", name));
        }
        None
    }

    /// Like [`get_active`](Self::get_active), but reports what was tried
    pub fn detect(&self) -> Result<Box<dyn PackageManager>> {
        self.get_active()
            .ok_or_else(|| YoinkError::NoBackendAvailable { tried: self.names() })
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }
}
