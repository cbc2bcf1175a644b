//! Resolution observers.
//!
//! Hooks fired around every service construction (cache hits are not
//! observed). Observer calls are made synchronously during resolution, so
//! keep implementations lightweight.

use std::sync::Arc;
use std::time::Duration;

use crate::DiError;

/// Observer trait for service resolution events.
///
/// # Examples
///
/// ```
/// use ferrous_services::{DiError, ResolutionObserver};
/// use parking_lot::Mutex;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     events: Mutex<Vec<String>>,
/// }
///
/// impl ResolutionObserver for Recorder {
///     fn resolving(&self, type_name: &str) {
///         self.events.lock().push(format!("start {}", type_name));
///     }
///
///     fn resolved(&self, type_name: &str, _duration: Duration) {
///         self.events.lock().push(format!("done {}", type_name));
///     }
///
///     fn failed(&self, type_name: &str, error: &DiError) {
///         self.events.lock().push(format!("fail {}: {}", type_name, error));
///     }
/// }
/// ```
pub trait ResolutionObserver: Send + Sync {
    /// Called before a service's parameters are resolved.
    fn resolving(&self, type_name: &str);

    /// Called after the service was constructed and cached.
    fn resolved(&self, type_name: &str, duration: Duration);

    /// Called when constructing the service failed.
    fn failed(&self, type_name: &str, error: &DiError) {
        let _ = (type_name, error);
    }
}

/// Built-in observer that forwards events to `tracing` at info level.
///
/// ```
/// use ferrous_services::{ServiceFactory, TracingObserver, TypeRegistry};
/// use std::sync::Arc;
///
/// let factory = ServiceFactory::builder(TypeRegistry::new())
///     .observer(Arc::new(TracingObserver::new()))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct TracingObserver {
    prefix: String,
}

impl TracingObserver {
    /// Creates a tracing observer with the default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "[ferrous-services]".to_string(),
        }
    }

    /// Creates a tracing observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionObserver for TracingObserver {
    fn resolving(&self, type_name: &str) {
        tracing::info!(service = type_name, "{} Resolving", self.prefix);
    }

    fn resolved(&self, type_name: &str, duration: Duration) {
        tracing::info!(service = type_name, ?duration, "{} Resolved", self.prefix);
    }

    fn failed(&self, type_name: &str, error: &DiError) {
        tracing::warn!(service = type_name, %error, "{} Resolution failed", self.prefix);
    }
}

/// Observers registered on a factory.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ResolutionObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn ResolutionObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, type_name: &str) {
        for observer in &self.observers {
            observer.resolving(type_name);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, type_name: &str, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(type_name, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, type_name: &str, error: &DiError) {
        for observer in &self.observers {
            observer.failed(type_name, error);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}
