//! Data-access and utility factories.
//!
//! Both are external collaborators: the resolver only calls them and
//! interprets success or failure. [`DataAccessRegistry`] and
//! [`UtilityRegistry`] are small in-memory implementations that cache one
//! instance per name.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::config::Config;
use crate::value::AnyArc;
use crate::{DiError, DiResult};

/// Resolves and caches data-access objects by type name.
pub trait DataAccessFactory: Send + Sync {
    /// Returns the data-access object registered as `type_name`.
    fn get(&self, type_name: &str) -> DiResult<AnyArc>;
}

/// Failures reported by a [`UtilityFactory`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UtilityError {
    /// The factory has no idea how to build this capability
    #[error("Unknown utility capability: {0}")]
    UnknownCapability(String),
    /// The capability is known but building it failed
    #[error("Utility {capability} failed: {message}")]
    Construction {
        /// Requested capability
        capability: String,
        /// Builder-provided reason
        message: String,
    },
}

/// Resolves miscellaneous helpers by capability name.
pub trait UtilityFactory: Send + Sync {
    /// Returns the helper for `capability`.
    fn get(&self, capability: &str) -> Result<AnyArc, UtilityError>;
}

type DataAccessBuilder = Arc<dyn Fn() -> DiResult<AnyArc> + Send + Sync>;

/// In-memory [`DataAccessFactory`].
///
/// # Examples
///
/// ```rust
/// use ferrous_services::{DataAccessFactory, DataAccessRegistry};
/// use std::sync::Arc;
///
/// struct WidgetDao { table: &'static str }
///
/// let mut daos = DataAccessRegistry::new();
/// daos.register("app::WidgetDAO", || WidgetDao { table: "widgets" });
///
/// let first = daos.get("app::WidgetDAO").unwrap();
/// let second = daos.get("app::WidgetDAO").unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(first.downcast_ref::<WidgetDao>().unwrap().table, "widgets");
/// ```
#[derive(Default)]
pub struct DataAccessRegistry {
    builders: HashMap<String, DataAccessBuilder>,
    instances: Mutex<HashMap<String, AnyArc>>,
}

impl DataAccessRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a builder for `type_name`, replacing any previous one.
    pub fn register<T, F>(&mut self, type_name: impl Into<String>, builder: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.builders.insert(
            type_name.into(),
            Arc::new(move || Ok(Arc::new(builder()) as AnyArc)),
        );
        self
    }

    /// Registers a ready-made instance for `type_name`.
    pub fn register_instance<T>(&mut self, type_name: impl Into<String>, instance: Arc<T>) -> &mut Self
    where
        T: Any + Send + Sync,
    {
        let instance: AnyArc = instance;
        self.builders
            .insert(type_name.into(), Arc::new(move || Ok(Arc::clone(&instance))));
        self
    }

    /// True if a builder exists for `type_name`.
    pub fn contains(&self, type_name: &str) -> bool {
        self.builders.contains_key(type_name)
    }
}

impl DataAccessFactory for DataAccessRegistry {
    fn get(&self, type_name: &str) -> DiResult<AnyArc> {
        if let Some(hit) = self.instances.lock().get(type_name) {
            return Ok(Arc::clone(hit));
        }
        let builder = self.builders.get(type_name).ok_or_else(|| DiError::DataAccess {
            type_name: type_name.to_string(),
            message: "no data-access builder registered".to_string(),
        })?;
        let built = builder()?;
        let mut instances = self.instances.lock();
        Ok(Arc::clone(
            instances.entry(type_name.to_string()).or_insert(built),
        ))
    }
}

impl fmt::Debug for DataAccessRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.builders.keys().collect();
        names.sort();
        f.debug_struct("DataAccessRegistry")
            .field("types", &names)
            .field("cached", &self.instances.lock().len())
            .finish()
    }
}

type UtilityBuilder = Arc<dyn Fn(&Config) -> Result<AnyArc, UtilityError> + Send + Sync>;

/// In-memory [`UtilityFactory`].
///
/// Builders receive the utility configuration section (empty when the
/// resolver has no configuration).
#[derive(Default)]
pub struct UtilityRegistry {
    config: Config,
    builders: HashMap<String, UtilityBuilder>,
    instances: Mutex<HashMap<String, AnyArc>>,
}

impl UtilityRegistry {
    /// Creates an empty registry with empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration handed to builders.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Registers an infallible builder for `capability`.
    pub fn register<T, F>(&mut self, capability: impl Into<String>, builder: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&Config) -> T + Send + Sync + 'static,
    {
        self.builders.insert(
            capability.into(),
            Arc::new(move |config: &Config| Ok(Arc::new(builder(config)) as AnyArc)),
        );
        self
    }

    /// Registers a fallible builder for `capability`.
    ///
    /// An `Err(message)` surfaces as [`UtilityError::Construction`].
    pub fn register_fallible<T, F>(&mut self, capability: impl Into<String>, builder: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&Config) -> Result<T, String> + Send + Sync + 'static,
    {
        let capability = capability.into();
        let name = capability.clone();
        self.builders.insert(
            capability,
            Arc::new(move |config: &Config| {
                builder(config)
                    .map(|util| Arc::new(util) as AnyArc)
                    .map_err(|message| UtilityError::Construction {
                        capability: name.clone(),
                        message,
                    })
            }),
        );
        self
    }

    /// Configuration handed to builders.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn has_config(&self) -> bool {
        !self.config.is_empty()
    }
}

impl UtilityFactory for UtilityRegistry {
    fn get(&self, capability: &str) -> Result<AnyArc, UtilityError> {
        if let Some(hit) = self.instances.lock().get(capability) {
            return Ok(Arc::clone(hit));
        }
        let builder = self
            .builders
            .get(capability)
            .ok_or_else(|| UtilityError::UnknownCapability(capability.to_string()))?;
        let built = builder(&self.config)?;
        let mut instances = self.instances.lock();
        Ok(Arc::clone(
            instances.entry(capability.to_string()).or_insert(built),
        ))
    }
}

impl fmt::Debug for UtilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.builders.keys().collect();
        names.sort();
        f.debug_struct("UtilityRegistry")
            .field("capabilities", &names)
            .field("config", &self.config)
            .finish()
    }
}
