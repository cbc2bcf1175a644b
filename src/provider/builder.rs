//! Builder for [`ServiceFactory`].

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::{FactoryInner, ServiceFactory};
use crate::auth::Principal;
use crate::config::Config;
use crate::factories::{DataAccessFactory, DataAccessRegistry, UtilityFactory, UtilityRegistry};
use crate::key::UTILITY_CONFIG_SECTION;
use crate::naming::NamingConvention;
use crate::observer::{Observers, ResolutionObserver};
use crate::registration::TypeRegistry;

enum UtilitySetup {
    Registry(UtilityRegistry),
    Custom(Arc<dyn UtilityFactory>),
    Disabled,
}

/// Assembles a [`ServiceFactory`].
///
/// Defaults: an empty [`DataAccessRegistry`], no configuration, no principal,
/// and a [`UtilityRegistry`] seeded with the `utility` configuration section.
///
/// # Examples
///
/// ```
/// use ferrous_services::{Config, ServiceFactory, TypeRegistry};
/// use serde_json::json;
///
/// let config = Config::from_value(json!({
///     "utility": { "greeting": "hello" }
/// })).unwrap();
///
/// let factory = ServiceFactory::builder(TypeRegistry::new())
///     .config(config)
///     .utility("app::Greeter", |cfg: &Config| cfg.value("greeting").unwrap_or_default())
///     .build();
///
/// let greeter = factory.get_util("app::Greeter").unwrap().downcast::<String>().unwrap();
/// assert_eq!(*greeter, "hello");
/// ```
pub struct ServiceFactoryBuilder {
    registry: TypeRegistry,
    data_access: Option<Arc<dyn DataAccessFactory>>,
    config: Option<Config>,
    naming: Option<NamingConvention>,
    user: Option<Principal>,
    utilities: UtilitySetup,
    observers: Observers,
}

impl ServiceFactoryBuilder {
    pub(crate) fn new(registry: TypeRegistry) -> Self {
        Self {
            registry,
            data_access: None,
            config: None,
            naming: None,
            user: None,
            utilities: UtilitySetup::Registry(UtilityRegistry::new()),
            observers: Observers::default(),
        }
    }

    /// Uses `factory` for data-access objects.
    pub fn data_access(self, factory: impl DataAccessFactory + 'static) -> Self {
        self.data_access_factory(Arc::new(factory))
    }

    /// Uses a shared data-access factory.
    pub fn data_access_factory(mut self, factory: Arc<dyn DataAccessFactory>) -> Self {
        self.data_access = Some(factory);
        self
    }

    /// Application configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the naming convention otherwise read from configuration.
    pub fn naming(mut self, naming: NamingConvention) -> Self {
        self.naming = Some(naming);
        self
    }

    /// Initial principal.
    pub fn user(mut self, user: Principal) -> Self {
        self.user = Some(user);
        self
    }

    /// Registers a utility builder on the default utility registry.
    ///
    /// Ignored when a custom utility factory was installed or utilities were
    /// disabled.
    pub fn utility<T, F>(mut self, capability: impl Into<String>, builder: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Config) -> T + Send + Sync + 'static,
    {
        match &mut self.utilities {
            UtilitySetup::Registry(registry) => {
                registry.register(capability, builder);
            }
            UtilitySetup::Custom(_) | UtilitySetup::Disabled => {
                let capability: String = capability.into();
                tracing::warn!(
                    capability = %capability,
                    "utility builder ignored: default utility registry not in use"
                );
            }
        }
        self
    }

    /// Replaces the default utility registry.
    pub fn utilities(mut self, registry: UtilityRegistry) -> Self {
        self.utilities = UtilitySetup::Registry(registry);
        self
    }

    /// Uses a custom utility factory.
    pub fn utility_factory(mut self, factory: Arc<dyn UtilityFactory>) -> Self {
        self.utilities = UtilitySetup::Custom(factory);
        self
    }

    /// Builds without any utility factory; utility lookups then fail with
    /// [`DiError::UninitializedUtilityFactory`](crate::DiError::UninitializedUtilityFactory).
    pub fn without_utilities(mut self) -> Self {
        self.utilities = UtilitySetup::Disabled;
        self
    }

    /// Adds a resolution observer.
    pub fn observer(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    /// Finishes the resolver.
    pub fn build(self) -> ServiceFactory {
        let naming = self
            .naming
            .unwrap_or_else(|| NamingConvention::from_config(self.config.as_ref()));

        let utilities: Option<Arc<dyn UtilityFactory>> = match self.utilities {
            UtilitySetup::Registry(registry) => {
                let registry = match &self.config {
                    Some(config) if !registry.has_config() => registry
                        .with_config(config.section(UTILITY_CONFIG_SECTION).unwrap_or_default()),
                    _ => registry,
                };
                Some(Arc::new(registry) as Arc<dyn UtilityFactory>)
            }
            UtilitySetup::Custom(factory) => Some(factory),
            UtilitySetup::Disabled => None,
        };

        let data_access = self
            .data_access
            .unwrap_or_else(|| Arc::new(DataAccessRegistry::new()) as Arc<dyn DataAccessFactory>);

        tracing::debug!(
            registered = self.registry.len(),
            has_config = self.config.is_some(),
            has_user = self.user.is_some(),
            has_utilities = utilities.is_some(),
            "service factory built"
        );

        ServiceFactory {
            inner: Arc::new(FactoryInner {
                registry: self.registry,
                data_access,
                utilities,
                config: self.config,
                naming,
                user: RwLock::new(self.user),
                services: Mutex::new(HashMap::new()),
                observers: self.observers,
            }),
        }
    }
}
