//! The service resolver.
//!
//! [`ServiceFactory`] constructs services on demand from their registered
//! constructor descriptors, caches one instance per type, and supplies every
//! constructor parameter according to a fixed precedence of rules (see
//! [`classify`](crate::classify)).

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};

use crate::auth::Principal;
use crate::config::Config;
use crate::descriptors::{ParamDescriptor, ServiceDescriptor};
use crate::factories::{DataAccessFactory, UtilityError, UtilityFactory};
use crate::internal::ResolutionChain;
use crate::key::{TypeKind, SERVICE_CONFIG_SECTION};
use crate::naming::NamingConvention;
use crate::observer::Observers;
use crate::registration::TypeRegistry;
use crate::requirement::{classify, ClassifyContext, Requirement};
use crate::validation::ValidationReport;
use crate::value::{AnyArc, Args, Value};
use crate::{DiError, DiResult};

mod builder;

pub use builder::ServiceFactoryBuilder;

/// Service resolver.
///
/// Cheap to clone: clones share the same instance cache, configuration and
/// principal. The cache lock is only held for lookups and inserts, never while
/// a constructor runs, so constructors may resolve further services through a
/// resolver handle they were given.
///
/// # Examples
///
/// ```
/// use ferrous_services::{
///     DataAccessRegistry, ParamDescriptor, ServiceDescriptor, ServiceFactory, TypeRegistry,
/// };
/// use std::sync::Arc;
///
/// struct WidgetDao;
/// struct WidgetService { dao: Arc<WidgetDao> }
///
/// let mut registry = TypeRegistry::new();
/// registry.declare_data_access("WidgetDAO").register(
///     ServiceDescriptor::new("WidgetService", |args| {
///         Ok(WidgetService { dao: args.get::<WidgetDao>(0)? })
///     })
///     .param(ParamDescriptor::new("dao")),
/// );
///
/// let mut daos = DataAccessRegistry::new();
/// daos.register("WidgetDAO", || WidgetDao);
///
/// let factory = ServiceFactory::builder(registry).data_access(daos).build();
/// let first = factory.get_as::<WidgetService>("WidgetService").unwrap();
/// let second = factory.get_as::<WidgetService>("WidgetService").unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// assert!(Arc::ptr_eq(&first.dao, &second.dao));
/// ```
#[derive(Clone)]
pub struct ServiceFactory {
    inner: Arc<FactoryInner>,
}

pub(crate) struct FactoryInner {
    registry: TypeRegistry,
    data_access: Arc<dyn DataAccessFactory>,
    utilities: Option<Arc<dyn UtilityFactory>>,
    config: Option<Config>,
    naming: NamingConvention,
    user: RwLock<Option<Principal>>,
    services: Mutex<HashMap<String, AnyArc>>,
    observers: Observers,
}

impl ServiceFactory {
    /// Starts building a resolver over `registry`.
    pub fn builder(registry: TypeRegistry) -> ServiceFactoryBuilder {
        ServiceFactoryBuilder::new(registry)
    }

    /// Resolver with a data-access factory, optional configuration and
    /// optional principal. The utility factory is a [`UtilityRegistry`]
    /// seeded with the `utility` configuration section.
    ///
    /// [`UtilityRegistry`]: crate::UtilityRegistry
    pub fn new(
        registry: TypeRegistry,
        data_access: Arc<dyn DataAccessFactory>,
        config: Option<Config>,
        user: Option<Principal>,
    ) -> Self {
        let mut builder = Self::builder(registry).data_access_factory(data_access);
        if let Some(config) = config {
            builder = builder.config(config);
        }
        if let Some(user) = user {
            builder = builder.user(user);
        }
        builder.build()
    }

    #[inline]
    fn inner(&self) -> &FactoryInner {
        &self.inner
    }

    /// Returns the service registered as `type_name`, constructing and caching
    /// it on first request.
    pub fn get(&self, type_name: &str) -> DiResult<AnyArc> {
        let mut chain = ResolutionChain::rooted(type_name);
        self.resolve(type_name, &mut chain)
    }

    /// Like [`get`](Self::get), downcast to `T`.
    pub fn get_as<T: Any + Send + Sync>(&self, type_name: &str) -> DiResult<Arc<T>> {
        self.get(type_name)?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch {
                name: type_name.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Replaces the current principal.
    ///
    /// Already cached services are not touched; only services constructed
    /// afterwards see the new principal.
    pub fn set_user(&self, user: Principal) {
        tracing::debug!(user = user.id(), "principal replaced");
        *self.inner().user.write() = Some(user);
    }

    /// Removes the current principal.
    pub fn clear_user(&self) {
        *self.inner().user.write() = None;
    }

    /// Current principal.
    pub fn user(&self) -> Option<Principal> {
        self.inner().user.read().clone()
    }

    /// Resolves a helper through the utility factory.
    pub fn get_util(&self, capability: &str) -> DiResult<AnyArc> {
        let utilities = self
            .inner()
            .utilities
            .as_ref()
            .ok_or(DiError::UninitializedUtilityFactory)?;
        Ok(utilities.get(capability)?)
    }

    /// Full configuration, if any.
    pub fn config(&self) -> Option<&Config> {
        self.inner().config.as_ref()
    }

    /// The type registry this resolver reads from.
    pub fn registry(&self) -> &TypeRegistry {
        &self.inner().registry
    }

    /// Naming convention in effect.
    pub fn naming(&self) -> &NamingConvention {
        &self.inner().naming
    }

    /// True if `type_name` has been constructed and cached.
    pub fn is_cached(&self, type_name: &str) -> bool {
        self.inner().services.lock().contains_key(type_name)
    }

    /// Names of all cached services, sorted.
    pub fn cached_types(&self) -> Vec<String> {
        let mut names: Vec<_> = self.inner().services.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Static checks over the registry using this resolver's naming convention.
    pub fn validate(&self) -> ValidationReport {
        self.registry().validate(self.naming())
    }

    /// Derives the data-access type name for `service_type_name` and resolves
    /// it through the data-access factory. The derived name must be declared as
    /// a concrete data-access type, otherwise this is [`DiError::UnknownType`].
    pub fn service_data_access(&self, service_type_name: &str) -> DiResult<AnyArc> {
        let name = self.inner().naming.derive_data_access_name(service_type_name);
        if self.inner().registry.kind(&name) != Some(TypeKind::DataAccess { instantiable: true }) {
            return Err(DiError::UnknownType(name));
        }
        self.inner().data_access.get(&name)
    }

    fn cached(&self, type_name: &str) -> Option<AnyArc> {
        self.inner().services.lock().get(type_name).cloned()
    }

    fn resolve(&self, type_name: &str, chain: &mut ResolutionChain) -> DiResult<AnyArc> {
        if let Some(hit) = self.cached(type_name) {
            tracing::trace!(service = type_name, "cache hit");
            return Ok(hit);
        }
        let descriptor = self
            .inner()
            .registry
            .service(type_name)
            .cloned()
            .ok_or_else(|| DiError::UnknownType(type_name.to_string()))?;

        let observed = self.inner().observers.has_observers();
        let start = observed.then(Instant::now);
        if observed {
            self.inner().observers.resolving(type_name);
        }

        match self.construct(&descriptor, chain) {
            Ok(instance) => {
                if let Some(start) = start {
                    self.inner().observers.resolved(type_name, start.elapsed());
                }
                Ok(instance)
            }
            Err(error) => {
                tracing::debug!(service = type_name, %error, "resolution failed");
                if observed {
                    self.inner().observers.failed(type_name, &error);
                }
                Err(error)
            }
        }
    }

    fn construct(&self, descriptor: &ServiceDescriptor, chain: &mut ResolutionChain) -> DiResult<AnyArc> {
        let user = self.user();
        let ctx = ClassifyContext {
            user_present: user.is_some(),
            utilities_present: self.inner().utilities.is_some(),
        };

        let mut names = Vec::with_capacity(descriptor.params().len());
        let mut values = Vec::with_capacity(descriptor.params().len());
        for param in descriptor.params() {
            let requirement = classify(param, &self.inner().registry, ctx);
            tracing::trace!(
                service = descriptor.name(),
                parameter = param.name(),
                ?requirement,
                "parameter classified"
            );
            values.push(self.resolve_param(descriptor.name(), param, requirement, user.as_ref(), chain)?);
            names.push(param.name().to_string());
        }

        let instance = descriptor.construct(&Args::new(descriptor.name(), names, values))?;
        if let Some(user) = &user {
            if descriptor.inject_user(&instance, user) {
                tracing::debug!(service = descriptor.name(), user = user.id(), "user injected");
            }
        }

        let mut services = self.inner().services.lock();
        let stored = services
            .entry(descriptor.name().to_string())
            .or_insert(instance);
        tracing::debug!(service = descriptor.name(), "service constructed");
        Ok(Arc::clone(stored))
    }

    fn resolve_param(
        &self,
        owner: &str,
        param: &ParamDescriptor,
        requirement: Requirement,
        user: Option<&Principal>,
        chain: &mut ResolutionChain,
    ) -> DiResult<Value> {
        let resolved = match requirement {
            Requirement::Configuration => match &self.inner().config {
                Some(config) => Some(Value::Config(config.shared_section(SERVICE_CONFIG_SECTION))),
                None if param.is_optional() => None,
                None => {
                    return Err(DiError::MissingConfiguration {
                        parameter: param.name().to_string(),
                    })
                }
            },
            Requirement::SelfReference => Some(Value::Resolver(self.clone())),
            Requirement::AbstractDataAccess => Some(Value::Instance(self.service_data_access(owner)?)),
            Requirement::ConcreteDataAccess(name) => {
                Some(Value::Instance(self.inner().data_access.get(&name)?))
            }
            Requirement::ServiceDependency(name) => {
                if let Err(error) = chain.enter(&name) {
                    if let DiError::Circular(path) = &error {
                        tracing::warn!(path = %path.join(" -> "), "cyclic service dependency");
                    }
                    return Err(error);
                }
                let result = self.resolve(&name, chain);
                chain.leave();
                Some(Value::Instance(result?))
            }
            Requirement::UserPrincipal => user.map(|user| Value::User(Arc::clone(user))),
            Requirement::UtilityCapability(capability) => match self.get_util(&capability) {
                Ok(util) => Some(Value::Instance(util)),
                Err(DiError::Utility(source @ UtilityError::UnknownCapability(_))) => {
                    return Err(DiError::InvalidProperty {
                        parameter: param.name().to_string(),
                        source: Some(source),
                    })
                }
                Err(error) => return Err(error),
            },
            Requirement::Unresolvable => None,
        };

        match resolved {
            Some(value) => Ok(value),
            None => param.default_value().cloned().ok_or_else(|| DiError::InvalidProperty {
                parameter: param.name().to_string(),
                source: None,
            }),
        }
    }
}

impl fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceFactory")
            .field("registered", &self.inner().registry.len())
            .field("cached", &self.cached_types())
            .field("user", &self.user().map(|u| u.id().to_string()))
            .field("has_config", &self.inner().config.is_some())
            .field("has_utilities", &self.inner().utilities.is_some())
            .field("observers", &self.inner().observers.len())
            .finish()
    }
}
