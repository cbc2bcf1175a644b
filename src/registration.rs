//! Type registry: the explicit stand-in for runtime type introspection.

use std::collections::HashMap;
use std::sync::Arc;

use crate::descriptors::ServiceDescriptor;
use crate::key::{TypeKind, CONFIG_TYPE, DATA_ACCESS_TYPE, RESOLVER_TYPE, SERVICE_TYPE, USER_TYPE};
use crate::naming::NamingConvention;
use crate::validation::{self, ValidationReport};

#[derive(Debug, Clone)]
enum TypeEntry {
    Declared(TypeKind),
    Service(Arc<ServiceDescriptor>),
}

impl TypeEntry {
    fn kind(&self) -> TypeKind {
        match self {
            TypeEntry::Declared(kind) => *kind,
            TypeEntry::Service(_) => TypeKind::Service,
        }
    }
}

/// Every type name the resolver can reason about.
///
/// Services carry constructor descriptors; other types are declared with a
/// [`TypeKind`] so parameters naming them can be classified. The well-known
/// names in [`key`](crate::key) are pre-declared.
///
/// # Examples
///
/// ```rust
/// use ferrous_services::{ParamDescriptor, ServiceDescriptor, TypeKind, TypeRegistry};
///
/// struct WidgetService;
///
/// let mut registry = TypeRegistry::new();
/// registry
///     .declare_data_access("app::WidgetDAO")
///     .register(
///         ServiceDescriptor::new("app::WidgetService", |_| Ok(WidgetService))
///             .param(ParamDescriptor::new("dao")),
///     );
///
/// assert!(registry.contains("app::WidgetService"));
/// assert_eq!(registry.kind("app::WidgetService"), Some(TypeKind::Service));
/// assert!(registry.service("app::WidgetDAO").is_none());
/// assert!(!registry.contains("app::DoesNotExist"));
/// ```
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, TypeEntry>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry holding only the well-known capability names.
    pub fn new() -> Self {
        let mut registry = Self {
            types: HashMap::new(),
        };
        registry
            .declare(CONFIG_TYPE, TypeKind::Configuration)
            .declare(RESOLVER_TYPE, TypeKind::Resolver)
            .declare(DATA_ACCESS_TYPE, TypeKind::DataAccess { instantiable: false })
            .declare(SERVICE_TYPE, TypeKind::Service)
            .declare(USER_TYPE, TypeKind::User);
        registry
    }

    /// Declares `name` with `kind`, replacing any earlier entry.
    pub fn declare(&mut self, name: impl Into<String>, kind: TypeKind) -> &mut Self {
        self.types.insert(name.into(), TypeEntry::Declared(kind));
        self
    }

    /// Declares a concrete data-access type.
    pub fn declare_data_access(&mut self, name: impl Into<String>) -> &mut Self {
        self.declare(name, TypeKind::DataAccess { instantiable: true })
    }

    /// Declares an abstract data-access type, resolved by naming convention.
    pub fn declare_abstract_data_access(&mut self, name: impl Into<String>) -> &mut Self {
        self.declare(name, TypeKind::DataAccess { instantiable: false })
    }

    /// Declares a user subtype.
    pub fn declare_user(&mut self, name: impl Into<String>) -> &mut Self {
        self.declare(name, TypeKind::User)
    }

    /// Declares a utility type.
    pub fn declare_utility(&mut self, name: impl Into<String>) -> &mut Self {
        self.declare(name, TypeKind::Utility)
    }

    /// Registers a service constructor, replacing any earlier entry of that name.
    pub fn register(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        self.types.insert(
            descriptor.name().to_string(),
            TypeEntry::Service(Arc::new(descriptor)),
        );
        self
    }

    /// True if `name` is known, whatever its kind.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Kind of `name`, if known.
    pub fn kind(&self, name: &str) -> Option<TypeKind> {
        self.types.get(name).map(TypeEntry::kind)
    }

    /// Constructor descriptor of the service `name`.
    pub fn service(&self, name: &str) -> Option<&Arc<ServiceDescriptor>> {
        match self.types.get(name)? {
            TypeEntry::Service(descriptor) => Some(descriptor),
            TypeEntry::Declared(_) => None,
        }
    }

    /// All registered services, sorted by name.
    pub fn services(&self) -> Vec<&Arc<ServiceDescriptor>> {
        let mut services: Vec<_> = self
            .types
            .values()
            .filter_map(|entry| match entry {
                TypeEntry::Service(descriptor) => Some(descriptor),
                TypeEntry::Declared(_) => None,
            })
            .collect();
        services.sort_by(|a, b| a.name().cmp(b.name()));
        services
    }

    /// Number of known type names, well-known ones included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if nothing at all is known. Never the case for [`TypeRegistry::new`].
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Static checks over the registered constructors.
    pub fn validate(&self, naming: &NamingConvention) -> ValidationReport {
        validation::validate(self, naming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_names_are_predeclared() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.kind(CONFIG_TYPE), Some(TypeKind::Configuration));
        assert_eq!(registry.kind(RESOLVER_TYPE), Some(TypeKind::Resolver));
        assert_eq!(registry.kind(USER_TYPE), Some(TypeKind::User));
        assert_eq!(registry.len(), 5);
        assert!(registry.services().is_empty());
    }

    #[test]
    fn registering_a_service_replaces_a_declaration() {
        let mut registry = TypeRegistry::new();
        registry.declare_utility("app::Cache");
        registry.register(ServiceDescriptor::new("app::Cache", |_| Ok(0u8)));
        assert_eq!(registry.kind("app::Cache"), Some(TypeKind::Service));
        assert!(registry.service("app::Cache").is_some());
    }

    #[test]
    fn services_are_listed_in_name_order() {
        let mut registry = TypeRegistry::new();
        registry
            .register(ServiceDescriptor::new("b::Two", |_| Ok(())))
            .register(ServiceDescriptor::new("a::One", |_| Ok(())));
        let names: Vec<_> = registry.services().iter().map(|d| d.name().to_string()).collect();
        assert_eq!(names, vec!["a::One", "b::Two"]);
    }
}
