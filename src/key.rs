//! Type identity and well-known capability names.

/// Name of the configuration capability.
pub const CONFIG_TYPE: &str = "Config";
/// Name of the resolver capability; parameters of this kind receive the factory itself.
pub const RESOLVER_TYPE: &str = "ServiceFactory";
/// Name of the generic, non-instantiable data-access capability.
pub const DATA_ACCESS_TYPE: &str = "DAO";
/// Name of the service base capability.
pub const SERVICE_TYPE: &str = "Service";
/// Name of the user capability.
pub const USER_TYPE: &str = "User";

/// Parameter name reserved for configuration.
pub const CONFIG_PARAM: &str = "config";
/// Parameter name reserved for the convention-derived data-access object.
pub const DATA_ACCESS_PARAM: &str = "dao";
/// Parameter name reserved for the current user.
pub const USER_PARAM: &str = "user";

/// Configuration section handed to services.
pub const SERVICE_CONFIG_SECTION: &str = "application";
/// Configuration section handed to the utility factory.
pub const UTILITY_CONFIG_SECTION: &str = "utility";
/// Configuration section holding data-access naming conventions.
pub const DATA_ACCESS_CONFIG_SECTION: &str = "data_access";

/// How the registry classifies a type name.
///
/// A parameter's declared capability is looked up in the
/// [`TypeRegistry`](crate::TypeRegistry) and its kind decides which
/// resolution rule applies. Names the registry has never seen carry no kind
/// and fall through to the utility factory.
///
/// # Examples
///
/// ```rust
/// use ferrous_services::{TypeKind, TypeRegistry};
/// use ferrous_services::key::DATA_ACCESS_TYPE;
///
/// let mut registry = TypeRegistry::new();
/// registry.declare_data_access("app::WidgetDAO");
///
/// assert_eq!(
///     registry.kind(DATA_ACCESS_TYPE),
///     Some(TypeKind::DataAccess { instantiable: false })
/// );
/// assert_eq!(
///     registry.kind("app::WidgetDAO"),
///     Some(TypeKind::DataAccess { instantiable: true })
/// );
/// assert!(registry.kind("app::Mailer").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// The configuration type
    Configuration,
    /// The resolver type or a subtype of it
    Resolver,
    /// A data-access type; abstract ones are resolved by naming convention
    DataAccess {
        /// Whether the data-access factory can build this exact type
        instantiable: bool,
    },
    /// A service constructed by the resolver
    Service,
    /// The user type or a subtype of it
    User,
    /// A helper resolved through the utility factory
    Utility,
}

impl TypeKind {
    /// Short label for diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            TypeKind::Configuration => "configuration",
            TypeKind::Resolver => "resolver",
            TypeKind::DataAccess { instantiable: true } => "data-access",
            TypeKind::DataAccess { instantiable: false } => "abstract data-access",
            TypeKind::Service => "service",
            TypeKind::User => "user",
            TypeKind::Utility => "utility",
        }
    }
}
