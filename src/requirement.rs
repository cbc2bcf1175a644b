//! Parameter classification.
//!
//! Each constructor parameter is classified exactly once into a
//! [`Requirement`]; the resolver then dispatches on it. The order of checks in
//! [`classify`] is the resolution precedence.

use crate::descriptors::ParamDescriptor;
use crate::key::{TypeKind, CONFIG_PARAM, DATA_ACCESS_PARAM, USER_PARAM};
use crate::registration::TypeRegistry;

/// What a parameter needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Service configuration section
    Configuration,
    /// The resolver itself
    SelfReference,
    /// Data-access object derived from the owning service's name
    AbstractDataAccess,
    /// Data-access object of this exact type
    ConcreteDataAccess(String),
    /// Another service, resolved recursively
    ServiceDependency(String),
    /// The current principal
    UserPrincipal,
    /// Helper from the utility factory
    UtilityCapability(String),
    /// No rule applies; only a default can satisfy it
    Unresolvable,
}

/// Resolver state that affects classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyContext {
    /// A principal is currently set
    pub user_present: bool,
    /// A utility factory is configured
    pub utilities_present: bool,
}

/// Classifies `param`, first match wins.
///
/// # Examples
///
/// ```rust
/// use ferrous_services::{classify, ClassifyContext, ParamDescriptor, Requirement, TypeRegistry};
///
/// let mut registry = TypeRegistry::new();
/// registry.declare_data_access("app::AuditDAO");
///
/// let ctx = ClassifyContext { user_present: false, utilities_present: true };
/// assert_eq!(classify(&ParamDescriptor::new("config"), &registry, ctx), Requirement::Configuration);
/// assert_eq!(classify(&ParamDescriptor::new("dao"), &registry, ctx), Requirement::AbstractDataAccess);
/// assert_eq!(
///     classify(&ParamDescriptor::typed("audit", "app::AuditDAO"), &registry, ctx),
///     Requirement::ConcreteDataAccess("app::AuditDAO".to_string())
/// );
/// // no principal set: the reserved name alone is not enough
/// assert_eq!(classify(&ParamDescriptor::new("user"), &registry, ctx), Requirement::Unresolvable);
/// ```
pub fn classify(param: &ParamDescriptor, registry: &TypeRegistry, ctx: ClassifyContext) -> Requirement {
    let capability = param.capability();
    let kind = capability.and_then(|name| registry.kind(name));
    let name = param.name();

    if kind == Some(TypeKind::Configuration) || name == CONFIG_PARAM {
        return Requirement::Configuration;
    }
    if kind == Some(TypeKind::Resolver) {
        return Requirement::SelfReference;
    }
    if kind == Some(TypeKind::DataAccess { instantiable: false }) || name == DATA_ACCESS_PARAM {
        return Requirement::AbstractDataAccess;
    }
    match (capability, kind) {
        (Some(cap), Some(TypeKind::DataAccess { instantiable: true })) => {
            return Requirement::ConcreteDataAccess(cap.to_string());
        }
        // the abstract `Service` base has no constructor and falls through
        (Some(cap), Some(TypeKind::Service)) if registry.service(cap).is_some() => {
            return Requirement::ServiceDependency(cap.to_string());
        }
        _ => {}
    }
    if ctx.user_present && (kind == Some(TypeKind::User) || name == USER_PARAM) {
        return Requirement::UserPrincipal;
    }
    match capability {
        Some(cap) if ctx.utilities_present => Requirement::UtilityCapability(cap.to_string()),
        _ => Requirement::Unresolvable,
    }
}
