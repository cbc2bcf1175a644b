//! Static validation of a type registry.
//!
//! Resolution failures are only discovered when a service is first requested.
//! These checks walk the registered constructors up front and report the
//! same problems without constructing anything.

use std::collections::HashSet;
use std::fmt;

use crate::key::{TypeKind, CONFIG_PARAM, DATA_ACCESS_PARAM, USER_PARAM};
use crate::naming::NamingConvention;
use crate::registration::TypeRegistry;

/// Result of registry validation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that will make resolution fail
    pub errors: Vec<ValidationError>,
    /// Configurations that resolve but probably not as intended
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// True when there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A problem that will make resolution fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Services that depend on each other in a cycle (first name repeated at the end)
    CircularDependency {
        /// Service names along the cycle
        cycle: Vec<String>,
    },
    /// The convention-derived data-access type does not exist
    MissingDataAccess {
        /// Service whose constructor asks for data access
        service: String,
        /// Parameter that triggered the convention
        parameter: String,
        /// Derived data-access type name
        expected: String,
    },
}

/// A configuration that resolves but probably not as intended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Capability the registry has never heard of; only the utility factory can satisfy it
    UndeclaredCapability {
        /// Owning service
        service: String,
        /// Parameter name
        parameter: String,
        /// Undeclared capability name
        capability: String,
    },
    /// Required parameter with neither a capability nor a reserved name
    UntypedRequiredParameter {
        /// Owning service
        service: String,
        /// Parameter name
        parameter: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::CircularDependency { cycle } => {
                write!(f, "circular dependency: {}", cycle.join(" -> "))
            }
            ValidationError::MissingDataAccess { service, parameter, expected } => write!(
                f,
                "{}::{} expects data-access type {} which is not declared",
                service, parameter, expected
            ),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::UndeclaredCapability { service, parameter, capability } => write!(
                f,
                "{}::{} declares unknown capability {} (utility factory only)",
                service, parameter, capability
            ),
            ValidationWarning::UntypedRequiredParameter { service, parameter } => write!(
                f,
                "{}::{} is required but has no capability and no default",
                service, parameter
            ),
        }
    }
}

pub(crate) fn validate(registry: &TypeRegistry, naming: &NamingConvention) -> ValidationReport {
    let mut report = ValidationReport::default();

    for service in registry.services() {
        for param in service.params() {
            let kind = param.capability().and_then(|cap| registry.kind(cap));
            let abstract_dao = kind == Some(TypeKind::DataAccess { instantiable: false })
                || (param.name() == DATA_ACCESS_PARAM
                    && kind != Some(TypeKind::Configuration)
                    && kind != Some(TypeKind::Resolver));
            if abstract_dao && param.name() != CONFIG_PARAM {
                let expected = naming.derive_data_access_name(service.name());
                if registry.kind(&expected) != Some(TypeKind::DataAccess { instantiable: true }) {
                    report.errors.push(ValidationError::MissingDataAccess {
                        service: service.name().to_string(),
                        parameter: param.name().to_string(),
                        expected,
                    });
                }
            }

            match (param.capability(), kind) {
                (Some(capability), None) => {
                    report.warnings.push(ValidationWarning::UndeclaredCapability {
                        service: service.name().to_string(),
                        parameter: param.name().to_string(),
                        capability: capability.to_string(),
                    });
                }
                (None, None)
                    if !param.is_optional()
                        && ![CONFIG_PARAM, DATA_ACCESS_PARAM, USER_PARAM].contains(&param.name()) =>
                {
                    report.warnings.push(ValidationWarning::UntypedRequiredParameter {
                        service: service.name().to_string(),
                        parameter: param.name().to_string(),
                    });
                }
                _ => {}
            }
        }
    }

    for cycle in detect_cycles(registry) {
        report.errors.push(ValidationError::CircularDependency { cycle });
    }
    report
}

/// Service-to-service edges, in parameter order.
fn dependencies<'a>(registry: &'a TypeRegistry, service: &str) -> Vec<&'a str> {
    let Some(descriptor) = registry.service(service) else {
        return Vec::new();
    };
    descriptor
        .params()
        .iter()
        .filter(|p| p.name() != CONFIG_PARAM && p.name() != DATA_ACCESS_PARAM)
        .filter_map(|p| p.capability())
        .filter(|cap| registry.service(cap).is_some())
        .collect()
}

fn detect_cycles(registry: &TypeRegistry) -> Vec<Vec<String>> {
    let mut visited = HashSet::new();
    let mut path = Vec::new();
    let mut cycles = Vec::new();

    for service in registry.services() {
        if !visited.contains(service.name()) {
            dfs_cycles(registry, service.name(), &mut visited, &mut path, &mut cycles);
        }
    }
    cycles
}

fn dfs_cycles<'a>(
    registry: &'a TypeRegistry,
    current: &'a str,
    visited: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
    cycles: &mut Vec<Vec<String>>,
) {
    if let Some(start) = path.iter().position(|&name| name == current) {
        let cycle = path[start..]
            .iter()
            .chain(std::iter::once(&current))
            .map(|name| name.to_string())
            .collect();
        cycles.push(cycle);
        return;
    }
    if visited.contains(current) {
        return;
    }

    visited.insert(current);
    path.push(current);
    for dep in dependencies(registry, current) {
        dfs_cycles(registry, dep, visited, path, cycles);
    }
    path.pop();
}
