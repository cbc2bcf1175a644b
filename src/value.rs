//! Resolved constructor arguments.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use crate::auth::Principal;
use crate::config::Config;
use crate::provider::ServiceFactory;
use crate::{DiError, DiResult};

/// Type-erased shared instance.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// A single resolved constructor argument, or a parameter default.
#[derive(Clone)]
pub enum Value {
    /// Absent value; the usual default for optional parameters
    Null,
    /// Service configuration section
    Config(Arc<Config>),
    /// Handle to the resolver that is constructing the service.
    ///
    /// A service that keeps this handle also keeps the resolver's cache, and
    /// therefore itself, alive.
    Resolver(ServiceFactory),
    /// Current principal
    User(Principal),
    /// Service, data-access object, utility, or literal default
    Instance(AnyArc),
}

impl Value {
    /// Wraps a concrete value, typically a literal default.
    pub fn instance<T: Any + Send + Sync>(value: T) -> Self {
        Value::Instance(Arc::new(value))
    }

    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Config(config) => f.debug_tuple("Config").field(config).finish(),
            Value::Resolver(_) => f.write_str("Resolver(..)"),
            Value::User(user) => f.debug_tuple("User").field(&user.id()).finish(),
            Value::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}

/// Positional constructor arguments, in parameter order.
///
/// Constructors registered through
/// [`ServiceDescriptor::new`](crate::ServiceDescriptor::new) receive an
/// `Args` and pull typed values out by position. Accessing a position with the
/// wrong accessor or type fails with [`DiError::TypeMismatch`] naming the
/// parameter.
pub struct Args {
    owner: String,
    names: Vec<String>,
    values: Vec<Value>,
}

impl Args {
    pub(crate) fn new(owner: impl Into<String>, names: Vec<String>, values: Vec<Value>) -> Self {
        debug_assert_eq!(names.len(), values.len());
        Self {
            owner: owner.into(),
            names,
            values,
        }
    }

    /// Name of the service being constructed.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the constructor takes no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parameter name at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Raw value at `index`.
    pub fn value(&self, index: usize) -> DiResult<&Value> {
        self.values.get(index).ok_or_else(|| {
            DiError::construction(&self.owner, format!("no argument at position {}", index))
        })
    }

    /// Instance at `index`, downcast to `T`.
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Arc<T>> {
        match self.value(index)? {
            Value::Instance(any) => Arc::clone(any)
                .downcast::<T>()
                .map_err(|_| self.mismatch::<T>(index)),
            _ => Err(self.mismatch::<T>(index)),
        }
    }

    /// Like [`get`](Self::get) but maps [`Value::Null`] to `None`.
    pub fn get_optional<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Option<Arc<T>>> {
        match self.value(index)? {
            Value::Null => Ok(None),
            _ => self.get(index).map(Some),
        }
    }

    /// Configuration section at `index`; `None` when the default was null.
    pub fn config(&self, index: usize) -> DiResult<Option<Arc<Config>>> {
        match self.value(index)? {
            Value::Config(config) => Ok(Some(Arc::clone(config))),
            Value::Null => Ok(None),
            _ => Err(self.mismatch::<Config>(index)),
        }
    }

    /// Resolver handle at `index`.
    pub fn resolver(&self, index: usize) -> DiResult<ServiceFactory> {
        match self.value(index)? {
            Value::Resolver(factory) => Ok(factory.clone()),
            _ => Err(self.mismatch::<ServiceFactory>(index)),
        }
    }

    /// Principal at `index`; `None` when the default was null.
    pub fn user(&self, index: usize) -> DiResult<Option<Principal>> {
        match self.value(index)? {
            Value::User(user) => Ok(Some(Arc::clone(user))),
            Value::Null => Ok(None),
            _ => Err(self.mismatch::<Principal>(index)),
        }
    }

    fn mismatch<T: ?Sized>(&self, index: usize) -> DiError {
        let param = self.name(index).unwrap_or("?");
        DiError::TypeMismatch {
            name: format!("{}::{}", self.owner, param),
            expected: type_name::<T>(),
        }
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in self.names.iter().zip(&self.values) {
            map.entry(name, value);
        }
        map.finish()
    }
}
