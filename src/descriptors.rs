//! Constructor descriptors: what a service needs and how to build it.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::auth::{Principal, UserAware};
use crate::value::{AnyArc, Args, Value};
use crate::DiResult;

pub(crate) type Constructor = Arc<dyn Fn(&Args) -> DiResult<AnyArc> + Send + Sync>;
pub(crate) type UserHook = Arc<dyn Fn(&AnyArc, &Principal) + Send + Sync>;

/// One constructor parameter.
///
/// A parameter has a name, optionally a declared capability (a type name the
/// [`TypeRegistry`](crate::TypeRegistry) can classify), and optionally a
/// default. A parameter with a default is optional.
///
/// # Examples
///
/// ```rust
/// use ferrous_services::{ParamDescriptor, Value};
///
/// let page_size = ParamDescriptor::new("page_size").with_default(Value::instance(25u32));
/// assert!(page_size.is_optional());
/// assert!(page_size.capability().is_none());
///
/// let mailer = ParamDescriptor::typed("mailer", "app::Mailer");
/// assert_eq!(mailer.capability(), Some("app::Mailer"));
/// assert!(!mailer.is_optional());
/// ```
#[derive(Debug, Clone)]
pub struct ParamDescriptor {
    name: String,
    capability: Option<String>,
    default: Option<Value>,
}

impl ParamDescriptor {
    /// Untyped, required parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capability: None,
            default: None,
        }
    }

    /// Required parameter with a declared capability.
    pub fn typed(name: impl Into<String>, capability: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capability: Some(capability.into()),
            default: None,
        }
    }

    /// Makes the parameter optional with the given default.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Makes the parameter optional with a null default.
    pub fn optional(self) -> Self {
        self.with_default(Value::Null)
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared capability, if any.
    pub fn capability(&self) -> Option<&str> {
        self.capability.as_deref()
    }

    /// True when a default exists.
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    /// Default value for optional parameters.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// A registered service type: its name, constructor parameters and
/// constructor.
///
/// # Examples
///
/// ```rust
/// use ferrous_services::{ParamDescriptor, ServiceDescriptor};
/// use std::sync::Arc;
///
/// struct Clock;
/// struct Greeter { clock: Arc<Clock>, greeting: Arc<String> }
///
/// let descriptor = ServiceDescriptor::new("app::GreeterService", |args| {
///     Ok(Greeter { clock: args.get::<Clock>(0)?, greeting: args.get::<String>(1)? })
/// })
/// .param(ParamDescriptor::typed("clock", "app::Clock"))
/// .param(ParamDescriptor::new("greeting"));
///
/// assert_eq!(descriptor.name(), "app::GreeterService");
/// assert_eq!(descriptor.params().len(), 2);
/// assert!(!descriptor.is_user_aware());
/// ```
#[derive(Clone)]
pub struct ServiceDescriptor {
    name: String,
    params: Vec<ParamDescriptor>,
    ctor: Constructor,
    user_hook: Option<UserHook>,
}

impl ServiceDescriptor {
    /// Describes a service built by `ctor` from its positional arguments.
    pub fn new<T, F>(name: impl Into<String>, ctor: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Args) -> DiResult<T> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: Vec::new(),
            ctor: Arc::new(move |args: &Args| ctor(args).map(|service| Arc::new(service) as AnyArc)),
            user_hook: None,
        }
    }

    /// Like [`new`](Self::new), for services exposing the "set user" capability.
    ///
    /// When a principal is set on the resolver, the instance receives it once
    /// right after construction.
    pub fn user_aware<T, F>(name: impl Into<String>, ctor: F) -> Self
    where
        T: UserAware + Any,
        F: Fn(&Args) -> DiResult<T> + Send + Sync + 'static,
    {
        let mut descriptor = Self::new(name, ctor);
        descriptor.user_hook = Some(Arc::new(|instance: &AnyArc, user: &Principal| {
            if let Some(service) = (**instance).downcast_ref::<T>() {
                service.set_user(Arc::clone(user));
            }
        }));
        descriptor
    }

    /// Appends a constructor parameter.
    pub fn param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    /// Appends several constructor parameters, in order.
    pub fn params_from(mut self, params: impl IntoIterator<Item = ParamDescriptor>) -> Self {
        self.params.extend(params);
        self
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constructor parameters in positional order.
    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    /// True when the service exposes the "set user" capability.
    pub fn is_user_aware(&self) -> bool {
        self.user_hook.is_some()
    }

    pub(crate) fn construct(&self, args: &Args) -> DiResult<AnyArc> {
        (self.ctor)(args)
    }

    pub(crate) fn inject_user(&self, instance: &AnyArc, user: &Principal) -> bool {
        match &self.user_hook {
            Some(hook) => {
                hook(instance, user);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("user_aware", &self.is_user_aware())
            .finish()
    }
}
