//! # ferrous-services
//!
//! Constructor-driven service resolution: services are built on demand from
//! declarative constructor descriptors, every parameter is supplied by a fixed
//! precedence of rules, and one instance per service type is cached.
//!
//! ## Features
//!
//! - **Explicit registry**: constructor parameters are described up front, no runtime reflection
//! - **Precedence-driven wiring**: configuration, resolver, data-access, services, user, utilities
//! - **Convention-based data access**: `WidgetService` gets `WidgetDAO` by naming rules
//! - **Cycle detection**: cyclic service graphs fail with the full `A -> B -> A` path
//! - **User injection**: services with a "set user" capability receive the current principal
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_services::{
//!     Config, DataAccessRegistry, ParamDescriptor, ServiceDescriptor, ServiceFactory,
//!     TypeRegistry,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct OrderDao;
//! struct MailService { sender: String }
//! struct OrderService { dao: Arc<OrderDao>, mail: Arc<MailService> }
//!
//! let mut registry = TypeRegistry::new();
//! registry
//!     .declare_data_access("OrderDAO")
//!     .register(
//!         ServiceDescriptor::new("MailService", |args| {
//!             let config = args.config(0)?.unwrap_or_default();
//!             Ok(MailService { sender: config.value("mail.sender").unwrap_or_default() })
//!         })
//!         .param(ParamDescriptor::new("config")),
//!     )
//!     .register(
//!         ServiceDescriptor::new("OrderService", |args| {
//!             Ok(OrderService { dao: args.get(0)?, mail: args.get(1)? })
//!         })
//!         .param(ParamDescriptor::new("dao"))
//!         .param(ParamDescriptor::typed("mail", "MailService")),
//!     );
//!
//! let mut daos = DataAccessRegistry::new();
//! daos.register("OrderDAO", || OrderDao);
//!
//! let config = Config::from_value(json!({
//!     "application": { "mail": { "sender": "orders@example.com" } }
//! })).unwrap();
//!
//! let factory = ServiceFactory::builder(registry)
//!     .data_access(daos)
//!     .config(config)
//!     .build();
//!
//! let orders = factory.get_as::<OrderService>("OrderService").unwrap();
//! assert_eq!(orders.mail.sender, "orders@example.com");
//! ```
//!
//! ## Resolution precedence
//!
//! For every constructor parameter the first matching rule wins:
//!
//! 1. **Configuration**: capability `Config` or name `config`
//! 2. **Resolver**: capability `ServiceFactory` (or a declared subtype)
//! 3. **Abstract data access**: capability `DAO` (or abstract subtype) or name `dao`
//! 4. **Concrete data access**: a declared, instantiable data-access type
//! 5. **Service**: a registered service, resolved recursively
//! 6. **User**: capability `User` (or subtype) or name `user`, when a principal is set
//! 7. **Utility**: any other declared capability, via the utility factory
//!
//! Otherwise the parameter's default is used, or resolution fails with
//! [`DiError::InvalidProperty`].

// Module declarations
pub mod auth;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod factories;
pub mod key;
pub mod naming;
pub mod observer;
pub mod provider;
pub mod requirement;
pub mod validation;
pub mod value;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use auth::{Principal, User, UserAware};
pub use config::Config;
pub use descriptors::{ParamDescriptor, ServiceDescriptor};
pub use error::{DiError, DiResult};
pub use factories::{DataAccessFactory, DataAccessRegistry, UtilityError, UtilityFactory, UtilityRegistry};
pub use key::TypeKind;
pub use naming::NamingConvention;
pub use observer::{ResolutionObserver, TracingObserver};
pub use provider::{ServiceFactory, ServiceFactoryBuilder};
pub use registration::TypeRegistry;
pub use requirement::{classify, ClassifyContext, Requirement};
pub use validation::{ValidationError, ValidationReport, ValidationWarning};
pub use value::{AnyArc, Args, Value};
