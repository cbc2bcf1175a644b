//! Current-user contract.
//!
//! Authentication lives outside this crate. The resolver only holds a shared
//! reference to whoever is acting and hands it to services that ask for it.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// The authenticated actor.
pub trait User: Any + Send + Sync + fmt::Debug {
    /// Stable identifier of the actor.
    fn id(&self) -> &str;

    /// Upcast for downcasting to the application's concrete user type.
    fn as_any(&self) -> &dyn Any;
}

/// Shared, externally owned principal.
pub type Principal = Arc<dyn User>;

/// "Set user" capability.
///
/// Services registered through
/// [`ServiceDescriptor::user_aware`](crate::ServiceDescriptor::user_aware)
/// receive the current principal once, right after construction, when one is
/// set on the resolver.
///
/// # Examples
///
/// ```rust
/// use ferrous_services::{Principal, UserAware};
/// use parking_lot::RwLock;
///
/// #[derive(Default)]
/// struct AuditService {
///     actor: RwLock<Option<Principal>>,
/// }
///
/// impl UserAware for AuditService {
///     fn set_user(&self, user: Principal) {
///         *self.actor.write() = Some(user);
///     }
/// }
/// ```
pub trait UserAware: Send + Sync {
    /// Receives the current principal.
    fn set_user(&self, user: Principal);
}
