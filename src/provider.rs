//! Providers and their type-erased storage
//!
//! A provider is a plain function taking the [Container] and returning an instance of the
//! target type, or the error explaining why it could not be built.
//! The container keeps providers of heterogeneous types in the same tables: each one is
//! boxed as [Any] next to the [Kind] of the type it produces, and recovered by downcasting
//! to [Provider] once the caller names the expected type again.

use std::any::Any;
use std::sync::Arc;

use crate::{Container, Kind, Result};

/// Shared provider function for the target type
pub type Provider<T> = Arc<dyn Fn(&Container) -> Result<T> + Send + Sync>;

/// Identifier of a named binding
pub type ProviderId = str;

/// Types which can be bound in a [Container].
///
/// Singletons are handed out by cloning the remembered instance,
/// bind an `Arc<_>` to share a single instance between all callers.
pub trait Dependency: Clone + Send + Sync + 'static {}
impl<T: Clone + Send + Sync + 'static> Dependency for T {}

/// Type-erased provider, tagged with the type it produces
pub(crate) struct Binding {
    kind: Kind,
    provider: Box<dyn Any + Send + Sync>,
}

impl Binding {
    pub(crate) fn new<T: Dependency>(provider: Provider<T>) -> Self {
        Self {
            kind: Kind::of::<T>(),
            provider: Box::new(provider),
        }
    }

    pub(crate) fn kind(&self) -> Kind {
        self.kind
    }

    /// Recover the typed provider, if this binding produces `T`
    pub(crate) fn provider<T: Dependency>(&self) -> Option<Provider<T>> {
        self.provider.downcast_ref::<Provider<T>>().cloned()
    }
}
