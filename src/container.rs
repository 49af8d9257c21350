use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace, trace_span};

use crate::provider::Binding;
use crate::*;

/// How the outcome of a type-keyed provider is reused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// The provider runs on every resolution
    Transient,
    /// The first outcome, success or failure, is kept for the lifetime of the container
    Singleton,
}

/// Outcome of the first resolution of a singleton
enum Memo {
    Resolved(Box<dyn Any + Send + Sync>),
    Failed(WiringError),
}

impl Memo {
    fn recover<T: Dependency>(&self, kind: Kind) -> Result<T> {
        match self {
            Memo::Resolved(instance) => instance
                .downcast_ref::<T>()
                .cloned()
                .ok_or(WiringError::Consistency(kind.name())),
            Memo::Failed(error) => Err(error.clone()),
        }
    }
}

/// Dependency injection registry.
///
/// Providers are registered under the type they produce (see [Container::bind] and
/// [Container::bind_singleton]) or under a name (see [Container::bind_named]).
/// Instances are then built on demand by [Container::make] and [Container::make_named].
///
/// Binding needs exclusive access, resolving only needs a shared reference: providers
/// receive the resolving container and can use it to obtain their own dependencies.
/// A singleton provider which requests itself, directly or not, recurses without end.
#[derive(Default)]
pub struct Container {
    transients: HashMap<Kind, Binding>,
    singletons: HashMap<Kind, Binding>,
    named: HashMap<String, Binding>,
    memos: Mutex<HashMap<Kind, Memo>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the provider to build every requested instance of `T`.
    ///
    /// Replaces the previous transient provider for `T`. A singleton provider bound for `T`
    /// keeps answering [Container::make] regardless.
    pub fn bind<T: Dependency>(
        &mut self,
        provider: impl Fn(&Container) -> Result<T> + Send + Sync + 'static,
    ) {
        self.insert::<T>(Lifetime::Transient, Arc::new(provider));
    }

    /// Same as [Container::bind], unless a type-keyed provider already exists for `T`.
    ///
    /// Named bindings are not considered.
    pub fn bind_if<T: Dependency>(
        &mut self,
        provider: impl Fn(&Container) -> Result<T> + Send + Sync + 'static,
    ) {
        if self.is_bound::<T>() {
            debug!(dependency = type_name::<T>(), "provider already bound, skipped");
            return;
        }
        self.bind(provider);
    }

    /// Use the provider once to build the shared instance of `T`.
    ///
    /// Singleton providers take precedence over transient ones for the same type.
    /// The outcome of the first resolution is frozen, including an error.
    /// Rebinding `T` after that first resolution replaces the provider but keeps the
    /// frozen outcome: the new provider will never run.
    pub fn bind_singleton<T: Dependency>(
        &mut self,
        provider: impl Fn(&Container) -> Result<T> + Send + Sync + 'static,
    ) {
        self.insert::<T>(Lifetime::Singleton, Arc::new(provider));
        if self.is_memoized::<T>() {
            debug!(
                dependency = type_name::<T>(),
                "singleton already resolved, the new provider will not be used"
            );
        }
    }

    /// Bind a provider under a name, independently from the type-keyed bindings.
    ///
    /// Named providers run on every resolution.
    pub fn bind_named<T: Dependency>(
        &mut self,
        id: impl Into<String>,
        provider: impl Fn(&Container) -> Result<T> + Send + Sync + 'static,
    ) {
        let id = id.into();
        trace!(name = %id, dependency = type_name::<T>(), "bound named provider");
        self.named.insert(id, Binding::new::<T>(Arc::new(provider)));
    }

    fn insert<T: Dependency>(&mut self, lifetime: Lifetime, provider: Provider<T>) {
        let kind = Kind::of::<T>();
        let table = match lifetime {
            Lifetime::Transient => &mut self.transients,
            Lifetime::Singleton => &mut self.singletons,
        };
        let replaced = table.insert(kind, Binding::new(provider)).is_some();
        trace!(dependency = kind.name(), ?lifetime, replaced, "bound provider");
    }

    /// Obtain an instance of `T` from its type-keyed provider.
    ///
    /// Errors returned by the provider are passed through unchanged.
    pub fn make<T: Dependency>(&self) -> Result<T> {
        let kind = Kind::of::<T>();
        let _span = trace_span!("make", dependency = kind.name()).entered();

        if !self.is_bound::<T>() {
            debug!(dependency = kind.name(), "no provider bound");
            return Err(WiringError::ProviderNotFound(kind.name().to_string()));
        }

        if let Some(binding) = self.singletons.get(&kind) {
            if let Some(outcome) = self.memoized::<T>(kind) {
                trace!("singleton served from memo");
                return outcome;
            }

            // First resolution: record the outcome, then serve it like any later call
            let provider = binding
                .provider::<T>()
                .ok_or(WiringError::Consistency(kind.name()))?;
            let outcome = provider(self);
            self.remember(kind, outcome);
            return self.make();
        }

        if let Some(binding) = self.transients.get(&kind) {
            let provider = binding
                .provider::<T>()
                .ok_or(WiringError::Consistency(kind.name()))?;
            return provider(self);
        }

        Err(WiringError::Consistency(kind.name()))
    }

    /// Obtain an instance of `T` from the provider bound under a name.
    ///
    /// Fails with [WiringError::TypeMismatch] if that provider does not produce `T`.
    pub fn make_named<T: Dependency>(&self, id: &ProviderId) -> Result<T> {
        let _span = trace_span!("make_named", name = id).entered();

        let Some(binding) = self.named.get(id) else {
            debug!(name = id, "no named provider bound");
            return Err(WiringError::ProviderNotFound(id.to_string()));
        };

        let Some(provider) = binding.provider::<T>() else {
            let (requested, bound) = (type_name::<T>(), binding.kind().name());
            debug!(name = id, requested, bound, "named provider has another type");
            return Err(WiringError::TypeMismatch { requested, bound });
        };

        provider(self)
    }

    /// Check if a type-keyed provider exists for `T`
    pub fn is_bound<T: 'static>(&self) -> bool {
        let kind = Kind::of::<T>();
        self.singletons.contains_key(&kind) || self.transients.contains_key(&kind)
    }

    /// Check if a provider is bound under this name
    pub fn is_named(&self, id: &ProviderId) -> bool {
        self.named.contains_key(id)
    }

    /// Lifetime of the provider answering [Container::make] for `T`
    pub fn lifetime_of<T: 'static>(&self) -> Option<Lifetime> {
        let kind = Kind::of::<T>();
        if self.singletons.contains_key(&kind) {
            Some(Lifetime::Singleton)
        } else if self.transients.contains_key(&kind) {
            Some(Lifetime::Transient)
        } else {
            None
        }
    }

    /// Check if the first resolution of the singleton `T` already happened
    pub fn is_memoized<T: 'static>(&self) -> bool {
        self.memos().contains_key(&Kind::of::<T>())
    }

    fn memoized<T: Dependency>(&self, kind: Kind) -> Option<Result<T>> {
        self.memos().get(&kind).map(|memo| memo.recover(kind))
    }

    fn remember<T: Dependency>(&self, kind: Kind, outcome: Result<T>) {
        let memo = match outcome {
            Ok(instance) => {
                debug!(dependency = kind.name(), "singleton resolved");
                Memo::Resolved(Box::new(instance))
            }
            Err(error) => {
                debug!(dependency = kind.name(), %error, "singleton failed, keeping the error");
                Memo::Failed(error)
            }
        };
        // A concurrent first resolution may have won the race: keep its outcome
        self.memos().entry(kind).or_insert(memo);
    }

    // Only a panicking Clone can poison the lock, the table is still consistent then
    fn memos(&self) -> MutexGuard<'_, HashMap<Kind, Memo>> {
        self.memos.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let memos = self.memos();
        let mut map = f.debug_struct("Container");
        for kind in self.transients.keys() {
            if !self.singletons.contains_key(kind) {
                map.field(kind.name(), &"transient");
            }
        }
        for kind in self.singletons.keys() {
            let state = match memos.get(kind) {
                None => "singleton",
                Some(Memo::Resolved(_)) => "singleton (resolved)",
                Some(Memo::Failed(_)) => "singleton (failed)",
            };
            map.field(kind.name(), &state);
        }
        for (id, binding) in &self.named {
            map.field(id, &binding.kind().name());
        }
        map.finish()
    }
}
