//! Small runtime dependency injection container with type-keyed and named providers.
//!
//! # Simple use case
//!
//! ```
//! # use std::sync::Arc;
//! # use tsuna::*;
//! // Define traits and implementors
//! trait MyTrait: Send + Sync {
//!     fn cheers(&self) -> String;
//! }
//!
//! struct MyImpl {
//!     name: String,
//! }
//!
//! impl MyTrait for MyImpl {
//!     fn cheers(&self) -> String {
//!         format!("Hello {}", self.name)
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! // Bind providers, then resolve instances on demand
//! let mut container = Container::new();
//! container.bind_named("name", |_| Ok(String::from("world")));
//! container.bind_singleton(|c: &Container| {
//!     let name: String = c.make_named("name")?;
//!     Ok(Arc::new(MyImpl { name }) as Arc<dyn MyTrait>)
//! });
//!
//! let a: Arc<dyn MyTrait> = container.make()?;
//! let b: Arc<dyn MyTrait> = container.make()?;
//! assert_eq!(a.cheers(), "Hello world");
//! assert!(Arc::ptr_eq(&a, &b));
//! # Ok(())
//! # }
//! ```
//!
//! # Mechanism
//!
//! The container keeps three tables of providers, all storing type-erased functions based on
//! the ```Any``` trait and recovered by downcasting at the resolution site.
//!
//! * Type-keyed providers are indexed by the [Kind] of the type they produce.
//!   A ```Transient``` provider runs on every call to ```make```.
//!   A ```Singleton``` provider runs once: its first outcome, success *or* error, is remembered
//!   and returned by every later call, even if the type is bound again afterwards.
//! * Named providers are indexed by a string and never remembered. The caller names the expected
//!   type when resolving them and gets a [WiringError::TypeMismatch] if it does not match.
//!
//! Providers receive the container performing the resolution and can use it to obtain their own
//! dependencies. Cycles are not detected: a singleton requesting itself recurses without end.
//!
//! The container has no concurrency contract beyond what the borrow checker enforces: binding
//! needs exclusive access, resolving happens through shared references.

mod container;
mod error;
mod kind;
mod provider;

pub use container::{Container, Lifetime};
pub use error::{BoxError, Result, WiringError};
pub use kind::Kind;
pub use provider::{Dependency, Provider, ProviderId};
