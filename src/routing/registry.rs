//! Action registry: route template + method class → named handler.
//!
//! # Responsibilities
//! - Collect registrations during startup through `RegistryBuilder`
//! - Compile one `PathMatcher` per method class
//! - Look up actions by template or by raw request path
//! - Answer whether a path accepts a CORS preflight
//!
//! # Design Decisions
//! - Immutable after `build()`; shared via `Arc` without locks
//! - Retrieval (GET) and mutation (POST) tables are independent
//! - Preflight (OPTIONS) is derived from the mutation table, never registered

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::http::Method;
use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::http::{Envelope, ParamMap};
use crate::routing::matcher::{PathMatcher, RouteMatch};

/// Errors raised while building the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("route template registered twice: {0}")]
    DuplicateRoute(String),

    #[error("route templates {first} and {second} have overlapping prefixes")]
    AmbiguousPrefix { first: String, second: String },

    #[error("invalid route template: {0}")]
    InvalidTemplate(String),
}

/// Future returned by a handler.
pub type HandlerFuture = BoxFuture<'static, Envelope>;

/// Uniform handler contract: parameters in, envelope out.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, params: ParamMap) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(ParamMap) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Envelope> + Send + 'static,
{
    fn call(&self, params: ParamMap) -> HandlerFuture {
        Box::pin(self(params))
    }
}

/// A named handler.
#[derive(Clone)]
pub struct Action {
    name: &'static str,
    handler: Arc<dyn Handler>,
}

impl Action {
    pub fn new(name: &'static str, handler: impl Handler) -> Self {
        Self {
            name,
            handler: Arc::new(handler),
        }
    }

    /// Name written into the `Action` field of responses.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invoke the handler.
    pub fn call(&self, params: ParamMap) -> HandlerFuture {
        self.handler.call(params)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}

/// HTTP method classes with their own route tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodClass {
    /// GET
    Retrieval,
    /// POST
    Mutation,
}

impl MethodClass {
    /// Class for `method`; `None` for methods with no table (OPTIONS included).
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(MethodClass::Retrieval),
            Method::POST => Some(MethodClass::Mutation),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct RouteTable {
    matcher: PathMatcher,
    actions: HashMap<&'static str, Action>,
}

impl RouteTable {
    fn compile(entries: Vec<(&'static str, Action)>) -> Result<Self, RegistryError> {
        let matcher = PathMatcher::new(entries.iter().map(|(template, _)| *template))?;
        let actions = entries.into_iter().collect();
        Ok(Self { matcher, actions })
    }
}

/// Startup-time collector of registrations.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    retrieval: Vec<(&'static str, Action)>,
    mutation: Vec<(&'static str, Action)>,
}

impl RegistryBuilder {
    /// Register `handler` under `template` for `class`.
    pub fn register(
        mut self,
        class: MethodClass,
        template: &'static str,
        name: &'static str,
        handler: impl Handler,
    ) -> Self {
        let entry = (template, Action::new(name, handler));
        match class {
            MethodClass::Retrieval => self.retrieval.push(entry),
            MethodClass::Mutation => self.mutation.push(entry),
        }
        self
    }

    pub fn get(self, template: &'static str, name: &'static str, handler: impl Handler) -> Self {
        self.register(MethodClass::Retrieval, template, name, handler)
    }

    pub fn post(self, template: &'static str, name: &'static str, handler: impl Handler) -> Self {
        self.register(MethodClass::Mutation, template, name, handler)
    }

    /// Freeze the registrations.
    pub fn build(self) -> Result<ActionRegistry, RegistryError> {
        let registry = ActionRegistry {
            retrieval: RouteTable::compile(self.retrieval)?,
            mutation: RouteTable::compile(self.mutation)?,
        };
        tracing::debug!(
            retrieval = registry.retrieval.actions.len(),
            mutation = registry.mutation.actions.len(),
            "Action registry built"
        );
        Ok(registry)
    }
}

/// Immutable action lookup shared by all requests.
#[derive(Debug)]
pub struct ActionRegistry {
    retrieval: RouteTable,
    mutation: RouteTable,
}

impl ActionRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    fn table(&self, class: MethodClass) -> &RouteTable {
        match class {
            MethodClass::Retrieval => &self.retrieval,
            MethodClass::Mutation => &self.mutation,
        }
    }

    /// Action registered under the exact `template`.
    pub fn lookup(&self, class: MethodClass, template: &str) -> Option<&Action> {
        self.table(class).actions.get(template)
    }

    /// Resolve a raw request path to its action and match.
    pub fn resolve(&self, class: MethodClass, path: &str) -> Option<(&Action, RouteMatch)> {
        let table = self.table(class);
        let route = table.matcher.resolve(path)?;
        let action = table.actions.get(route.template())?;
        Some((action, route))
    }

    /// Whether `path` names a mutation route and so accepts OPTIONS.
    pub fn allows_preflight(&self, path: &str) -> bool {
        self.mutation.matcher.resolve(path).is_some()
    }

    /// Number of actions in `class`.
    pub fn len(&self, class: MethodClass) -> usize {
        self.table(class).actions.len()
    }

    /// Templates registered for `class`.
    pub fn templates(&self, class: MethodClass) -> Vec<&'static str> {
        self.table(class).matcher.templates().collect()
    }
}
