use http::Method;

use crate::app::Engine;
use crate::context::{Context, HandlerFunc};

/// A routing scope recorded by the engine.
pub(crate) struct Scope {
    /// Full prefix, parent prefixes included.
    pub(crate) prefix: String,
    /// Index of the enclosing scope. Only read for diagnostics.
    pub(crate) parent: Option<usize>,
    pub(crate) middlewares: Vec<HandlerFunc>,
}

impl Scope {
    pub(crate) fn root() -> Self {
        Self {
            prefix: String::new(),
            parent: None,
            middlewares: Vec::new(),
        }
    }
}

/// Registration handle onto one scope of an [`Engine`].
///
/// Routes registered through the handle get the scope's prefix prepended.
/// Middleware added with [`use_middleware`](Self::use_middleware) runs for
/// every request whose path starts with that prefix, matched as plain text
/// against the request path, whether or not a route matches.
///
/// ```rust
/// use etude_core::{Engine, middleware::logger};
/// use http::StatusCode;
///
/// let mut engine = Engine::new();
/// {
///     let mut v1 = engine.group("/v1");
///     v1.use_middleware(logger());
///     v1.get("/hello/:name", |c| {
///         let msg = format!("hello {}", c.param("name"));
///         c.string(StatusCode::OK, msg);
///     });
/// }
/// let app = engine.build();
/// assert!(app.router().resolve(&http::Method::GET, "/v1/hello/etude").is_ok());
/// ```
pub struct RouterGroup<'e> {
    engine: &'e mut Engine,
    index: usize,
}

impl<'e> RouterGroup<'e> {
    pub(crate) fn new(engine: &'e mut Engine, index: usize) -> Self {
        Self { engine, index }
    }

    fn scope(&self) -> &Scope {
        &self.engine.scopes[self.index]
    }

    pub fn prefix(&self) -> &str {
        &self.scope().prefix
    }

    /// Prefix of the enclosing scope; `None` for the root scope.
    pub fn parent_prefix(&self) -> Option<&str> {
        self.scope()
            .parent
            .map(|p| self.engine.scopes[p].prefix.as_str())
    }

    /// Open a nested scope. Its prefix is this scope's prefix followed by
    /// `prefix`.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let full = format!("{}{}", self.prefix(), prefix);
        tracing::debug!(
            prefix = %full,
            parent = %self.prefix(),
            "route group created"
        );
        self.engine.scopes.push(Scope {
            prefix: full,
            parent: Some(self.index),
            middlewares: Vec::new(),
        });
        let index = self.engine.scopes.len() - 1;
        RouterGroup::new(&mut *self.engine, index)
    }

    pub fn use_middleware(&mut self, middleware: HandlerFunc) -> &mut Self {
        self.engine.scopes[self.index].middlewares.push(middleware);
        self
    }

    pub fn add_route(&mut self, method: Method, comp: &str, handler: HandlerFunc) -> &mut Self {
        let pattern = format!("{}{}", self.prefix(), comp);
        tracing::info!("Route {:>4} - {}", method, pattern);
        self.engine.router.add_route(method, &pattern, handler);
        self
    }

    pub fn get<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::GET, pattern, crate::context::handler(handler))
    }

    pub fn post<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::POST, pattern, crate::context::handler(handler))
    }

    pub fn put<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, pattern, crate::context::handler(handler))
    }

    pub fn delete<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, pattern, crate::context::handler(handler))
    }

    pub fn patch<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::PATCH, pattern, crate::context::handler(handler))
    }

    pub fn head<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::HEAD, pattern, crate::context::handler(handler))
    }

    pub fn options<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::OPTIONS, pattern, crate::context::handler(handler))
    }
}
