//! Registration phase ([`Engine`]) and serving phase ([`App`]).
//!
//! All routes and middleware are registered on an `Engine`. Calling
//! [`Engine::build`] consumes it and produces an [`App`]: an immutable,
//! cheaply cloneable table that can be shared across any number of
//! concurrent requests. `App` has no registration methods, so the route
//! table cannot change once serving starts.
//!
//! ```rust
//! use etude_core::{Engine, Request};
//! use http::{Method, StatusCode};
//!
//! let mut engine = Engine::with_defaults();
//! engine.get("/p/:lang/doc", |c| {
//!     let lang = c.param("lang").to_string();
//!     c.string(StatusCode::OK, lang);
//! });
//! let app = engine.build();
//!
//! let res = app.handle(Request::new(Method::GET, "/p/go/doc"));
//! assert_eq!(res.status(), StatusCode::OK);
//! assert_eq!(res.body(), b"go");
//! ```

use std::sync::Arc;

use http::Method;

use crate::context::{Context, HandlerFunc};
use crate::group::{RouterGroup, Scope};
use crate::http::{Request, Response};
use crate::middleware::{logger, recovery};
use crate::router::Router;

/// Request bodies above this size are refused with `413` by the transport.
pub const DEFAULT_MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Route table under construction.
pub struct Engine {
    pub(crate) router: Router,
    /// Creation order; parents always precede their children.
    pub(crate) scopes: Vec<Scope>,
    max_body_size: usize,
}

impl Engine {
    /// An engine with no middleware.
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            scopes: vec![Scope::root()],
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// An engine whose root scope runs [`logger`] then [`recovery`].
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.use_middleware(logger()).use_middleware(recovery());
        engine
    }

    /// Largest request body the transport will buffer, in bytes.
    pub fn max_body_size(&mut self, bytes: usize) -> &mut Self {
        self.max_body_size = bytes;
        self
    }

    fn root(&mut self) -> RouterGroup<'_> {
        RouterGroup::new(self, 0)
    }

    /// Open a top-level scope.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        self.scopes.push(Scope {
            prefix: prefix.to_string(),
            parent: Some(0),
            middlewares: Vec::new(),
        });
        tracing::debug!(prefix, "route group created");
        let index = self.scopes.len() - 1;
        RouterGroup::new(self, index)
    }

    pub fn use_middleware(&mut self, middleware: HandlerFunc) -> &mut Self {
        self.root().use_middleware(middleware);
        self
    }

    pub fn add_route(&mut self, method: Method, pattern: &str, handler: HandlerFunc) -> &mut Self {
        self.root().add_route(method, pattern, handler);
        self
    }

    pub fn get<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.root().get(pattern, handler);
        self
    }

    pub fn post<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.root().post(pattern, handler);
        self
    }

    pub fn put<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.root().put(pattern, handler);
        self
    }

    pub fn delete<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.root().delete(pattern, handler);
        self
    }

    pub fn patch<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.root().patch(pattern, handler);
        self
    }

    pub fn head<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.root().head(pattern, handler);
        self
    }

    pub fn options<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.root().options(pattern, handler);
        self
    }

    /// Seal the route table.
    pub fn build(self) -> App {
        let scopes = self
            .scopes
            .into_iter()
            .map(|s| SealedScope {
                prefix: s.prefix,
                middlewares: s.middlewares,
            })
            .collect();
        tracing::debug!(routes = self.router.routes().len(), "route table sealed");
        App {
            inner: Arc::new(AppInner {
                router: self.router,
                scopes,
                max_body_size: self.max_body_size,
            }),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for scope in &self.scopes {
            let parent = scope.parent.map(|p| self.scopes[p].prefix.as_str());
            list.entry(&format_args!(
                "{:?} (parent: {:?}, middlewares: {})",
                scope.prefix,
                parent,
                scope.middlewares.len()
            ));
        }
        list.finish()
    }
}

struct SealedScope {
    prefix: String,
    middlewares: Vec<HandlerFunc>,
}

struct AppInner {
    router: Router,
    scopes: Vec<SealedScope>,
    max_body_size: usize,
}

/// Sealed route table, ready to dispatch.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

impl App {
    /// Run one request through its pipeline and return the response.
    ///
    /// The pipeline is every matching scope's middleware, outer scope first
    /// and in registration order, followed by the route handler (or a 404
    /// writer when nothing matches).
    pub fn handle(&self, req: Request) -> Response {
        let middlewares: Vec<HandlerFunc> = self
            .inner
            .scopes
            .iter()
            .filter(|scope| req.path.starts_with(&scope.prefix))
            .flat_map(|scope| scope.middlewares.iter().cloned())
            .collect();

        let mut ctx = Context::new(req, middlewares);
        self.inner.router.handle(&mut ctx);
        ctx.into_response()
    }

    pub fn router(&self) -> &Router {
        &self.inner.router
    }

    pub fn routes(&self) -> Vec<(Method, String)> {
        self.inner.router.routes()
    }

    pub fn max_body_size(&self) -> usize {
        self.inner.max_body_size
    }
}
