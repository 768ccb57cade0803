// Method-keyed route table: one segment trie per method plus the handler
// bound to every registered (method, pattern).

use std::collections::HashMap;

use http::{Method, StatusCode};

use crate::context::{handler, Context, HandlerFunc, Params};
use crate::error::{EtudeError, EtudeResult};
use crate::segment::{split, Segment};
use crate::trie::Node;

/// A successful lookup: the registered pattern and the values bound to its
/// `:param` / `*wildcard` names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'r> {
    pub pattern: &'r str,
    pub params: Params,
}

#[derive(Default)]
pub struct Router {
    roots: HashMap<Method, Node>,
    handlers: HashMap<(Method, String), HandlerFunc>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` + `pattern`.
    ///
    /// Registering the same pair again keeps the trie as it is and replaces
    /// the handler.
    pub fn add_route(&mut self, method: Method, pattern: &str, handler: HandlerFunc) {
        let parts = split(pattern);
        self.roots
            .entry(method.clone())
            .or_default()
            .insert(pattern, &parts, 0);

        if self
            .handlers
            .insert((method.clone(), pattern.to_string()), handler)
            .is_some()
        {
            tracing::debug!(%method, pattern, "replacing previously registered handler");
        }
    }

    /// Find the pattern matching `path` under `method` and bind its parameters.
    pub fn resolve(&self, method: &Method, path: &str) -> EtudeResult<RouteMatch<'_>> {
        let not_found = || EtudeError::RouteNotFound {
            method: method.clone(),
            path: path.to_string(),
        };

        let root = self.roots.get(method).ok_or_else(not_found)?;
        let search_parts = split(path);
        let pattern = root
            .search(&search_parts, 0)
            .and_then(Node::pattern)
            .ok_or_else(not_found)?;

        let mut params = Params::new();
        for (index, part) in split(pattern).into_iter().enumerate() {
            match Segment::parse(part) {
                Segment::Param(name) => {
                    if let Some(value) = search_parts.get(index) {
                        params.insert(name.to_string(), (*value).to_string());
                    }
                }
                Segment::Wildcard(name) => {
                    if !name.is_empty() {
                        let rest = search_parts.get(index..).unwrap_or_default();
                        params.insert(name.to_string(), rest.join("/"));
                    }
                    break;
                }
                Segment::Literal(_) => {}
            }
        }

        Ok(RouteMatch { pattern, params })
    }

    /// Handler bound to an exact registration, if any.
    pub fn handler(&self, method: &Method, pattern: &str) -> Option<&HandlerFunc> {
        self.handlers.get(&(method.clone(), pattern.to_string()))
    }

    /// Registered `(method, pattern)` pairs, grouped by method.
    pub fn routes(&self) -> Vec<(Method, String)> {
        let mut routes: Vec<(Method, String)> = self
            .roots
            .iter()
            .flat_map(|(method, root)| {
                root.patterns()
                    .into_iter()
                    .map(move |p| (method.clone(), p.to_string()))
            })
            .collect();
        routes.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()).then_with(|| a.1.cmp(&b.1)));
        routes
    }

    /// Resolve the context's request, queue the matching handler (or a 404
    /// writer) behind the middleware already in the context, and start the
    /// pipeline.
    pub fn handle(&self, ctx: &mut Context) {
        match self.resolve(ctx.method(), ctx.path()) {
            Ok(RouteMatch { pattern, params }) => {
                let key = (ctx.method().clone(), pattern.to_string());
                match self.handlers.get(&key) {
                    Some(h) => {
                        ctx.set_params(params);
                        ctx.push_handler(HandlerFunc::clone(h));
                    }
                    None => ctx.push_handler(not_found()),
                }
            }
            Err(err) => {
                tracing::debug!(%err, "no route");
                ctx.push_handler(not_found());
            }
        }
        ctx.next();
    }
}

fn not_found() -> HandlerFunc {
    handler(|c: &mut Context| {
        let body = format!("404 NOT FOUND: {}\n", c.path());
        c.string(StatusCode::NOT_FOUND, body);
    })
}
