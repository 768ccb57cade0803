//! Per-request context and the cursor that drives the middleware pipeline.
//!
//! A [`Context`] is built for one request and dropped once its response is
//! handed back to the transport. It owns the ordered list of stages (scope
//! middleware followed by the route handler) and a forward-only cursor.
//!
//! ## Onion ordering
//!
//! Each stage decides where the rest of the pipeline runs by calling
//! [`Context::next`]. Code before that call runs outer-to-inner, code after
//! it runs inner-to-outer:
//!
//! ```rust
//! use etude_core::{handler, Context, Request};
//! use http::{Method, StatusCode};
//!
//! let timing = handler(|c: &mut Context| {
//!     // before
//!     c.next();
//!     // after: the handler has already written the response
//!     assert_eq!(c.response().status(), StatusCode::OK);
//! });
//! let hello = handler(|c: &mut Context| c.string(StatusCode::OK, "hello"));
//!
//! let mut ctx = Context::new(Request::new(Method::GET, "/"), vec![timing, hello]);
//! ctx.next();
//! assert_eq!(ctx.response().body(), b"hello");
//! ```
//!
//! A stage that returns without calling `next` ends the pipeline there.

use std::collections::HashMap;
use std::sync::Arc;

use http::header::{self, HeaderValue, IntoHeaderName};
use http::{Method, StatusCode};
use serde::Serialize;

use crate::error::ErrorBody;
use crate::http::{Request, Response};

/// A middleware or route handler. Both share this shape.
pub type HandlerFunc = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// Named path parameters extracted from the matched pattern.
pub type Params = HashMap<String, String>;

/// Wrap a closure or fn item as a [`HandlerFunc`].
pub fn handler<F>(f: F) -> HandlerFunc
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Where the cursor stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing has run yet.
    Pending,
    /// A stage is executing (or waiting on its downstream `next`).
    Running,
    /// The cursor reached the end and will not advance again.
    Done,
}

pub struct Context {
    pub req: Request,
    res: Response,
    params: Params,
    handlers: Vec<HandlerFunc>,
    /// `None` before the first stage, `Some(handlers.len())` once done.
    cursor: Option<usize>,
}

impl Context {
    pub fn new(req: Request, handlers: Vec<HandlerFunc>) -> Self {
        Self {
            req,
            res: Response::new(),
            params: Params::new(),
            handlers,
            cursor: None,
        }
    }

    pub(crate) fn push_handler(&mut self, handler: HandlerFunc) {
        self.handlers.push(handler);
    }

    pub(crate) fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Discard a partially written response so a fresh one can be written.
    pub(crate) fn reset_response(&mut self) {
        self.res.reset();
    }

    // ═══ Pipeline ═══

    /// Run the next stage. Returns once that stage, and everything it
    /// advanced into, has returned.
    pub fn next(&mut self) {
        let len = self.handlers.len();
        let position = self.cursor.map_or(0, |i| i + 1);
        if position >= len {
            self.cursor = Some(len);
            return;
        }

        self.cursor = Some(position);
        let stage = Arc::clone(&self.handlers[position]);
        (*stage)(self);
        // Downstream has finished (or was never entered); never re-enter it.
        self.cursor = Some(len);
    }

    /// Stop the pipeline and answer with `{"message": ...}` right away.
    pub fn fail(&mut self, code: StatusCode, message: impl Into<String>) {
        self.cursor = Some(self.handlers.len());
        self.json(code, &ErrorBody::new(message));
    }

    pub fn state(&self) -> PipelineState {
        match self.cursor {
            None => PipelineState::Pending,
            Some(i) if i >= self.handlers.len() => PipelineState::Done,
            Some(_) => PipelineState::Running,
        }
    }

    // ═══ Request accessors ═══

    pub fn method(&self) -> &Method {
        &self.req.method
    }

    pub fn path(&self) -> &str {
        &self.req.path
    }

    /// Path parameter by name; empty when the pattern has no such name.
    pub fn param(&self, key: &str) -> &str {
        self.params.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn query(&self, key: &str) -> Option<String> {
        let raw = self.req.query.as_deref()?;
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw).ok()?;
        pairs.into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Field of an `application/x-www-form-urlencoded` body.
    pub fn post_form(&self, key: &str) -> Option<String> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&self.req.body).ok()?;
        pairs.into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.req.headers.get(name).and_then(|v| v.to_str().ok())
    }

    // ═══ Response writers ═══

    pub fn status(&mut self, code: StatusCode) {
        self.res.write_status(code);
    }

    pub fn set_header<K: IntoHeaderName>(&mut self, name: K, value: &str) {
        match HeaderValue::from_str(value) {
            Ok(v) => {
                self.res.headers_mut().insert(name, v);
            }
            Err(_) => tracing::warn!(value, "dropping invalid header value"),
        }
    }

    pub fn string(&mut self, code: StatusCode, body: impl AsRef<str>) {
        self.set_header(header::CONTENT_TYPE, "text/plain; charset=utf-8");
        self.status(code);
        self.res.write(body.as_ref().as_bytes());
    }

    pub fn json<T: Serialize + ?Sized>(&mut self, code: StatusCode, obj: &T) {
        match serde_json::to_vec(obj) {
            Ok(bytes) => {
                self.set_header(header::CONTENT_TYPE, "application/json");
                self.status(code);
                self.res.write(&bytes);
            }
            Err(e) => {
                tracing::error!(error = %e, path = %self.req.path, "failed to encode JSON response");
                self.string(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
            }
        }
    }

    pub fn data(&mut self, code: StatusCode, data: &[u8]) {
        self.status(code);
        self.res.write(data);
    }

    pub fn html(&mut self, code: StatusCode, html: impl AsRef<str>) {
        self.set_header(header::CONTENT_TYPE, "text/html; charset=utf-8");
        self.status(code);
        self.res.write(html.as_ref().as_bytes());
    }

    pub fn response(&self) -> &Response {
        &self.res
    }

    pub fn into_response(self) -> Response {
        self.res
    }
}
