//! # Etude
//!
//! The dispatch core of a small HTTP framework: a per-method segment trie
//! for `:param` and `*wildcard` routes, route groups with prefix-scoped
//! middleware, and an onion-style pipeline driven by [`Context::next`]
//! with a single panic boundary in [`middleware::recovery`].
//!
//! ```rust
//! use etude_core::{Engine, TestClient};
//! use http::StatusCode;
//!
//! let mut engine = Engine::with_defaults();
//! engine.get("/assets/*filepath", |c| {
//!     let file = c.param("filepath").to_string();
//!     c.json(StatusCode::OK, &serde_json::json!({ "filepath": file }));
//! });
//! let client = TestClient::new(engine.build());
//!
//! let res = client.get("/assets/css/a.css");
//! assert_eq!(res.json()["filepath"], "css/a.css");
//! assert_eq!(client.get("/unknown").status, 404);
//! ```

pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod group;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod segment;
pub mod server;
pub mod testing;
mod trie;

pub use app::{App, Engine, DEFAULT_MAX_BODY_SIZE};
pub use config::{Config, LogFormat};
pub use context::{handler, Context, HandlerFunc, Params, PipelineState};
pub use error::{ErrorBody, EtudeError, EtudeResult};
pub use group::RouterGroup;
pub use crate::http::{Request, Response};
pub use router::{RouteMatch, Router};
pub use testing::{TestClient, TestResponse};
