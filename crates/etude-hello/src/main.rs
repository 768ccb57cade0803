//! # Etude Hello
//!
//! Route groups, scoped middleware, params, wildcards and panic recovery in
//! one small server.
//!
//! ## Run
//!
//! ```bash
//! SERVER_PORT=9999 cargo run -p etude-hello
//! ```
//!
//! ## Endpoints
//!
//! - `GET /` - HTML index
//! - `GET /assets/*filepath` - echoes the wildcard capture as JSON
//! - `GET /v1/hello?name=..` - query parameter
//! - `GET /v2/hello/:name` - path parameter, behind a v2-only timing stage
//! - `POST /v2/login` - form fields echoed as JSON
//! - `GET /panic` - index out of range, recovered into a 500

use std::time::Instant;

use etude_core::{handler, logging, Config, Context, Engine, EtudeResult};
use http::StatusCode;
use serde_json::json;

fn only_for_v2() -> etude_core::HandlerFunc {
    handler(|c: &mut Context| {
        let start = Instant::now();
        c.next();
        tracing::info!(
            status = c.response().status().as_u16(),
            uri = %c.req.request_uri(),
            elapsed = ?start.elapsed(),
            "v2 group"
        );
    })
}

#[tokio::main]
async fn main() -> EtudeResult<()> {
    let config = Config::from_env()?;
    logging::init_logging_from_config(&config);

    let mut engine = Engine::with_defaults();
    engine.get("/", |c| c.html(StatusCode::OK, "<h1>Hello Etude</h1>"));
    engine.get("/assets/*filepath", |c| {
        let body = json!({ "filepath": c.param("filepath") });
        c.json(StatusCode::OK, &body);
    });
    engine.get("/panic", |c| {
        let names = vec!["etude".to_string()];
        let name = names[100].clone();
        c.string(StatusCode::OK, name);
    });

    {
        let mut v1 = engine.group("/v1");
        v1.get("/hello", |c| {
            let name = c.query("name").unwrap_or_default();
            let body = format!("hello {}, you're at {}\n", name, c.path());
            c.string(StatusCode::OK, body);
        });
    }
    {
        let mut v2 = engine.group("/v2");
        v2.use_middleware(only_for_v2());
        v2.get("/hello/:name", |c| {
            let body = format!("hello {}, you're at {}\n", c.param("name"), c.path());
            c.string(StatusCode::OK, body);
        });
        v2.post("/login", |c| {
            let body = json!({
                "username": c.post_form("username"),
                "password": c.post_form("password"),
            });
            c.json(StatusCode::OK, &body);
        });
    }

    engine.build().run_with_config(&config).await
}
