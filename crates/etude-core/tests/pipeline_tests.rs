use std::sync::{Arc, Mutex};

use etude_core::{handler, Context, Engine, HandlerFunc, TestClient};
use http::StatusCode;

type Trace = Arc<Mutex<Vec<String>>>;

fn around(trace: &Trace, name: &'static str) -> HandlerFunc {
    let trace = Arc::clone(trace);
    handler(move |c: &mut Context| {
        trace.lock().unwrap().push(format!("{name}-before"));
        c.next();
        trace.lock().unwrap().push(format!("{name}-after"));
    })
}

fn taken(trace: &Trace) -> Vec<String> {
    std::mem::take(&mut *trace.lock().unwrap())
}

#[test]
fn test_onion_order_through_engine() {
    let trace: Trace = Arc::default();
    let mut engine = Engine::new();
    engine
        .use_middleware(around(&trace, "A"))
        .use_middleware(around(&trace, "B"));
    {
        let trace = Arc::clone(&trace);
        engine.get("/", move |c| {
            trace.lock().unwrap().push("H".to_string());
            c.string(StatusCode::OK, "ok");
        });
    }
    let client = TestClient::new(engine.build());

    assert_eq!(client.get("/").status, 200);
    assert_eq!(
        taken(&trace),
        vec!["A-before", "B-before", "H", "B-after", "A-after"]
    );
}

#[test]
fn test_middleware_wraps_not_found() {
    let trace: Trace = Arc::default();
    let mut engine = Engine::new();
    engine.use_middleware(around(&trace, "A"));
    let client = TestClient::new(engine.build());

    assert_eq!(client.get("/nowhere").status, 404);
    assert_eq!(taken(&trace), vec!["A-before", "A-after"]);
}

#[test]
fn test_short_circuit_skips_handler() {
    let trace: Trace = Arc::default();
    let mut engine = Engine::new();
    engine.use_middleware(around(&trace, "A"));
    engine.use_middleware(handler(|c: &mut Context| {
        if c.header("authorization").is_none() {
            c.fail(StatusCode::UNAUTHORIZED, "missing credentials");
            return;
        }
        c.next();
    }));
    {
        let trace = Arc::clone(&trace);
        engine.get("/secret", move |c| {
            trace.lock().unwrap().push("H".to_string());
            c.string(StatusCode::OK, "secret");
        });
    }
    let client = TestClient::new(engine.build());

    let res = client.get("/secret");
    assert_eq!(res.status, 401);
    assert_eq!(res.json()["message"], "missing credentials");
    assert_eq!(taken(&trace), vec!["A-before", "A-after"]);

    let authed = client.request(
        etude_core::Request::new(http::Method::GET, "/secret").with_header(
            http::header::AUTHORIZATION,
            http::HeaderValue::from_static("Bearer t"),
        ),
    );
    assert_eq!(authed.status, 200);
    assert_eq!(authed.body, "secret");
    assert_eq!(taken(&trace), vec!["A-before", "H", "A-after"]);
}

#[test]
fn test_after_phase_sees_response() {
    let mut engine = Engine::new();
    engine.use_middleware(handler(|c: &mut Context| {
        c.next();
        let code = c.response().status().as_u16().to_string();
        c.set_header("x-observed-status", &code);
    }));
    engine.post("/items", |c| c.string(StatusCode::CREATED, "made"));
    let client = TestClient::new(engine.build());

    let res = client.post("/items", "");
    assert_eq!(res.status, 201);
    assert_eq!(res.header(http::HeaderName::from_static("x-observed-status")), Some("201"));
}

#[test]
fn test_post_form_in_handler() {
    let mut engine = Engine::new();
    engine.post("/login", |c| {
        let body = serde_json::json!({
            "username": c.post_form("username"),
            "password": c.post_form("password"),
        });
        c.json(StatusCode::OK, &body);
    });
    let client = TestClient::new(engine.build());

    let res = client.post_form("/login", "username=ada&password=1234");
    assert_eq!(res.status, 200);
    assert_eq!(res.header(http::header::CONTENT_TYPE), Some("application/json"));
    let json = res.json();
    assert_eq!(json["username"], "ada");
    assert_eq!(json["password"], "1234");
}
