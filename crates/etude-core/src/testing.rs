use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};

use crate::app::App;
use crate::http::Request;

/// Drives an [`App`] in-process, without a socket.
///
/// ```rust
/// use etude_core::{Engine, TestClient};
/// use http::StatusCode;
///
/// let mut engine = Engine::new();
/// engine.get("/ping", |c| c.string(StatusCode::OK, "pong"));
/// let client = TestClient::new(engine.build());
///
/// let res = client.get("/ping");
/// assert_eq!(res.status, 200);
/// assert_eq!(res.body, "pong");
/// ```
#[derive(Clone)]
pub struct TestClient {
    app: App,
}

impl TestClient {
    pub fn new(app: App) -> Self {
        TestClient { app }
    }

    /// Send a GET request. `target` may carry a `?query`.
    pub fn get(&self, target: &str) -> TestResponse {
        self.request(Request::from_target(Method::GET, target))
    }

    /// Send a form-encoded POST request.
    pub fn post_form(&self, target: &str, body: &str) -> TestResponse {
        let req = Request::from_target(Method::POST, target)
            .with_header(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            )
            .with_body(body.to_string());
        self.request(req)
    }

    /// Send a POST request with a raw body.
    pub fn post(&self, target: &str, body: &str) -> TestResponse {
        self.request(Request::from_target(Method::POST, target).with_body(body.to_string()))
    }

    pub fn request(&self, req: Request) -> TestResponse {
        let (status, headers, body) = self.app.handle(req).into_parts();
        TestResponse {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
            headers,
        }
    }
}

/// Response captured by [`TestClient`].
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub body: String,
    pub headers: HeaderMap,
}

impl TestResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }

    pub fn header(&self, name: HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
