use std::net::SocketAddr;
use std::time::Duration;

use etude_core::Engine;
use http::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

async fn spawn_app() -> (SocketAddr, oneshot::Sender<()>) {
    let mut engine = Engine::with_defaults();
    engine.max_body_size(16);
    engine.post("/echo", |c| {
        let body = c.req.body.clone();
        c.data(StatusCode::OK, &body);
    });
    engine.get("/files/*filepath", |c| {
        let file = c.param("filepath").to_string();
        c.string(StatusCode::OK, file);
    });
    engine.get("/panic", |_| panic!("boom"));
    let app = engine.build();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        app.run_until(listener, async {
            let _ = rx.await;
        })
        .await
        .unwrap();
    });
    (addr, tx)
}

async fn raw_get(addr: SocketAddr, target: &str) -> String {
    let req = format!("GET {target} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    raw_request(addr, req).await
}

async fn raw_post(addr: SocketAddr, target: &str, body: &str) -> String {
    let req = format!(
        "POST {target} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    raw_request(addr, req).await
}

async fn raw_request(addr: SocketAddr, req: String) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(req.as_bytes()).await.unwrap();

    let mut buf = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut buf))
        .await
        .unwrap()
        .unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

#[tokio::test]
async fn test_serves_wildcard_with_decoded_path() {
    let (addr, _shutdown) = spawn_app().await;

    let res = raw_get(addr, "/files/docs/hello%20world.txt").await;
    assert!(res.starts_with("HTTP/1.1 200 OK"), "{res}");
    assert!(res.to_ascii_lowercase().contains("server: etude"));
    assert!(res.to_ascii_lowercase().contains("date: "));
    assert!(res.ends_with("docs/hello world.txt"));
}

#[tokio::test]
async fn test_not_found_over_the_wire() {
    let (addr, _shutdown) = spawn_app().await;

    let res = raw_get(addr, "/unknown").await;
    assert!(res.starts_with("HTTP/1.1 404 Not Found"), "{res}");
    assert!(res.ends_with("404 NOT FOUND: /unknown\n"));
}

#[tokio::test]
async fn test_panic_is_500_and_server_keeps_serving() {
    let (addr, _shutdown) = spawn_app().await;

    let res = raw_get(addr, "/panic").await;
    assert!(res.starts_with("HTTP/1.1 500 Internal Server Error"), "{res}");

    let res = raw_get(addr, "/files/a").await;
    assert!(res.starts_with("HTTP/1.1 200 OK"), "{res}");
}

#[tokio::test]
async fn test_body_over_limit_is_413() {
    let (addr, _shutdown) = spawn_app().await;

    let res = raw_post(addr, "/echo", "small").await;
    assert!(res.starts_with("HTTP/1.1 200 OK"), "{res}");
    assert!(res.ends_with("small"));

    let res = raw_post(addr, "/echo", &"x".repeat(64)).await;
    assert!(res.starts_with("HTTP/1.1 413 Payload Too Large"), "{res}");
}
