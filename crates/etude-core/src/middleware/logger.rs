use std::time::Instant;

use crate::context::{handler, Context, HandlerFunc};

/// Log status, request URI and elapsed time once the rest of the pipeline
/// has returned.
pub fn logger() -> HandlerFunc {
    handler(|c: &mut Context| {
        let start = Instant::now();
        c.next();
        tracing::info!(
            status = c.response().status().as_u16(),
            method = %c.method(),
            uri = %c.req.request_uri(),
            elapsed = ?start.elapsed(),
            "request completed"
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Request;
    use http::{Method, StatusCode};

    #[test]
    fn test_logger_is_transparent() {
        let teapot = handler(|c: &mut Context| c.string(StatusCode::IM_A_TEAPOT, "short and stout"));
        let mut ctx = Context::new(Request::new(Method::GET, "/tea"), vec![logger(), teapot]);
        ctx.next();
        let res = ctx.into_response();
        assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(res.body(), b"short and stout");
    }
}
