//! 核心中间件模块

use axum::{
    extract::{OriginalUri, Request},
    http::{Method, StatusCode, Uri},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::info;

/// 在 drop 时写日志，处理器 panic 或请求被取消时也会记录耗时
struct RequestTimer {
    method: Method,
    uri: Uri,
    status: Option<StatusCode>,
    start: Instant,
}

impl RequestTimer {
    fn start(req: &Request) -> Self {
        // 嵌套路由会裁掉前缀，优先使用原始 URI
        let uri = req
            .extensions()
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| req.uri().clone());

        Self {
            method: req.method().clone(),
            uri,
            status: None,
            start: Instant::now(),
        }
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        match self.status {
            Some(status) => info!(
                "{} {} - {} - took {:?}",
                self.method, self.uri, status, duration
            ),
            None => info!(
                "{} {} - incomplete - took {:?}",
                self.method, self.uri, duration
            ),
        }
    }
}

/// 请求日志中间件
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let mut timer = RequestTimer::start(&req);
    let response = next.run(req).await;
    timer.status = Some(response.status());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http, middleware,
        routing::get,
        Router,
    };
    use std::{
        io,
        sync::{Arc, Mutex},
    };
    use tower::ServiceExt;

    /// 收集日志输出的缓冲区
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn install(&self) -> tracing::subscriber::DefaultGuard {
            let writer = self.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(move || writer.clone())
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    async fn teapot() -> (StatusCode, [(&'static str, &'static str); 1], &'static str) {
        (StatusCode::IM_A_TEAPOT, [("x-brew", "oolong")], "short and stout")
    }

    async fn explode() -> &'static str {
        panic!("handler exploded")
    }

    fn app() -> Router {
        Router::new()
            .route("/teapot", get(teapot))
            .route("/panic", get(explode))
            .layer(middleware::from_fn(request_logging_middleware))
    }

    #[tokio::test]
    async fn test_response_passes_through_unchanged() {
        let response = app()
            .oneshot(http::Request::get("/teapot?cups=2").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.headers()["x-brew"], "oolong");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"short and stout");
    }

    #[tokio::test]
    async fn test_logs_method_full_uri_status_and_duration() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let response = app()
            .oneshot(http::Request::get("/teapot?cups=2").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);

        let output = logs.contents();
        let line = output
            .lines()
            .find(|line| line.contains("GET /teapot?cups=2 - 418"))
            .unwrap_or_else(|| panic!("no request line in:\n{output}"));
        assert!(line.contains("took"), "{line}");
    }

    #[tokio::test]
    #[should_panic(expected = "handler exploded")]
    async fn test_panics_are_not_swallowed() {
        let _ = app()
            .oneshot(http::Request::get("/panic").body(Body::empty()).unwrap())
            .await;
    }

    // 单线程运行时下任务在当前线程执行，线程内的默认 subscriber 对它生效
    #[tokio::test]
    async fn test_logs_incomplete_request_when_handler_panics() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let task = tokio::spawn(
            app().oneshot(http::Request::get("/panic").body(Body::empty()).unwrap()),
        );
        let err = task.await.unwrap_err();
        assert!(err.is_panic());

        let output = logs.contents();
        let line = output
            .lines()
            .find(|line| line.contains("GET /panic - incomplete"))
            .unwrap_or_else(|| panic!("no request line in:\n{output}"));
        assert!(line.contains("took"), "{line}");
    }

    #[tokio::test]
    async fn test_uses_original_uri_inside_nested_router() {
        let req = {
            let mut req = http::Request::get("/42?full=1").body(Body::empty()).unwrap();
            req.extensions_mut()
                .insert(OriginalUri("/api/users/42?full=1".parse().unwrap()));
            req
        };
        let timer = RequestTimer::start(&req);
        assert_eq!(timer.uri, "/api/users/42?full=1");
        assert_eq!(timer.method, Method::GET);
    }
}
