//! Local HTTP server that answers one POST route with a canned response.

use actix_web::{dev::ServerHandle, http::StatusCode, web, App, HttpResponse, HttpServer};
use std::net::TcpListener;

pub(crate) struct FakeProvider {
    pub base_url: String,
    handle: ServerHandle,
}

impl FakeProvider {
    /// Must be called from inside an actix runtime (`#[actix_web::test]`).
    pub(crate) fn start(path: &'static str, status: u16, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
        let port = listener.local_addr().expect("local address").port();
        let status = StatusCode::from_u16(status).expect("valid status code");

        let server = HttpServer::new(move || {
            App::new().route(
                path,
                web::post().to(move || async move {
                    HttpResponse::build(status)
                        .content_type("application/json")
                        .body(body)
                }),
            )
        })
        .workers(1)
        .listen(listener)
        .expect("listen on local port")
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://127.0.0.1:{}/v1", port),
            handle,
        }
    }

    pub(crate) async fn stop(self) {
        self.handle.stop(false).await;
    }
}
