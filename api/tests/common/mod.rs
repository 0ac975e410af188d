#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use blog_api::{
    AppState, app,
    auth::create_token,
    config::Config,
    models::{Author, Group},
};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

pub fn test_config() -> Config {
    Config {
        jwt_secret: SECRET.into(),
        bcrypt_cost: 4,
        ..Config::default()
    }
}

pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            state: AppState::new(config),
        }
    }

    pub fn router(&self) -> Router {
        app(self.state.clone())
    }

    pub fn author(&self, username: &str) -> Author {
        self.state
            .store
            .create_author(
                format!("{}@example.com", username.to_lowercase()),
                username.into(),
                "not-a-real-hash".into(),
            )
            .unwrap()
    }

    pub fn token(&self, author: &Author) -> String {
        create_token(&author.id, &author.email, SECRET).unwrap()
    }

    pub fn group(&self, title: &str, slug: &str) -> Group {
        self.state
            .store
            .create_group(title.into(), slug.into(), String::new())
            .unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> Response<Body> {
        self.post_raw(uri, token, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, token: Option<&str>, body: String) -> Response<Body> {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(request.body(Body::from(body)).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    to_bytes(response.into_body(), usize::MAX).await.unwrap()
}

pub async fn body_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

/// Asserts a 303 and returns where it points
pub fn redirect_location(response: &Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

pub fn login_location(next: &str) -> String {
    format!("/auth/login?next={}", urlencoding::encode(next))
}
