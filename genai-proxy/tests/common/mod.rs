#![allow(dead_code)]

use genai_proxy::config::{
    CorsConfig, GoogleConfig, PromptDefaults, ProxyConfig, UploadConfig,
    DEFAULT_MAX_UPLOAD_BYTES,
};
use genai_proxy::startup::Application;
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "gemini-2.5-flash";
pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

pub fn test_config(upstream: &MockServer) -> ProxyConfig {
    ProxyConfig {
        common: CoreConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0, // Random port
        },
        google: GoogleConfig {
            api_key: Secret::new(TEST_API_KEY.to_string()),
            model: TEST_MODEL.to_string(),
            api_base: format!("{}/v1beta", upstream.uri()),
        },
        cors: CorsConfig {
            allowed_origins: vec![ALLOWED_ORIGIN.to_string()],
            enforce: true,
        },
        uploads: UploadConfig {
            max_file_size_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        },
        prompts: PromptDefaults::default(),
    }
}

/// Gemini `generateContent` response carrying `text`.
pub fn gemini_text(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 3, "candidatesTokenCount": 1 }
    })
}

pub fn gemini_overloaded() -> ResponseTemplate {
    ResponseTemplate::new(503).set_body_json(json!({
        "error": {
            "code": 503,
            "message": "The model is overloaded. Please try again later.",
            "status": "UNAVAILABLE"
        }
    }))
}

/// Mock that answers every generation call with `text`.
pub fn generate_replying(text: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text(text)))
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
    pub upstream: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let upstream = MockServer::start().await;
        let config = test_config(&upstream);
        Self::spawn_with(config, upstream).await
    }

    pub async fn spawn_with(config: ProxyConfig, upstream: MockServer) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling the root endpoint
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(&address).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
            upstream,
        }
    }

    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.address, route)
    }

    pub async fn post_json(&self, route: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(route))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_form(
        &self,
        route: &str,
        form: reqwest::multipart::Form,
    ) -> reqwest::Response {
        self.client
            .post(self.url(route))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// JSON bodies the upstream received, in order.
    pub async fn upstream_bodies(&self) -> Vec<Value> {
        self.upstream
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| r.body_json::<Value>().expect("upstream body is JSON"))
            .collect()
    }
}

pub fn file_part(data: Vec<u8>, file_name: &str, mime: &str) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(data)
        .file_name(file_name.to_string())
        .mime_str(mime)
        .unwrap()
}
