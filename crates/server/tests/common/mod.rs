//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port with its upstreams
//! (chat completions and SerpApi) pointed at an `httpmock::MockServer`.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::{Method, Mock, MockServer};
use reqwest::Client;
use seocrew_server::{
    config, router,
    state::{build_app_state, AppState},
};
use serde_json::json;
use std::{fs::File, io::Write, net::SocketAddr};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

pub const SERP_API_KEY: &str = "test-serp-key";

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_extra_config("").await
    }

    /// Like `spawn`, appending `extra` to the generated `config.yml`.
    pub async fn spawn_with_extra_config(extra: &str) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start_async().await;

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
ai:
  provider: "local"
  api_url: "{}"
  api_key: null
  model_name: "mock-chat-model"
search:
  api_url: "{}"
  api_key: "{}"
  language: "pt-br"
  region: "br"
  result_count: 10
{extra}
"#,
            mock_server.url("/v1/chat/completions"),
            mock_server.url("/search.json"),
            SERP_API_KEY,
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config_path = config_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("non-utf8 temp path"))?;
        let config = config::get_config(Some(config_path))?;
        let app_state = build_app_state(config).await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let state_for_server = app_state.clone();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(state_for_server);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Answers every chat-completion call with `content`.
    pub async fn mock_chat_completion(&self, content: &str) -> Mock<'_> {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        });
        self.mock_server
            .mock_async(|when, then| {
                when.method(Method::POST).path("/v1/chat/completions");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(body);
            })
            .await
    }

    /// Answers SerpApi searches with the given organic results.
    pub async fn mock_search(&self, organic_results: serde_json::Value) -> Mock<'_> {
        self.mock_server
            .mock_async(|when, then| {
                when.method(Method::GET)
                    .path("/search.json")
                    .query_param("engine", "google")
                    .query_param("api_key", SERP_API_KEY);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({ "organic_results": organic_results }));
            })
            .await
    }

    pub async fn get(&self, path_and_query: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.address, path_and_query))
            .send()
            .await?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
