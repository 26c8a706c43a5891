use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use serde_json::Value;

use super::{KvBackend, KvError, KvResult};
use crate::config::RestKvConfig;

/// Client for Redis-over-REST services (`GET /get/{key}`, `POST /set/{key}`).
/// Values travel as JSON-encoded strings.
#[derive(Clone)]
pub struct RestKv {
    client: Client,
    base_url: Url,
    token: String,
}

#[derive(Debug, Deserialize)]
struct RestReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl RestKv {
    pub fn new(cfg: &RestKvConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(cfg.url.trim()).context("storage.rest.url is not a valid url")?;
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("failed to build kv http client")?;

        Ok(Self {
            client,
            base_url,
            token: cfg.token.clone(),
        })
    }

    fn command_url(&self, operation: &'static str, key: &str) -> KvResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| KvError::Backend {
                operation,
                message: format!("cannot build a command url from {}", self.base_url),
            })?
            .pop_if_empty()
            .push(operation)
            .push(key);
        Ok(url)
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> KvResult<Option<Value>> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        let reply: RestReply = response.json().await?;

        if let Some(message) = reply.error {
            return Err(KvError::Backend { operation, message });
        }
        if !status.is_success() {
            return Err(KvError::Backend {
                operation,
                message: status.to_string(),
            });
        }
        Ok(reply.result)
    }
}

#[async_trait]
impl KvBackend for RestKv {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn get(&self, key: &str) -> KvResult<Option<Value>> {
        let url = self.command_url("get", key)?;
        match self.send("get", self.client.get(url)).await? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(KvError::Decode),
            Some(other) => Ok(Some(other)),
        }
    }

    async fn set(&self, key: &str, value: Value) -> KvResult<()> {
        let url = self.command_url("set", key)?;
        let raw = serde_json::to_string(&value).map_err(KvError::Encode)?;
        self.send("set", self.client.post(url).body(raw)).await?;
        Ok(())
    }
}
