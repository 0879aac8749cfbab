//! Google Secret Manager REST(v1) 연동 구현.
//!
//! 설정 blob은 JSON 문자열을 base64로 인코딩한 secret version payload로 저장된다.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::application::ports::SecretStore;
use crate::domain::blob::ConfigBlob;
use crate::domain::error::{ConfigError, ConfigResult};

const DEFAULT_API_BASE: &str = "https://secretmanager.googleapis.com/v1";

pub struct SecretManagerClient {
    client: Client,
    project_id: String,
    token: Option<String>,
    api_base: Option<String>,
}

impl SecretManagerClient {
    pub fn new(project_id: String, token: Option<String>, api_base: Option<String>) -> Self {
        Self {
            client: Client::new(),
            project_id,
            token,
            api_base,
        }
    }

    fn api_base(&self) -> String {
        self.api_base
            .as_deref()
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }

    fn secrets_endpoint(&self) -> String {
        format!("{}/projects/{}/secrets", self.api_base(), self.project_id)
    }

    fn secret_endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.secrets_endpoint(), name)
    }

    fn create_endpoint(&self, name: &str) -> ConfigResult<Url> {
        let mut url = Url::parse(&self.secrets_endpoint())
            .map_err(|e| ConfigError::StoreUnavailable(format!("secret manager: invalid api_base: {e}")))?;
        url.query_pairs_mut().append_pair("secretId", name);
        Ok(url)
    }

    fn request(&self, method: Method, url: impl reqwest::IntoUrl) -> RequestBuilder {
        let req = self
            .client
            .request(method, url)
            .header("User-Agent", "cfgsync");

        if let Some(token) = &self.token {
            req.bearer_auth(token)
        } else {
            req
        }
    }

    /// 요청을 보내고 (status, body)를 반환한다. 전송 실패는 저장소 장애로 본다.
    async fn send(&self, req: RequestBuilder, action: &str) -> ConfigResult<(StatusCode, String)> {
        let resp = req
            .send()
            .await
            .map_err(|e| store_error(action, e))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| store_error(action, e))?;
        debug!(action, %status, "secret manager response");
        Ok((status, body))
    }

    /// 프로젝트의 secret 목록을 조회할 수 있는지 확인한다.
    ///
    /// latest:access의 404는 secret 부재와 잘못된 프로젝트를 구분하지 않는다.
    async fn ensure_project_accessible(&self) -> ConfigResult<()> {
        let req = self
            .request(Method::GET, self.secrets_endpoint())
            .query(&[("pageSize", "1")]);
        let (status, body) = self.send(req, "list secrets").await?;
        if status.is_success() {
            return Ok(());
        }
        Err(store_error(
            "list secrets",
            format!(
                "project '{}' is not accessible ({status}): {body}",
                self.project_id
            ),
        ))
    }
}

fn store_error(action: &str, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::StoreUnavailable(format!("secret manager: failed to {action}: {err}"))
}

#[derive(Debug, Deserialize)]
struct AccessResponse {
    payload: AccessPayload,
}

#[derive(Debug, Deserialize)]
struct AccessPayload {
    data: String,
}

fn decode_access_response(body: &str) -> ConfigResult<ConfigBlob> {
    let resp: AccessResponse = serde_json::from_str(body)
        .map_err(|e| ConfigError::CorruptBlob(format!("invalid access response: {e}")))?;
    let bytes = STANDARD
        .decode(resp.payload.data.trim())
        .map_err(|e| ConfigError::CorruptBlob(format!("payload is not base64: {e}")))?;
    let raw = String::from_utf8(bytes)
        .map_err(|e| ConfigError::CorruptBlob(format!("payload is not UTF-8: {e}")))?;
    ConfigBlob::from_json_str(&raw)
}

fn encode_payload(blob: &ConfigBlob) -> serde_json::Value {
    json!({ "payload": { "data": STANDARD.encode(blob.to_json_string()) } })
}

#[async_trait]
impl SecretStore for SecretManagerClient {
    async fn read_latest(&self, name: &str) -> ConfigResult<Option<ConfigBlob>> {
        let url = format!("{}/versions/latest:access", self.secret_endpoint(name));
        let (status, body) = self
            .send(self.request(Method::GET, url), "access latest version")
            .await?;

        // secret 또는 버전이 없으면 아직 초기화되지 않은 것으로 본다.
        if status == StatusCode::NOT_FOUND {
            self.ensure_project_accessible().await?;
            debug!(secret = name, "secret has no versions yet");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(store_error(
                "access latest version",
                format!("({status}): {body}"),
            ));
        }

        decode_access_response(&body).map(Some)
    }

    async fn create(&self, name: &str) -> ConfigResult<()> {
        let req = self
            .request(Method::POST, self.create_endpoint(name)?)
            .json(&json!({ "replication": { "automatic": {} } }));
        let (status, body) = self.send(req, "create secret").await?;

        if status == StatusCode::CONFLICT {
            return Err(ConfigError::SecretExists(name.to_string()));
        }
        if !status.is_success() {
            return Err(store_error("create secret", format!("({status}): {body}")));
        }
        Ok(())
    }

    async fn append_version(&self, name: &str, blob: &ConfigBlob) -> ConfigResult<()> {
        let url = format!("{}:addVersion", self.secret_endpoint(name));
        let req = self
            .request(Method::POST, url)
            .json(&encode_payload(blob));
        let (status, body) = self.send(req, "add secret version").await?;

        if !status.is_success() {
            return Err(store_error("add secret version", format!("({status}): {body}")));
        }
        Ok(())
    }
}
