use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::config::deploy_config::ConfigSource;
use crate::core::errors::{DeployError, Result};
use crate::core::models::api_response::ApiResponse;
use crate::core::models::variable_spec::settings;
use crate::core::traits::control_plane::{ControlPlane, DatabaseDirectory};

/// Public control-plane endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client for the control-plane API.
///
/// Owns a current-thread runtime so each call suspends the caller until
/// the whole response body has been read. One request at a time.
pub struct RemoteClient {
    runtime: tokio::runtime::Runtime,
    http: reqwest::Client,
    account_root: String,
    api_token: String,
}

impl RemoteClient {
    /// Build a client for `{base_url}/accounts/{account_id}`.
    pub fn new(base_url: &str, account_id: &str, api_token: &str) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DeployError::Transport {
                detail: format!("failed to create async runtime: {e}"),
            })?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(format!("pagesync/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DeployError::Transport {
                detail: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            runtime,
            http,
            account_root: format!("{}/accounts/{account_id}", base_url.trim_end_matches('/')),
            api_token: api_token.to_string(),
        })
    }

    /// Build a client from the credentials in `config`.
    ///
    /// Empty credentials are accepted here; validation reports them.
    pub fn from_config(config: &ConfigSource) -> Result<Self> {
        Self::new(
            &config.get(settings::API_BASE_URL, DEFAULT_API_BASE_URL),
            &config.get(settings::ACCOUNT_ID, ""),
            &config.get(settings::API_TOKEN, ""),
        )
    }

    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<ApiResponse> {
        let url = format!("{}{path}", self.account_root);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_token))
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        self.runtime.block_on(async {
            let resp = request.send().await.map_err(|e| DeployError::Transport {
                detail: format!("{method} {path}: {e}"),
            })?;
            let status = resp.status().as_u16();
            let bytes = resp.bytes().await.map_err(|e| DeployError::Transport {
                detail: format!("{method} {path}: failed to read response body: {e}"),
            })?;

            let body = if bytes.iter().all(u8::is_ascii_whitespace) {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).map_err(|e| DeployError::Parse {
                    detail: format!("{method} {path} (HTTP {status}): {e}"),
                })?
            };

            Ok(ApiResponse { status, body })
        })
    }
}

impl ControlPlane for RemoteClient {
    fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(Method::GET, path, None)
    }

    fn post(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.send(Method::POST, path, Some(body))
    }

    fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.send(Method::PATCH, path, Some(body))
    }

    fn put(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.send(Method::PUT, path, Some(body))
    }
}

impl DatabaseDirectory for RemoteClient {
    /// Scans the database listing for an exact name match.
    ///
    /// The listing endpoint is undocumented; anything other than an array
    /// of objects under `result` is treated as "no match".
    fn lookup_database_id(&self, name: &str) -> Result<String> {
        let resp = self.get(&format!("/d1/database?name={name}"))?;
        if !resp.is_success() {
            return Err(DeployError::ApiRejected {
                operation: format!("lookup of database '{name}'"),
                status: resp.status,
                message: resp.error_message(),
            });
        }
        Ok(find_database_id(resp.result(), name))
    }
}

fn find_database_id(result: Option<&Value>, name: &str) -> String {
    result
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find(|db| db.get("name").and_then(Value::as_str) == Some(name))
        .and_then(|db| db.get("uuid").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use httpmock::Method::{GET, PATCH, POST, PUT};
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;

    fn client(server: &MockServer) -> RemoteClient {
        RemoteClient::new(&server.base_url(), "acc", "tok").unwrap()
    }

    #[test]
    fn get_sends_bearer_token_and_parses_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/accounts/acc/pages/projects/acme")
                .header("authorization", "Bearer tok")
                .header("content-type", "application/json");
            then.status(200)
                .json_body(json!({ "success": true, "result": { "name": "acme" } }));
        });

        let resp = client(&server).get("/pages/projects/acme").unwrap();

        mock.assert();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.result().unwrap()["name"], "acme");
    }

    #[test]
    fn post_and_patch_send_json_bodies() {
        let server = MockServer::start();
        let body = json!({ "name": "acme", "production_branch": "main" });
        let post = server.mock(|when, then| {
            when.method(POST)
                .path("/accounts/acc/pages/projects")
                .json_body(body.clone());
            then.status(200).json_body(json!({ "success": true }));
        });
        let patch = server.mock(|when, then| {
            when.method(PATCH)
                .path("/accounts/acc/pages/projects/acme")
                .json_body(json!({ "deployment_configs": {} }));
            then.status(200).json_body(json!({ "success": true }));
        });

        let c = client(&server);
        assert!(c.post("/pages/projects", &body).unwrap().is_success());
        assert!(
            c.patch("/pages/projects/acme", &json!({ "deployment_configs": {} }))
                .unwrap()
                .is_success()
        );
        post.assert();
        patch.assert();
    }

    #[test]
    fn put_sends_json_body() {
        let server = MockServer::start();
        let body = json!({ "rules": [] });
        let put = server.mock(|when, then| {
            when.method(PUT)
                .path("/accounts/acc/r2/buckets/acme-public/cors")
                .header("authorization", "Bearer tok")
                .json_body(body.clone());
            then.status(200).json_body(json!({ "success": true, "result": {} }));
        });

        let resp = client(&server)
            .put("/r2/buckets/acme-public/cors", &body)
            .unwrap();
        assert!(resp.is_success());
        put.assert();
    }

    #[test]
    fn error_status_is_returned_not_raised() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/accounts/acc/pages/projects/ghost");
            then.status(404).json_body(json!({
                "success": false,
                "errors": [{ "code": 8000007, "message": "Project not found" }]
            }));
        });

        let resp = client(&server).get("/pages/projects/ghost").unwrap();
        assert_eq!(resp.status, 404);
        assert!(resp.error_message().contains("Project not found"));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/accounts/acc/pages/projects/acme");
            then.status(200).body("<html>gateway</html>");
        });

        let err = client(&server).get("/pages/projects/acme").unwrap_err();
        assert!(matches!(err, DeployError::Parse { .. }));
    }

    #[test]
    fn empty_body_is_null() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/accounts/acc/pages/projects/acme");
            then.status(204);
        });

        let resp = client(&server).get("/pages/projects/acme").unwrap();
        assert_eq!(resp.body, Value::Null);
    }

    #[test]
    fn unreachable_server_is_transport_error() {
        let c = RemoteClient::new("http://127.0.0.1:9", "acc", "tok").unwrap();
        let err = c.get("/pages/projects/acme").unwrap_err();
        assert!(matches!(err, DeployError::Transport { .. }));
    }

    #[test]
    fn lookup_returns_matching_uuid() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/accounts/acc/d1/database")
                .query_param("name", "acme_discussdb_development");
            then.status(200).json_body(json!({
                "success": true,
                "result": [
                    { "name": "acme_discussdb", "uuid": "prefix-match" },
                    { "name": "acme_discussdb_development", "uuid": "dev-uuid" }
                ]
            }));
        });

        let id = client(&server)
            .lookup_database_id("acme_discussdb_development")
            .unwrap();
        assert_eq!(id, "dev-uuid");
    }

    #[test]
    fn lookup_returns_empty_when_absent() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/accounts/acc/d1/database");
            then.status(200).json_body(json!({
                "success": true,
                "result": [{ "name": "other", "uuid": "x" }]
            }));
        });

        let id = client(&server).lookup_database_id("discussdb").unwrap();
        assert_eq!(id, "");
    }

    #[test]
    fn unexpected_listing_shape_is_no_match() {
        assert_eq!(find_database_id(Some(&json!({ "items": [] })), "x"), "");
        assert_eq!(find_database_id(None, "x"), "");
        assert_eq!(
            find_database_id(Some(&json!([{ "name": "x" }])), "x"),
            "",
            "entry without uuid"
        );
    }
}
