use serde_json::Value;

use crate::core::errors::Result;
use crate::core::models::api_response::ApiResponse;

/// Port for the platform's control-plane REST API.
///
/// Paths are relative to the account root (`/accounts/{accountId}`).
/// Implementations buffer the whole body and parse it as JSON.
pub trait ControlPlane: Send + Sync {
    fn get(&self, path: &str) -> Result<ApiResponse>;

    fn post(&self, path: &str, body: &Value) -> Result<ApiResponse>;

    fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse>;

    fn put(&self, path: &str, body: &Value) -> Result<ApiResponse>;
}

/// Port for finding a provisioned database by name.
///
/// Kept apart from `ControlPlane` because the listing endpoint it relies
/// on is undocumented and its response shape may change.
pub trait DatabaseDirectory: Send + Sync {
    /// Return the database id, or an empty string if no database has
    /// that name. Callers must treat the empty string as "not bound yet".
    fn lookup_database_id(&self, name: &str) -> Result<String>;
}
