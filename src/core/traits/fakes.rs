use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use crate::core::errors::Result;
use crate::core::models::api_response::ApiResponse;
use crate::core::traits::command_runner::{CommandOutput, CommandRunner};
use crate::core::traits::control_plane::{ControlPlane, DatabaseDirectory};

/// Records requests and replays canned responses in order.
#[derive(Default)]
pub struct FakePlane {
    pub responses: Mutex<VecDeque<Result<ApiResponse>>>,
    pub requests: Mutex<Vec<(String, String, Option<Value>)>>,
    pub database_id: String,
}

impl FakePlane {
    pub fn with(responses: Vec<Result<ApiResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<(String, String, Option<Value>)> {
        self.requests.lock().unwrap().clone()
    }

    fn next(&self, method: &str, path: &str, body: Option<&Value>) -> Result<ApiResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((method.into(), path.into(), body.cloned()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected request")
    }
}

impl ControlPlane for FakePlane {
    fn get(&self, path: &str) -> Result<ApiResponse> {
        self.next("GET", path, None)
    }

    fn post(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.next("POST", path, Some(body))
    }

    fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.next("PATCH", path, Some(body))
    }

    fn put(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.next("PUT", path, Some(body))
    }
}

impl DatabaseDirectory for FakePlane {
    fn lookup_database_id(&self, _name: &str) -> Result<String> {
        Ok(self.database_id.clone())
    }
}

pub fn reply(status: u16, body: Value) -> Result<ApiResponse> {
    Ok(ApiResponse { status, body })
}

/// Records commands and fails the ones whose label is listed in `failing`.
#[derive(Default)]
pub struct FakeRunner {
    pub failing: Vec<String>,
    pub commands: Mutex<Vec<(String, String)>>,
}

impl FakeRunner {
    pub fn failing(label: &str) -> Self {
        Self {
            failing: vec![label.to_string()],
            ..Self::default()
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .map(|(label, _)| label.clone())
            .collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, label: &str, command: &str) -> Result<CommandOutput> {
        self.commands
            .lock()
            .unwrap()
            .push((label.to_string(), command.to_string()));
        if self.failing.iter().any(|l| l == label) {
            return Err(crate::core::errors::DeployError::CommandFailed {
                label: label.to_string(),
                code: 1,
                stderr: "simulated failure".into(),
            });
        }
        Ok(CommandOutput {
            stdout: format!("ran {label}"),
            stderr: String::new(),
        })
    }
}
