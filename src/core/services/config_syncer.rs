use serde_json::Value;

use crate::config::deploy_config::ConfigSource;
use crate::core::errors::{DeployError, Result, SyncStep};
use crate::core::models::deployment_config::{DeploymentConfigPayload, EnvVar, EnvironmentConfig};
use crate::core::models::environment::Environment;
use crate::core::models::variable_spec::{VARIABLE_SPECS, VarKind, settings};
use crate::core::services::command_builder::CommandBuilder;
use crate::core::services::project_initializer::project_path;
use crate::core::services::validation;
use crate::core::traits::control_plane::{ControlPlane, DatabaseDirectory};

/// A variable confirmed by the platform after a sync.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncedVariable {
    pub name: String,
    pub kind: VarKind,
}

/// Outcome of a successful sync, for operator visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub environment: Environment,
    pub project_name: String,
    pub database_id: Option<String>,
    pub variables: Vec<SyncedVariable>,
    /// Optional variables that were unset locally and sent empty.
    pub blank: Vec<String>,
}

/// Pushes the local configuration of one environment to the remote
/// project's deployment config.
///
/// The sync is all-or-nothing: any failing step aborts before the PATCH
/// is sent, and the error names the step.
pub struct ConfigSyncer<'a, C: ControlPlane + DatabaseDirectory> {
    pub config: &'a ConfigSource,
    pub commands: CommandBuilder,
    pub client: C,
}

impl<'a, C: ControlPlane + DatabaseDirectory> ConfigSyncer<'a, C> {
    pub fn new(config: &'a ConfigSource, client: C) -> Self {
        Self {
            config,
            commands: CommandBuilder::from_config(config),
            client,
        }
    }

    /// Run every step and PATCH the result.
    pub fn sync(&self) -> Result<SyncReport> {
        let (project_name, payload) = self.plan()?;
        let body = serde_json::to_value(&payload).map_err(|e| {
            DeployError::Fatal {
                detail: format!("failed to serialize deployment config: {e}"),
            }
            .at_step(SyncStep::BuildPayload)
        })?;

        self.push(&project_name, &body, &payload)
            .map_err(|e| e.at_step(SyncStep::Push))
    }

    /// Validate, resolve the database and build the payload without
    /// sending anything. Returns the validated project name alongside.
    pub fn plan(&self) -> Result<(String, DeploymentConfigPayload)> {
        let project_name = self
            .validate()
            .map_err(|e| e.at_step(SyncStep::Validate))?;
        let database_id = self
            .resolve_database_id()
            .map_err(|e| e.at_step(SyncStep::ResolveDatabase))?;
        Ok((project_name, self.build_payload(database_id.as_deref())))
    }

    /// Check required configuration and the project name.
    pub fn validate(&self) -> Result<String> {
        validation::validate_required(self.config)?;
        let project_name = self.config.get(settings::PROJECT_NAME, "");
        validation::validate_project_name(&project_name)?;
        Ok(project_name)
    }

    /// Look up the id of this environment's database.
    ///
    /// `None` means no database is bound yet, which is not an error.
    pub fn resolve_database_id(&self) -> Result<Option<String>> {
        let id = self
            .client
            .lookup_database_id(&self.commands.database_name())?;
        Ok(Some(id).filter(|id| !id.is_empty()))
    }

    /// One typed entry per known variable. Unset optional variables are
    /// sent with an empty value; `DEPLOYMENT_ENVIRONMENT` falls back to
    /// the active environment.
    pub fn build_payload(&self, database_id: Option<&str>) -> DeploymentConfigPayload {
        let environment = self.config.environment();
        let mut env = EnvironmentConfig::default();
        for spec in VARIABLE_SPECS {
            let default = match spec.name {
                settings::DEPLOYMENT_ENVIRONMENT => environment.as_str(),
                _ => "",
            };
            env.env_vars.insert(
                spec.name.to_string(),
                EnvVar {
                    value: self.config.get(spec.name, default),
                    kind: spec.kind(),
                },
            );
        }
        if let Some(id) = database_id {
            env.bind_database(id);
        }

        let mut payload = DeploymentConfigPayload::default();
        payload
            .deployment_configs
            .insert(environment.to_string(), env);
        payload
    }

    fn push(
        &self,
        project_name: &str,
        body: &Value,
        payload: &DeploymentConfigPayload,
    ) -> Result<SyncReport> {
        let resp = self.client.patch(&project_path(project_name), body)?;
        if !resp.is_success() {
            return Err(DeployError::ApiRejected {
                operation: format!("update of project '{project_name}'"),
                status: resp.status,
                message: resp.error_message(),
            });
        }

        let environment = self.config.environment();
        let sent = &payload.deployment_configs[environment.as_str()];
        let remote_vars = resp
            .result()
            .and_then(|r| r.pointer(&format!("/deployment_configs/{environment}/env_vars")))
            .and_then(Value::as_object);

        // Prefer what the platform reports back; fall back to what was sent
        let mut variables: Vec<SyncedVariable> = match remote_vars {
            Some(vars) => vars
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(name, v)| SyncedVariable {
                    name: name.clone(),
                    kind: v
                        .get("type")
                        .and_then(|t| serde_json::from_value(t.clone()).ok())
                        .unwrap_or_else(|| local_kind(name)),
                })
                .collect(),
            None => sent
                .env_vars
                .iter()
                .map(|(name, var)| SyncedVariable {
                    name: name.clone(),
                    kind: var.kind,
                })
                .collect(),
        };
        variables.sort_by(|a, b| a.name.cmp(&b.name));

        let blank = sent
            .env_vars
            .iter()
            .filter(|(_, var)| var.value.is_empty())
            .map(|(name, _)| name.clone())
            .collect();

        Ok(SyncReport {
            environment,
            project_name: project_name.to_string(),
            database_id: sent
                .d1_databases
                .as_ref()
                .and_then(|dbs| dbs.values().next())
                .map(|binding| binding.id.clone()),
            variables,
            blank,
        })
    }
}

fn local_kind(name: &str) -> VarKind {
    VARIABLE_SPECS
        .iter()
        .find(|spec| spec.name == name)
        .map(|spec| spec.kind())
        .unwrap_or(VarKind::Plain)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use serde_json::json;

    use super::*;
    use crate::core::errors::ErrorKind;
    use crate::core::traits::fakes::{FakePlane, reply};

    const COMPLETE: &str = r#"
CLOUDFLARE_PROJECT_NAME = "acme"
CLOUDFLARE_ACCOUNT_ID = "acc"
CLOUDFLARE_API_TOKEN = "tok"
NODE_VERSION = "18"

[preview]
APP_VERSION = "1.2.3"
"#;

    fn config(content: &str, env: Environment) -> ConfigSource {
        ConfigSource::parse(content, Path::new("deploy.toml"), env).unwrap()
    }

    fn patched(env: &str) -> Result<crate::core::models::api_response::ApiResponse> {
        reply(
            200,
            json!({
                "success": true,
                "result": {
                    "deployment_configs": {
                        env: {
                            "env_vars": {
                                "CLOUDFLARE_API_TOKEN": { "type": "secret_text" },
                                "NODE_VERSION": { "type": "plain_text", "value": "18" },
                                "APP_VERSION": { "type": "plain_text", "value": "1.2.3" }
                            }
                        }
                    }
                }
            }),
        )
    }

    #[test]
    fn sync_pushes_payload_and_reports_remote_vars() {
        let cfg = config(COMPLETE, Environment::Preview);
        let mut plane = FakePlane::with(vec![patched("preview")]);
        plane.database_id = "db-uuid".into();
        let syncer = ConfigSyncer::new(&cfg, plane);

        let report = syncer.sync().unwrap();

        assert_eq!(report.environment, Environment::Preview);
        assert_eq!(report.database_id.as_deref(), Some("db-uuid"));
        let names: Vec<&str> = report.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["APP_VERSION", "CLOUDFLARE_API_TOKEN", "NODE_VERSION"]);
        assert_eq!(report.variables[1].kind, VarKind::Secret);
        assert!(report.blank.is_empty());

        let requests = syncer.client.requests();
        assert_eq!(requests.len(), 1);
        let (method, path, body) = &requests[0];
        assert_eq!(method, "PATCH");
        assert_eq!(path, "/pages/projects/acme");
        let env = &body.as_ref().unwrap()["deployment_configs"]["preview"];
        assert_eq!(
            env["env_vars"]["NODE_VERSION"],
            json!({ "value": "18", "type": "plain_text" })
        );
        assert_eq!(env["env_vars"]["APP_VERSION"]["value"], "1.2.3");
        assert_eq!(env["env_vars"]["CLOUDFLARE_API_TOKEN"]["type"], "secret_text");
        assert_eq!(env["d1_databases"]["discussdb"]["id"], "db-uuid");
    }

    #[test]
    fn every_entry_carries_a_type() {
        let cfg = config(COMPLETE, Environment::Production);
        let syncer = ConfigSyncer::new(&cfg, FakePlane::default());
        let payload = serde_json::to_value(syncer.build_payload(None)).unwrap();

        let vars = payload["deployment_configs"]["production"]["env_vars"]
            .as_object()
            .unwrap();
        assert_eq!(vars.len(), VARIABLE_SPECS.len());
        for (name, var) in vars {
            let kind = var["type"].as_str();
            assert!(
                matches!(kind, Some("plain_text" | "secret_text")),
                "{name}: {var}"
            );
            assert!(var["value"].is_string(), "{name}: {var}");
        }
        // Not set anywhere for production
        assert_eq!(vars["APP_VERSION"], json!({ "value": "", "type": "plain_text" }));
    }

    #[test]
    fn deployment_environment_defaults_to_active_scope() {
        let cfg = config(COMPLETE, Environment::Preview);
        let syncer = ConfigSyncer::new(&cfg, FakePlane::default());
        let payload = syncer.build_payload(None);
        assert_eq!(
            payload.deployment_configs["preview"].env_vars["DEPLOYMENT_ENVIRONMENT"].value,
            "preview"
        );

        let content = format!("{COMPLETE}\n[development]\nDEPLOYMENT_ENVIRONMENT = \"local\"\n");
        let cfg = config(&content, Environment::Development);
        let syncer = ConfigSyncer::new(&cfg, FakePlane::default());
        let payload = syncer.build_payload(None);
        assert_eq!(
            payload.deployment_configs["development"].env_vars["DEPLOYMENT_ENVIRONMENT"].value,
            "local"
        );
    }

    #[test]
    fn empty_database_id_means_no_binding() {
        let cfg = config(COMPLETE, Environment::Production);
        let syncer = ConfigSyncer::new(&cfg, FakePlane::with(vec![patched("production")]));

        assert_eq!(syncer.resolve_database_id().unwrap(), None);
        let report = syncer.sync().unwrap();
        assert_eq!(report.database_id, None);
        assert_eq!(report.blank, vec!["APP_VERSION"]);
        let body = syncer.client.requests()[0].2.clone().unwrap();
        assert!(body["deployment_configs"]["production"].get("d1_databases").is_none());
    }

    #[test]
    fn missing_required_aborts_before_any_request() {
        let cfg = config("NODE_VERSION = \"18\"\n", Environment::Development);
        let syncer = ConfigSyncer::new(&cfg, FakePlane::default());

        let err = syncer.sync().unwrap_err();
        match &err {
            DeployError::SyncStepFailed { step, source } => {
                assert_eq!(*step, SyncStep::Validate);
                match source.as_ref() {
                    DeployError::MissingVariables { names, .. } => assert_eq!(
                        names,
                        &vec![
                            "CLOUDFLARE_ACCOUNT_ID",
                            "CLOUDFLARE_PROJECT_NAME",
                            "CLOUDFLARE_API_TOKEN"
                        ]
                    ),
                    other => panic!("unexpected cause: {other}"),
                }
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(syncer.client.requests().is_empty());
    }

    #[test]
    fn invalid_project_name_is_rejected() {
        let content = COMPLETE.replace("\"acme\"", "\"acme discuss\"");
        let cfg = config(&content, Environment::Production);
        let syncer = ConfigSyncer::new(&cfg, FakePlane::default());

        let err = syncer.sync().unwrap_err();
        assert!(err.to_string().contains("step 'validate'"));
        assert!(err.to_string().contains("acme discuss"));
    }

    #[test]
    fn rejected_patch_reports_push_step() {
        let cfg = config(COMPLETE, Environment::Production);
        let syncer = ConfigSyncer::new(
            &cfg,
            FakePlane::with(vec![reply(
                403,
                json!({ "success": false, "errors": [{ "code": 10000, "message": "Authentication error" }] }),
            )]),
        );

        let err = syncer.sync().unwrap_err();
        assert!(matches!(
            err,
            DeployError::SyncStepFailed {
                step: SyncStep::Push,
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Fatal);
        assert!(err.to_string().contains("Authentication error"));
    }

    #[test]
    fn report_falls_back_to_sent_vars() {
        let cfg = config(COMPLETE, Environment::Production);
        let syncer = ConfigSyncer::new(
            &cfg,
            FakePlane::with(vec![reply(200, json!({ "success": true, "result": {} }))]),
        );

        let report = syncer.sync().unwrap();
        assert_eq!(report.variables.len(), VARIABLE_SPECS.len());
        assert_eq!(report.variables[0].name, "APP_VERSION");
    }
}
