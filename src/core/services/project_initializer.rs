use serde_json::json;

use crate::core::errors::{DeployError, Result};
use crate::core::traits::control_plane::ControlPlane;

/// Lifecycle of a hosting project as seen by `ProjectInitializer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectState {
    Checking,
    Exists,
    Missing,
    Created,
}

/// Makes sure the hosting project exists, creating it when absent.
pub struct ProjectInitializer<C: ControlPlane> {
    pub client: C,
    pub project_name: String,
    pub production_branch: String,
}

impl<C: ControlPlane> ProjectInitializer<C> {
    /// Look the project up. Resolves to `Exists` or `Missing`.
    ///
    /// # Errors
    ///
    /// `ApiRejected` for any answer other than success or 404.
    pub fn check(&self) -> Result<ProjectState> {
        let resp = self.client.get(&project_path(&self.project_name))?;
        if resp.is_success() {
            Ok(ProjectState::Exists)
        } else if resp.status == 404 {
            Ok(ProjectState::Missing)
        } else {
            Err(DeployError::ApiRejected {
                operation: format!("lookup of project '{}'", self.project_name),
                status: resp.status,
                message: resp.error_message(),
            })
        }
    }

    /// Create the project with its production branch. The subdomain is
    /// the project name.
    ///
    /// A rejected create leaves nothing safe to continue from, so it is
    /// always returned as a fatal `ApiRejected`.
    pub fn create(&self) -> Result<ProjectState> {
        let body = json!({
            "name": self.project_name,
            "subdomain": self.project_name,
            "production_branch": self.production_branch,
        });
        let resp = self.client.post("/pages/projects", &body)?;
        if resp.is_success() {
            Ok(ProjectState::Created)
        } else {
            Err(DeployError::ApiRejected {
                operation: format!("creation of project '{}'", self.project_name),
                status: resp.status,
                message: resp.error_message(),
            })
        }
    }

    /// Walk `Checking` to a final state: `Exists` or `Created`.
    pub fn ensure(&self) -> Result<ProjectState> {
        let mut state = ProjectState::Checking;
        loop {
            state = match state {
                ProjectState::Checking => self.check()?,
                ProjectState::Missing => self.create()?,
                done @ (ProjectState::Exists | ProjectState::Created) => return Ok(done),
            };
        }
    }
}

/// Path of a single project, relative to the account root.
pub fn project_path(name: &str) -> String {
    format!("/pages/projects/{name}")
}
