use std::path::Path;

use crate::adapters::remote::remote_client::RemoteClient;
use crate::cli::{BucketAction, context, output};
use crate::core::errors::Result;
use crate::core::models::environment::Environment;
use crate::core::models::variable_spec::settings;
use crate::core::services::bucket_provisioner::{BucketProvisioner, BucketState, CORS_METHODS};
use crate::core::services::validation;

/// Execute `pagesync bucket <action>`.
///
/// Creates the public bucket named by `R2_PUBLIC_BUCKET` and lets browsers
/// upload to it from any origin.
pub fn execute(
    action: &BucketAction,
    config_path: &Path,
    env: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let config = context::load_config(config_path, env, Environment::Production)?;
    validation::validate_bucket_settings(&config)?;
    let bucket = config.get(settings::PUBLIC_BUCKET, "");
    validation::validate_bucket_name(&bucket)?;

    let provisioner = BucketProvisioner {
        client: RemoteClient::from_config(&config)?,
        bucket,
    };
    let rules = format!("{} from any origin", CORS_METHODS.join(", "));

    match action {
        BucketAction::Setup => {
            output::header(&format!("🪣 pagesync bucket setup — {}", config.environment()));

            if dry_run {
                let state = output::with_spinner("Checking bucket...", || provisioner.check())?;
                match state {
                    BucketState::Missing => output::warning(&format!(
                        "Bucket '{}' does not exist; would create it",
                        provisioner.bucket
                    )),
                    _ => output::success(&format!(
                        "Bucket '{}' already exists",
                        provisioner.bucket
                    )),
                }
                output::line(&format!("Would set CORS rules: {rules}"));
                return Ok(());
            }

            let state = output::with_spinner("Setting up bucket...", || provisioner.setup())?;
            match state {
                BucketState::Created => {
                    output::success(&format!("Created bucket '{}'", provisioner.bucket))
                }
                _ => output::success(&format!("Bucket '{}' already exists", provisioner.bucket)),
            }
            output::success(&format!("CORS rules set: {rules}"));
        }
    }

    Ok(())
}
