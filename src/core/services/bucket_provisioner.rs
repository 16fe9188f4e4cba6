use serde_json::{Value, json};

use crate::core::errors::{DeployError, Result};
use crate::core::traits::control_plane::ControlPlane;

/// API error code for "bucket already exists, and you own it".
const BUCKET_ALREADY_OWNED: i64 = 10004;

/// Methods browsers may use against the public bucket, for uploads
/// through presigned URLs.
pub const CORS_METHODS: [&str; 3] = ["DELETE", "POST", "PUT"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketState {
    Exists,
    Missing,
    Created,
}

/// Creates the public object-storage bucket and installs its CORS rules.
pub struct BucketProvisioner<C: ControlPlane> {
    pub client: C,
    pub bucket: String,
}

impl<C: ControlPlane> BucketProvisioner<C> {
    /// Look the bucket up without changing anything.
    pub fn check(&self) -> Result<BucketState> {
        let resp = self.client.get(&bucket_path(&self.bucket))?;
        if resp.is_success() {
            Ok(BucketState::Exists)
        } else if resp.status == 404 {
            Ok(BucketState::Missing)
        } else {
            Err(DeployError::ApiRejected {
                operation: format!("lookup of bucket '{}'", self.bucket),
                status: resp.status,
                message: resp.error_message(),
            })
        }
    }

    /// Create the bucket. An already owned bucket counts as `Exists`.
    pub fn create(&self) -> Result<BucketState> {
        let resp = self
            .client
            .post("/r2/buckets", &json!({ "name": self.bucket }))?;
        if resp.is_success() {
            Ok(BucketState::Created)
        } else if resp.has_error_code(BUCKET_ALREADY_OWNED) {
            Ok(BucketState::Exists)
        } else {
            Err(DeployError::ApiRejected {
                operation: format!("creation of bucket '{}'", self.bucket),
                status: resp.status,
                message: resp.error_message(),
            })
        }
    }

    /// Replace the bucket's CORS rules.
    pub fn apply_cors(&self) -> Result<()> {
        let path = format!("{}/cors", bucket_path(&self.bucket));
        let resp = self.client.put(&path, &cors_rules())?;
        if resp.is_success() {
            Ok(())
        } else {
            Err(DeployError::ApiRejected {
                operation: format!("CORS update of bucket '{}'", self.bucket),
                status: resp.status,
                message: resp.error_message(),
            })
        }
    }

    /// Create the bucket if needed, then install the CORS rules.
    pub fn setup(&self) -> Result<BucketState> {
        let state = self.create()?;
        self.apply_cors()?;
        Ok(state)
    }
}

/// Any origin may upload or delete; any request header is allowed.
pub fn cors_rules() -> Value {
    json!({
        "rules": [{
            "allowed": {
                "methods": CORS_METHODS,
                "origins": ["*"],
                "headers": ["*"]
            }
        }]
    })
}

fn bucket_path(bucket: &str) -> String {
    format!("/r2/buckets/{bucket}")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::errors::ErrorKind;
    use crate::core::traits::fakes::{FakePlane, reply};

    fn provisioner(plane: FakePlane) -> BucketProvisioner<FakePlane> {
        BucketProvisioner {
            client: plane,
            bucket: "acme-public".into(),
        }
    }

    #[test]
    fn setup_creates_bucket_then_sets_cors() {
        let p = provisioner(FakePlane::with(vec![
            reply(200, json!({ "success": true, "result": { "name": "acme-public" } })),
            reply(200, json!({ "success": true, "result": {} })),
        ]));

        assert_eq!(p.setup().unwrap(), BucketState::Created);
        let requests = p.client.requests();
        assert_eq!(requests[0].0, "POST");
        assert_eq!(requests[0].1, "/r2/buckets");
        assert_eq!(requests[0].2, Some(json!({ "name": "acme-public" })));
        assert_eq!(requests[1].0, "PUT");
        assert_eq!(requests[1].1, "/r2/buckets/acme-public/cors");
        assert_eq!(
            requests[1].2.as_ref().unwrap()["rules"][0]["allowed"]["methods"],
            json!(["DELETE", "POST", "PUT"])
        );
    }

    #[test]
    fn owned_bucket_still_gets_cors() {
        let p = provisioner(FakePlane::with(vec![
            reply(
                409,
                json!({
                    "success": false,
                    "errors": [{ "code": 10004, "message": "The bucket you tried to create already exists, and you own it." }]
                }),
            ),
            reply(200, json!({ "success": true, "result": {} })),
        ]));

        assert_eq!(p.setup().unwrap(), BucketState::Exists);
        assert_eq!(p.client.requests().len(), 2);
    }

    #[test]
    fn other_create_failure_is_fatal_and_skips_cors() {
        let p = provisioner(FakePlane::with(vec![reply(
            403,
            json!({ "success": false, "errors": [{ "code": 10000, "message": "Authentication error" }] }),
        )]));

        let err = p.setup().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fatal);
        assert!(err.to_string().contains("Authentication error"));
        assert_eq!(p.client.requests().len(), 1);
    }

    #[test]
    fn rejected_cors_is_reported() {
        let p = provisioner(FakePlane::with(vec![
            reply(200, json!({ "success": true })),
            reply(400, json!({ "success": false, "errors": [{ "message": "bad rule" }] })),
        ]));

        let err = p.setup().unwrap_err();
        assert!(err.to_string().contains("CORS update of bucket 'acme-public'"));
    }

    #[test]
    fn check_maps_404_to_missing() {
        let p = provisioner(FakePlane::with(vec![reply(404, json!(null))]));
        assert_eq!(p.check().unwrap(), BucketState::Missing);
        assert_eq!(p.client.requests()[0].1, "/r2/buckets/acme-public");
    }
}
