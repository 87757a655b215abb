//! Minimal `PlanMetadataProvider` (spec §6.1) for the standalone CLI.
//!
//! Workspace/backend are a pure projection over the plan's own
//! `configuration`/`backend` fields; the plan file's modification time is
//! the one piece of ambient state the core is allowed to touch, and a
//! lookup failure here is recovered silently (`created_at` stays empty)
//! rather than failing the run.

use chrono::{DateTime, Utc};
use serde_json::Value as Json;

use crate::plan::model::BackendInfo;
use crate::plan::PlanMetadataProvider;

pub struct FileSystemMetadataProvider;

impl PlanMetadataProvider for FileSystemMetadataProvider {
    fn workspace_backend(&self, plan: &Json) -> (String, BackendInfo) {
        let workspace = plan
            .get("configuration")
            .and_then(|c| c.get("workspace"))
            .and_then(|w| w.as_str())
            .unwrap_or("default")
            .to_string();

        let backend = plan
            .get("configuration")
            .and_then(|c| c.get("backend"))
            .or_else(|| plan.get("backend"));

        let backend_type = backend
            .and_then(|b| b.get("type"))
            .and_then(|t| t.as_str())
            .unwrap_or("local")
            .to_string();
        let location = backend
            .and_then(|b| b.get("config"))
            .and_then(|c| c.get("path").or_else(|| c.get("bucket")))
            .and_then(|p| p.as_str())
            .unwrap_or("-")
            .to_string();

        (workspace, BackendInfo { backend_type, location })
    }

    fn plan_file_metadata(&self, plan_file_path: &str) -> Option<String> {
        let metadata = std::fs::metadata(plan_file_path)
            .inspect_err(|err| {
                tracing::debug!(path = %plan_file_path, error = %err, "plan file metadata unavailable");
            })
            .ok()?;
        let modified = metadata.modified().ok()?;
        let datetime: DateTime<Utc> = modified.into();
        Some(datetime.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn workspace_backend_defaults_when_absent() {
        let provider = FileSystemMetadataProvider;
        let (workspace, backend) = provider.workspace_backend(&json!({}));
        assert_eq!(workspace, "default");
        assert_eq!(backend.backend_type, "local");
        assert_eq!(backend.location, "-");
    }

    #[test]
    fn workspace_backend_reads_configuration() {
        let provider = FileSystemMetadataProvider;
        let plan = json!({
            "configuration": {
                "workspace": "staging",
                "backend": {"type": "s3", "config": {"bucket": "tfstate"}}
            }
        });
        let (workspace, backend) = provider.workspace_backend(&plan);
        assert_eq!(workspace, "staging");
        assert_eq!(backend.backend_type, "s3");
        assert_eq!(backend.location, "tfstate");
    }

    #[test]
    fn metadata_unavailable_for_missing_file() {
        let provider = FileSystemMetadataProvider;
        assert!(provider.plan_file_metadata("/nonexistent/path/plan.json").is_none());
    }

    #[test]
    fn metadata_reads_real_file_modification_time() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{}}").unwrap();

        let provider = FileSystemMetadataProvider;
        let stamp = provider.plan_file_metadata(file.path().to_str().unwrap());
        assert!(stamp.is_some());
        assert!(stamp.unwrap().contains('T'));
    }
}
