/// Read-only loader for the guide snapshot produced by the knowledge-base store.
///
/// The store owns validation and sanitization; this only parses what it exported.
use std::collections::HashSet;
use std::path::Path;

use guide_core::model::Guide;
use tracing::warn;

use crate::error::AppError;

pub fn load_snapshot(path: &Path) -> Result<Vec<Guide>, AppError> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_snapshot(&content)
}

pub fn parse_snapshot(content: &str) -> Result<Vec<Guide>, AppError> {
    let guides: Vec<Guide> = serde_json::from_str(content)?;

    let mut seen = HashSet::new();
    for guide in &guides {
        if !seen.insert(guide.id.as_str()) {
            warn!(id = %guide.id, "duplicate guide id in snapshot");
        }
    }

    Ok(guides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal() {
        let content = r#"[
            {
                "id": "pw-reset",
                "title": "Password Reset Procedure",
                "summary": "Step-by-step guide to reset user passwords",
                "tags": ["password", "active-directory"],
                "steps": [
                    {"title": "Verify User Identity", "bodyRich": "<p>Ask for the badge number.</p>"}
                ]
            },
            {"id": "bare"}
        ]"#;

        let guides = parse_snapshot(content).expect("parse should succeed");
        assert_eq!(guides.len(), 2);
        assert_eq!(guides[0].tags.len(), 2);
        assert_eq!(guides[0].steps[0].body_rich, "<p>Ask for the badge number.</p>");
        assert!(guides[1].steps.is_empty());
        assert!(guides[1].summary.is_empty());
    }

    #[test]
    fn duplicate_ids_are_kept() {
        let guides = parse_snapshot(r#"[{"id":"x"},{"id":"x"}]"#).expect("parse");
        assert_eq!(guides.len(), 2);
    }

    #[test]
    fn rejects_non_array() {
        assert!(matches!(
            parse_snapshot(r#"{"id":"x"}"#),
            Err(AppError::Snapshot(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_snapshot(Path::new("./definitely/not/here.json")).expect_err("missing");
        assert!(matches!(err, AppError::Io { .. }));
    }
}
