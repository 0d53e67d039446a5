//! Company facts dataset used to ground FAQ answers.
//!
//! Loaded once at startup and shared read-only for the life of the process.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

#[derive(Debug)]
pub enum DatasetError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    /// The top-level JSON value is not an object.
    NotAnObject { path: PathBuf },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read dataset '{}': {}", path.display(), source)
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse dataset '{}': {}", path.display(), source)
            }
            Self::NotAnObject { path } => {
                write!(f, "dataset '{}' must be a JSON object", path.display())
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::NotAnObject { .. } => None,
        }
    }
}

/// Immutable company document plus its prompt rendering.
#[derive(Debug, Clone)]
pub struct CompanyFacts {
    document: Value,
    /// Pretty JSON embedded verbatim in FAQ prompts. Rendered once.
    rendered: String,
}

impl CompanyFacts {
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DatasetError::Read { path: path.to_path_buf(), source: e })?;
        let document: Value = serde_json::from_str(&content)
            .map_err(|e| DatasetError::Parse { path: path.to_path_buf(), source: e })?;
        if !document.is_object() {
            return Err(DatasetError::NotAnObject { path: path.to_path_buf() });
        }

        let facts = Self::from_value(document);
        info!(
            "Loaded dataset from {} ({} bytes rendered)",
            path.display(),
            facts.rendered.len()
        );
        Ok(facts)
    }

    pub fn from_value(document: Value) -> Self {
        let rendered = serde_json::to_string_pretty(&document).unwrap_or_else(|_| document.to_string());
        Self { document, rendered }
    }

    /// Company name from `company_info.name`, if present.
    pub fn name(&self) -> Option<&str> {
        self.document
            .get("company_info")
            .and_then(|info| info.get("name"))
            .and_then(Value::as_str)
    }

    /// The document as it appears inside prompts.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_dataset(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_and_name() {
        let file = write_dataset(r#"{"company_info": {"name": "TecnoMant", "city": "Córdoba"}}"#);
        let facts = CompanyFacts::load(file.path()).unwrap();
        assert_eq!(facts.name(), Some("TecnoMant"));
    }

    #[test]
    fn test_rendering_keeps_key_order_and_unicode() {
        let file = write_dataset(r#"{"zeta": 1, "alpha": "reparación"}"#);
        let facts = CompanyFacts::load(file.path()).unwrap();
        let rendered = facts.rendered();
        assert!(rendered.find("zeta").unwrap() < rendered.find("alpha").unwrap());
        assert!(rendered.contains("reparación"));
        assert!(rendered.contains("\n  \"alpha\""));
    }

    #[test]
    fn test_missing_name() {
        let facts = CompanyFacts::from_value(serde_json::json!({"services": []}));
        assert_eq!(facts.name(), None);
    }

    #[test]
    fn test_not_an_object() {
        let file = write_dataset("[1, 2, 3]");
        let err = CompanyFacts::load(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::NotAnObject { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = CompanyFacts::load(Path::new("/nonexistent/dataset.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Read { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let file = write_dataset("{ nope");
        let err = CompanyFacts::load(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
    }
}
