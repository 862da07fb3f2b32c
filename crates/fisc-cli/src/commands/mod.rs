//! Subcommand handlers and shared file-loading helpers.

use std::path::Path;

use anyhow::Context;

pub mod explain;
pub mod extract;
pub mod fetch;
pub mod store;

/// Read an indentation-encoded tree file into one string per line, indentation
/// preserved.
pub(crate) fn read_tree_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tree file {}", path.display()))?;
    Ok(raw.lines().map(str::to_string).collect())
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn tree_lines_keep_indentation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a <1500>\n  b <1000>\n    c <1000>\n").unwrap();
        let lines = read_tree_lines(file.path()).unwrap();
        assert_eq!(
            lines,
            vec![
                "a <1500>".to_string(),
                "  b <1000>".to_string(),
                "    c <1000>".to_string(),
            ]
        );
    }

    #[test]
    fn json_helper_reports_the_offending_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = read_json::<fisc_core::EntityDescription>(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }
}
