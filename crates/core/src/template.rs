use std::path::Path;

use tracing::debug;

use crate::error::{InputKind, Result, SubstError};

/// Read the template as opaque bytes. No structure or encoding is checked.
pub fn load_template(path: &Path) -> Result<Vec<u8>> {
    let raw = std::fs::read(path).map_err(|source| SubstError::Read {
        what: InputKind::Template,
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = raw.len(), "loaded template");
    Ok(raw)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.yaml");
        std::fs::write(&path, "a:\n  b: ${x}\n\n").unwrap();
        assert_eq!(load_template(&path).unwrap(), b"a:\n  b: ${x}\n\n");
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_template(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(
            err,
            SubstError::Read {
                what: InputKind::Template,
                ..
            }
        ));
        assert!(err.to_string().starts_with("Error reading template file"));
    }

    #[test]
    fn non_utf8_is_kept_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.yaml");
        std::fs::write(&path, b"caf\xe9: ${x}\n").unwrap();
        assert_eq!(load_template(&path).unwrap(), b"caf\xe9: ${x}\n");
    }
}
