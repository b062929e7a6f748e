use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable that pins the mmseqs binary to an exact path,
/// bypassing the `PATH` search.
pub const MMSEQS_BINARY_ENV: &str = "MMSEQS_BINARY";

const BINARY_NAME: &str = "mmseqs";

/// Locate the mmseqs executable.
///
/// `$MMSEQS_BINARY` wins when set (and must point at an existing file);
/// otherwise each directory in `$PATH` is searched for `mmseqs`.
pub fn resolve_mmseqs_binary() -> Result<PathBuf> {
    if let Some(overridden) = env::var_os(MMSEQS_BINARY_ENV) {
        let path = PathBuf::from(overridden);
        if path.is_file() {
            return Ok(path);
        }
        return Err(Error::BinaryResolution(format!(
            "${MMSEQS_BINARY_ENV} points at {} which does not exist",
            path.to_string_lossy()
        )));
    }

    if let Some(path_var) = env::var_os("PATH") {
        for dir in env::split_paths(&path_var) {
            let candidate = dir.join(BINARY_NAME);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    Err(Error::BinaryResolution(format!(
        "{BINARY_NAME} was not found in $PATH; install MMseqs2 or set ${MMSEQS_BINARY_ENV}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    // One test so the MMSEQS_BINARY mutations can't race each other.
    #[test]
    fn env_override_is_honored_then_checked() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("mmseqs");
        fs::write(&fake, "#!/bin/sh\n").unwrap();

        env::set_var(MMSEQS_BINARY_ENV, &fake);
        assert_eq!(resolve_mmseqs_binary().unwrap(), fake);

        env::set_var(MMSEQS_BINARY_ENV, dir.path().join("missing"));
        assert!(matches!(
            resolve_mmseqs_binary(),
            Err(Error::BinaryResolution(_))
        ));

        env::remove_var(MMSEQS_BINARY_ENV);
    }
}
