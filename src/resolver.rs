//! Executable resolution against the search path.

use std::ffi::OsString;
use std::path::PathBuf;

use tracing::debug;

use crate::error::Error;

/// An executable found on the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExecutable {
    /// Candidate name that matched.
    pub name: String,
    /// Absolute path to the binary.
    pub path: PathBuf,
}

/// Looks up a single executable name.
///
/// Returns `None` when the name is absent; absence is never an error here.
pub trait PathLookup: Send + Sync {
    fn lookup(&self, name: &str) -> Option<PathBuf>;
}

/// `PATH` lookup backed by the `which` crate.
#[derive(Debug, Clone, Default)]
pub struct WhichLookup {
    search_path: Option<OsString>,
}

impl WhichLookup {
    /// Search the process `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Search an explicit path list instead of the process `PATH`.
    pub fn in_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }
}

impl PathLookup for WhichLookup {
    fn lookup(&self, name: &str) -> Option<PathBuf> {
        match &self.search_path {
            None => which::which(name).ok(),
            Some(paths) => {
                let cwd = std::env::current_dir().ok()?;
                which::which_in(name, Some(paths), cwd).ok()
            }
        }
    }
}

/// First-match-wins resolver over an ordered candidate list.
pub struct Resolver<L = WhichLookup> {
    lookup: L,
}

impl Default for Resolver<WhichLookup> {
    fn default() -> Self {
        Self::new(WhichLookup::new())
    }
}

impl<L: PathLookup> Resolver<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Resolve the earliest candidate present on the search path.
    pub fn resolve<S: AsRef<str>>(&self, candidates: &[S]) -> Result<ResolvedExecutable, Error> {
        for candidate in candidates {
            let name = candidate.as_ref();
            if let Some(path) = self.lookup.lookup(name) {
                debug!(candidate = name, path = %path.display(), "Resolved executable");
                return Ok(ResolvedExecutable {
                    name: name.to_string(),
                    path,
                });
            }
            debug!(candidate = name, "Candidate not on search path");
        }

        Err(Error::NotFound {
            candidates: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeLookup;

    #[test]
    fn test_first_match_wins() {
        let lookup = FakeLookup::with(&["python", "py"]);
        let queries = lookup.queries();
        let resolver = Resolver::new(lookup);
        let resolved = resolver.resolve(&["python3", "python", "py"]).unwrap();

        assert_eq!(resolved.name, "python");
        assert_eq!(resolved.path, PathBuf::from("/usr/bin/python"));
        // "py" is never looked up once "python" matched
        assert_eq!(*queries.lock().unwrap(), vec!["python3", "python"]);
    }

    #[test]
    fn test_prefers_earliest_even_when_all_present() {
        let resolver = Resolver::new(FakeLookup::with(&["python3", "python", "py"]));
        let resolved = resolver.resolve(&["python3", "python", "py"]).unwrap();
        assert_eq!(resolved.name, "python3");
    }

    #[test]
    fn test_exhaustion_lists_all_candidates_in_order() {
        let resolver = Resolver::new(FakeLookup::default());
        let err = resolver.resolve(&["python3", "python", "py"]).unwrap_err();

        match err {
            Error::NotFound { candidates } => {
                assert_eq!(candidates, vec!["python3", "python", "py"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_candidate_list() {
        let resolver = Resolver::new(FakeLookup::with(&["python3"]));
        let err = resolver.resolve::<&str>(&[]).unwrap_err();
        assert!(matches!(err, Error::NotFound { candidates } if candidates.is_empty()));
    }

    #[test]
    fn test_not_found_message_names_candidates() {
        let err = Error::NotFound {
            candidates: vec!["uv".to_string(), "pipx".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "None of the candidate executables were found in PATH (tried: uv, pipx)"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_which_lookup_in_explicit_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("fakepython");
        std::fs::write(&exe, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

        // Not executable, so it must be skipped
        let plain = dir.path().join("notexec");
        std::fs::write(&plain, "").unwrap();
        std::fs::set_permissions(&plain, std::fs::Permissions::from_mode(0o644)).unwrap();

        let resolver = Resolver::new(WhichLookup::in_path(dir.path()));
        let resolved = resolver.resolve(&["notexec", "missing", "fakepython"]).unwrap();

        assert_eq!(resolved.name, "fakepython");
        assert_eq!(resolved.path, exe);
    }
}
