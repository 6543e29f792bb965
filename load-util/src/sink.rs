use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Where a child's stdout and stderr end up.
#[derive(Debug, Clone)]
pub enum OutputSinks {
    Discard,
    LogFiles { dir: PathBuf },
}

impl OutputSinks {
    #[must_use]
    pub fn new(logs_dir: Option<&Path>) -> Self {
        match logs_dir {
            Some(dir) => Self::LogFiles {
                dir: dir.to_path_buf(),
            },
            None => Self::Discard,
        }
    }

    /// `<index>.out` and `<index>.err` inside the logs directory, if there is one.
    #[must_use]
    pub fn paths(&self, batch_index: usize) -> Option<(PathBuf, PathBuf)> {
        match self {
            Self::Discard => None,
            Self::LogFiles { dir } => Some((
                dir.join(format!("{batch_index}.out")),
                dir.join(format!("{batch_index}.err")),
            )),
        }
    }

    /// Opens (truncating) the stdout and stderr sinks for one batch.
    pub fn open(&self, batch_index: usize) -> io::Result<(Stdio, Stdio)> {
        let Some((out, err)) = self.paths(batch_index) else {
            return Ok((Stdio::null(), Stdio::null()));
        };
        let out = File::create(out)?;
        let err = File::create(err)?;
        Ok((Stdio::from(out), Stdio::from(err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discard_has_no_paths() {
        let sinks = OutputSinks::new(None);
        assert!(sinks.paths(0).is_none());
        assert!(sinks.open(0).is_ok());
    }

    #[test]
    fn log_files_are_named_by_index() {
        let dir = tempfile::tempdir().unwrap();
        let sinks = OutputSinks::new(Some(dir.path()));
        let (out, err) = sinks.paths(3).unwrap();
        assert_eq!(dir.path().join("3.out"), out);
        assert_eq!(dir.path().join("3.err"), err);

        sinks.open(3).unwrap();
        assert!(out.is_file());
        assert!(err.is_file());
    }

    #[test]
    fn missing_dir_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let sinks = OutputSinks::new(Some(&dir.path().join("nope")));
        assert!(sinks.open(0).is_err());
    }
}
