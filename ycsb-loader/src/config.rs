use crate::cli::Args;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("-j argument must be greater than 1, got {0}")]
    SplitFactorTooSmall(usize),
    #[error("-n must not be less than -j, got -n {record_count} -j {split_factor}")]
    RecordCountTooSmall {
        record_count: u64,
        split_factor: usize,
    },
    #[error("--start-record {start_record} plus -n {record_count} exceeds the record id range")]
    RecordRangeOverflow { start_record: u64, record_count: u64 },
    #[error("--sleep must be a non-negative number of seconds, got {0}")]
    InvalidSleep(f64),
    #[error("No ycsb found at {}", .0.display())]
    ExecutableNotFound(PathBuf),
    #[error("{} already exists", .0.display())]
    LogsDirExists(PathBuf),
    #[error("Failed to create '{}': {source}", .path.display())]
    LogsDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }
}

/// Everything a run needs, validated once before anything is spawned.
#[derive(Debug, Clone)]
pub struct LoadConfiguration {
    pub client: String,
    pub print_status: bool,
    pub properties: Vec<String>,
    pub property_files: Vec<String>,
    pub endpoints: Vec<String>,
    pub record_count: u64,
    /// Reported to every instance as `recordcount`.
    pub total_record_count: u64,
    pub start_record: u64,
    pub split_factor: usize,
    pub logs_dir: Option<PathBuf>,
    pub sleep: Duration,
    pub dry_run: bool,
    pub ycsb_path: PathBuf,
}

impl LoadConfiguration {
    /// Validates `args` and creates the logs directory.
    ///
    /// The directory is created last so a rejected configuration leaves the filesystem untouched.
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let config = Self::validate(args)?;
        if let Some(dir) = &config.logs_dir {
            prepare_logs_dir(dir)?;
        }
        Ok(config)
    }

    fn validate(args: Args) -> Result<Self, ConfigError> {
        if args.split_factor <= 1 {
            return Err(ConfigError::SplitFactorTooSmall(args.split_factor));
        }
        if args.record_count < args.split_factor as u64 {
            return Err(ConfigError::RecordCountTooSmall {
                record_count: args.record_count,
                split_factor: args.split_factor,
            });
        }
        if args.start_record.checked_add(args.record_count).is_none() {
            return Err(ConfigError::RecordRangeOverflow {
                start_record: args.start_record,
                record_count: args.record_count,
            });
        }
        let sleep = Duration::try_from_secs_f64(args.sleep)
            .map_err(|_| ConfigError::InvalidSleep(args.sleep))?;

        if locate_executable(&args.ycsb_path).is_none() {
            if !args.dry_run {
                return Err(ConfigError::ExecutableNotFound(args.ycsb_path));
            }
            tracing::warn!(path = %args.ycsb_path.display(), "No ycsb found, continuing with dry run");
        }
        if let Some(dir) = &args.logs_dir {
            if dir.exists() {
                return Err(ConfigError::LogsDirExists(dir.clone()));
            }
        }

        let total_record_count = if args.total_record_count == 0 {
            args.record_count
        } else {
            args.total_record_count
        };

        Ok(Self {
            client: args.client,
            print_status: args.print_status,
            properties: args.properties,
            property_files: args.property_files,
            endpoints: args.endpoints,
            record_count: args.record_count,
            total_record_count,
            start_record: args.start_record,
            split_factor: args.split_factor,
            logs_dir: args.logs_dir,
            sleep,
            dry_run: args.dry_run,
            ycsb_path: args.ycsb_path,
        })
    }
}

fn prepare_logs_dir(dir: &Path) -> Result<(), ConfigError> {
    // Checked again here, `create_dir_all` would happily accept an existing directory.
    if dir.exists() {
        return Err(ConfigError::LogsDirExists(dir.to_path_buf()));
    }
    std::fs::create_dir_all(dir).map_err(|source| ConfigError::LogsDirCreate {
        path: dir.to_path_buf(),
        source,
    })
}

/// Resolves a bare program name through `PATH`, anything with a separator as a file path.
fn locate_executable(path: &Path) -> Option<PathBuf> {
    if path.components().count() > 1 || path.is_absolute() {
        return path.is_file().then(|| path.to_path_buf());
    }
    let search = std::env::var_os("PATH")?;
    std::env::split_paths(&search)
        .map(|dir| dir.join(path))
        .find(|candidate| candidate.is_file())
}
