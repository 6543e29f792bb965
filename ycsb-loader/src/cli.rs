use clap::Parser;
use std::path::PathBuf;

/// When there are more instances than CPU cores it helps to stagger their starts.
pub const SLEEP_BETWEEN_INSTANCES_DEFAULT: f64 = 0.5;

#[derive(Debug, Clone, Parser)]
#[command(name = "ycsb-loader")]
#[command(about = "YCSB multi-instance loader", long_about = None)]
pub struct Args {
    /// YCSB database client binding, e.g. `ydb`
    #[arg(value_name = "DB_CLIENT")]
    pub client: String,

    /// Forwarded to `ycsb load` as `-s`
    #[arg(short = 's')]
    pub print_status: bool,

    /// Forwarded to `ycsb load` as `-p`
    #[arg(short = 'p', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,

    /// Forwarded to `ycsb load` as `-P`
    #[arg(short = 'P', value_name = "PATH")]
    pub property_files: Vec<String>,

    /// Endpoints to split the load across, round-robin by instance
    #[arg(short = 'e', long = "endpoint")]
    pub endpoints: Vec<String>,

    /// Number of records to load
    #[arg(short = 'n', value_name = "COUNT")]
    pub record_count: u64,

    /// Number of total records in case of multiple loaders, 0 means `-n`
    #[arg(long = "total-records", value_name = "COUNT", default_value_t = 0)]
    pub total_record_count: u64,

    /// Starting record in case of multiple loaders
    #[arg(long, value_name = "OFFSET", default_value_t = 0)]
    pub start_record: u64,

    /// Number of instances to run
    #[arg(short = 'j', value_name = "FACTOR")]
    pub split_factor: usize,

    /// Create a log file pair for each instance in this (new) directory
    #[arg(short = 'o', long)]
    pub logs_dir: Option<PathBuf>,

    /// Seconds to sleep between starting instances
    #[arg(long, value_name = "SECONDS", default_value_t = SLEEP_BETWEEN_INSTANCES_DEFAULT)]
    pub sleep: f64,

    /// Don't execute commands, just print them
    #[arg(long)]
    pub dry_run: bool,

    /// Path of the `ycsb` launcher script
    #[arg(long, env = "YCSB_PATH", default_value = "./bin/ycsb")]
    pub ycsb_path: PathBuf,
}
