use crate::config::LoadConfiguration;
use load_util::Batch;
use std::fmt;
use std::path::PathBuf;

/// `ycsb load` invocation shared by every instance, before the per-batch range is appended.
#[derive(Debug, Clone)]
pub struct CommandTemplate {
    program: PathBuf,
    base_args: Vec<String>,
}

impl CommandTemplate {
    #[must_use]
    pub fn new(config: &LoadConfiguration) -> Self {
        let mut base_args = vec!["load".to_owned()];
        if config.print_status {
            base_args.push("-s".to_owned());
        }
        base_args.push(config.client.clone());
        for arg in &config.properties {
            push_pair(&mut base_args, "-p", arg.clone());
        }
        for arg in &config.property_files {
            push_pair(&mut base_args, "-P", arg.clone());
        }
        // the grand total, not this invocation's share
        push_pair(
            &mut base_args,
            "-p",
            format!("recordcount={}", config.total_record_count),
        );
        Self {
            program: config.ycsb_path.clone(),
            base_args,
        }
    }

    #[must_use]
    pub fn for_batch(&self, batch: &Batch, endpoint: Option<&str>) -> BatchCommand {
        let mut args = self.base_args.clone();
        push_pair(&mut args, "-p", format!("insertstart={}", batch.start_record));
        push_pair(&mut args, "-p", format!("insertcount={}", batch.count));
        if let Some(endpoint) = endpoint {
            push_pair(&mut args, "-p", endpoint_property(endpoint));
        }
        BatchCommand {
            program: self.program.clone(),
            args,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl BatchCommand {
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn to_command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for BatchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in self.args() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[inline]
fn push_pair(args: &mut Vec<String>, flag: &str, value: String) {
    args.push(flag.to_owned());
    args.push(value);
}

/// `endpoint=grpc://host:2135` is forwarded as is, a bare `grpc://host:2135` gets the key prepended.
fn endpoint_property(endpoint: &str) -> String {
    if endpoint.contains('=') {
        endpoint.to_owned()
    } else {
        format!("endpoint={endpoint}")
    }
}
