use crate::command::{BatchCommand, CommandTemplate};
use crate::config::LoadConfiguration;
use crate::statistics::RunStatistics;
use anyhow::Context;
use load_util::sink::OutputSinks;
use load_util::{partition, Batch, BatchOutcome, BatchStatus, EndpointRotation};
use tokio::process::Child;
use tokio::time::Instant;

struct Launched {
    batch: Batch,
    endpoint: Option<String>,
    child: Child,
}

/// Starts one `ycsb load` per batch, staggered by the configured sleep, then waits for all of them.
///
/// A batch that fails to start or exits non-zero is recorded in the returned statistics,
/// the remaining batches are unaffected.
pub(crate) async fn run(config: &LoadConfiguration, template: &CommandTemplate) -> RunStatistics {
    let batches = partition(config.record_count, config.split_factor, config.start_record);
    let rotation = EndpointRotation::new(config.endpoints.clone());
    let sinks = OutputSinks::new(config.logs_dir.as_deref());

    let mut launched = Vec::with_capacity(batches.len());
    let mut outcomes = Vec::with_capacity(batches.len());
    let start = Instant::now();
    for (i, batch) in batches.iter().enumerate() {
        let endpoint = rotation.endpoint_for(batch.index);
        let command = template.for_batch(batch, endpoint);
        if config.dry_run {
            tracing::debug!(batch = batch.index, "Dry run batch #{}", batch.index);
            println!("{command}");
            outcomes.push(BatchOutcome::new(*batch, endpoint, BatchStatus::DryRun));
        } else {
            tracing::info!(
                batch = batch.index,
                start = batch.start_record,
                count = batch.count,
                "Starting batch #{}: {command}",
                batch.index
            );
            match spawn(&command, &sinks, batch.index) {
                Ok(child) => launched.push(Launched {
                    batch: *batch,
                    endpoint: endpoint.map(str::to_owned),
                    child,
                }),
                Err(e) => {
                    tracing::error!(batch = batch.index, "{e:#}");
                    outcomes.push(BatchOutcome::new(
                        *batch,
                        endpoint,
                        BatchStatus::SpawnFailed {
                            error: format!("{e:#}"),
                        },
                    ));
                }
            }
        }
        if !config.sleep.is_zero() && i + 1 < batches.len() {
            tokio::time::sleep(config.sleep).await;
        }
    }

    // now wait all finished
    for Launched {
        batch,
        endpoint,
        mut child,
    } in launched
    {
        let status = match child.wait().await {
            Ok(status) => {
                if !status.success() {
                    tracing::warn!(batch = batch.index, %status, "Batch #{} failed", batch.index);
                }
                BatchStatus::Exited {
                    code: status.code(),
                }
            }
            Err(e) => {
                tracing::error!(batch = batch.index, "Failed to wait for batch #{}: {e}", batch.index);
                BatchStatus::WaitFailed {
                    error: e.to_string(),
                }
            }
        };
        outcomes.push(BatchOutcome::new(batch, endpoint.as_deref(), status));
    }

    RunStatistics::calculate(start.elapsed(), config.record_count, outcomes)
}

fn spawn(command: &BatchCommand, sinks: &OutputSinks, batch_index: usize) -> anyhow::Result<Child> {
    let (out, err) = sinks
        .open(batch_index)
        .with_context(|| format!("Failed to open output files for batch #{batch_index}"))?;
    command
        .to_command()
        .stdout(out)
        .stderr(err)
        .spawn()
        .with_context(|| format!("Failed to start {command}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config(ycsb_path: PathBuf, logs_dir: Option<PathBuf>, dry_run: bool) -> LoadConfiguration {
        LoadConfiguration {
            client: "ydb".to_owned(),
            print_status: false,
            properties: vec![],
            property_files: vec![],
            endpoints: vec!["A".to_owned(), "B".to_owned()],
            record_count: 1000,
            total_record_count: 1000,
            start_record: 0,
            split_factor: 4,
            logs_dir,
            sleep: Duration::ZERO,
            dry_run,
            ycsb_path,
        }
    }

    #[tokio::test]
    async fn dry_run_spawns_nothing() {
        let config = config(PathBuf::from("/definitely/not/ycsb"), None, true);
        let stats = run(&config, &CommandTemplate::new(&config)).await;
        assert_eq!(4, stats.batches.len());
        assert!(stats
            .batches
            .iter()
            .all(|outcome| outcome.status == BatchStatus::DryRun));
        assert_eq!(1, stats.elapsed_secs);
        assert_eq!(1000, stats.throughput);
        let endpoints: Vec<_> = stats
            .batches
            .iter()
            .map(|outcome| outcome.endpoint.as_deref())
            .collect();
        assert_eq!(vec![Some("A"), Some("B"), Some("A"), Some("B")], endpoints);
    }

    #[tokio::test(start_paused = true)]
    async fn launches_are_staggered_by_sleep() {
        let mut config = config(PathBuf::from("/definitely/not/ycsb"), None, true);
        config.sleep = Duration::from_secs(1);
        let stats = run(&config, &CommandTemplate::new(&config)).await;
        // three gaps between four launches, none after the last
        assert_eq!(3, stats.elapsed_secs);
        assert_eq!(333, stats.throughput);
    }

    #[tokio::test]
    async fn spawn_failure_does_not_stop_siblings() {
        let config = config(PathBuf::from("/definitely/not/ycsb"), None, false);
        let stats = run(&config, &CommandTemplate::new(&config)).await;
        assert_eq!(4, stats.batches.len());
        assert_eq!(4, stats.failed());
        assert!(matches!(
            stats.batches[3].status,
            BatchStatus::SpawnFailed { .. }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn children_write_to_their_own_files() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        std::fs::create_dir(&logs).unwrap();
        let config = config(PathBuf::from("echo"), Some(logs.clone()), false);

        let stats = run(&config, &CommandTemplate::new(&config)).await;
        assert_eq!(0, stats.failed());
        for i in 0..4 {
            let out = std::fs::read_to_string(logs.join(format!("{i}.out"))).unwrap();
            assert!(out.contains(&format!("insertstart={}", i * 250)), "{out}");
            assert!(out.contains("insertcount=250"), "{out}");
            assert!(logs.join(format!("{i}.err")).is_file());
        }
    }
}
