/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};

use gangsched::config::{resolve_scoring_mode, SchedulerArgs};
use gangsched::cycle::{run_with_timeout, CycleOutcome};
use gangsched::inventory::ClusterSnapshot;
use gangsched::pod::Pod;
use gangsched::scheduler::GangScheduler;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Gang-aware scheduler driver.
///
/// Runs one scheduling cycle per pod in a cluster snapshot and logs the
/// admission decision and normalized node scores.
///
/// Example:
///   gangsched -c demos/cluster.yaml -a demos/scheduler-args.yaml
#[derive(Debug, Parser)]
#[command(
    name = "gangsched",
    about = "Gang-aware admission and memory-based node scoring",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML scheduler args (scoring mode).  Defaults to Least.
    #[arg(short = 'a', long = "args")]
    args: Option<PathBuf>,

    /// Path to the YAML cluster snapshot (nodes and pods).
    #[arg(short = 'c', long = "cluster")]
    cluster: PathBuf,

    /// Schedule only this pod (default: every pod, in file order).
    #[arg(short = 'p', long = "pod")]
    pod: Option<String>,

    /// Per-cycle deadline in milliseconds.
    #[arg(short = 't', long = "timeout-ms", default_value_t = 1000)]
    timeout_ms: u64,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        args       = ?cli.args,
        cluster    = %cli.cluster.display(),
        pod        = ?cli.pod,
        timeout_ms = cli.timeout_ms,
        "Configuration"
    );

    // ── Scoring mode ──────────────────────────────────────────────────────────
    let args = match &cli.args {
        Some(path) => match SchedulerArgs::load_from_file(path) {
            Ok(args) => Some(args),
            Err(e) => {
                error!("Failed to load scheduler args: {:#}", e);
                process::exit(1);
            }
        },
        None => None,
    };
    let mode = match resolve_scoring_mode(args.as_ref()) {
        Ok(mode) => mode,
        Err(e) => {
            error!("Invalid scheduler configuration: {}", e);
            process::exit(1);
        }
    };

    // ── Cluster snapshot ──────────────────────────────────────────────────────
    let mut snapshot = ClusterSnapshot::new();
    if let Err(e) = snapshot.load_from_file(&cli.cluster) {
        error!("Failed to load cluster snapshot: {:#}", e);
        process::exit(1);
    }

    let pods: Vec<Pod> = match &cli.pod {
        Some(name) => match snapshot.get_pod(name) {
            Some(pod) => vec![pod.clone()],
            None => {
                error!("Pod '{}' not found in cluster snapshot", name);
                process::exit(1);
            }
        },
        None => snapshot.pods().to_vec(),
    };
    if pods.is_empty() {
        warn!("Cluster snapshot contains no pods, nothing to schedule");
        return;
    }

    let candidates = snapshot.node_names();
    let snapshot = Arc::new(snapshot);
    let scheduler = Arc::new(GangScheduler::new(mode, snapshot.clone(), snapshot));
    let timeout = Duration::from_millis(cli.timeout_ms);

    // ── Cycles ────────────────────────────────────────────────────────────────
    for pod in pods {
        let name = pod.name.clone();
        match run_with_timeout(scheduler.clone(), pod, candidates.clone(), timeout).await {
            Ok(CycleOutcome::Rejected(reason)) => {
                info!(pod = %name, "unschedulable: {}", reason);
            }
            Ok(CycleOutcome::Scored(scored)) => {
                for s in &scored.scores {
                    info!(pod = %name, node = %s.name, score = s.score, "  normalized score");
                }
                for f in &scored.failures {
                    warn!(pod = %name, node = %f.node, "  not scored: {}", f.error);
                }
                match scored.best() {
                    Some(best) => info!(pod = %name, node = %best.name, "best node"),
                    None => warn!(pod = %name, "no node could be scored"),
                }
            }
            Err(e) => {
                error!(pod = %name, "scheduling failed: {}", e);
            }
        }
    }
}
