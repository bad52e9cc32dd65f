use anyhow::Context;
use carecore::schedule::PeriodicTask;
use chrono::Utc;
use clap::Parser;
use generator::profile::build_facility_snapshot;
use gui_bridge::bridge::{build_dashboard, GuiBridge};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Facility telemetry driver for the CareTrace dashboard")]
struct Args {
    /// Build a single offline report and emit a baseline summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 6)]
    residents: u64,
    #[arg(long, default_value_t = 240)]
    samples: usize,
    #[arg(long, default_value_t = 20.0)]
    bucket: f64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Resident whose report the bridge serves
    #[arg(long, default_value_t = 1)]
    resident: u64,
    /// Snapshot refresh period in seconds while serving
    #[arg(long, default_value_t = 10)]
    refresh_secs: u64,
    /// Keep the HTTP bridge alive and refresh the snapshot periodically
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.residents, args.samples, args.bucket)
    };

    let runner = Arc::new(Runner::new(workflow_config.clone()));
    let generator_config = workflow_config.to_generator_config(args.seed);
    let snapshot = build_facility_snapshot(&generator_config)?;
    let gui_bridge = Arc::new(GuiBridge::new(runner.clone(), snapshot.clone(), args.resident));

    if args.offline {
        let result = runner.execute(&snapshot, args.resident, Utc::now());

        println!(
            "Offline report -> resident {}, {} path points, {} zones, {} events, status {}",
            result.user_id,
            result.movement_path.len(),
            result.heatmap.len(),
            result.events.len(),
            result.isolation_level.as_str()
        );

        let dashboard = build_dashboard(&runner, &snapshot, args.resident);
        gui_bridge.publish(snapshot.clone(), dashboard)?;
        gui_bridge.publish_status("Offline report results ready.");

        let report = format!(
            "resident={} path_points={} zones={} events={} total_minutes={} status={}\n",
            result.user_id,
            result.movement_path.len(),
            result.heatmap.len(),
            result.events.len(),
            result.total_minutes,
            result.isolation_level.as_str()
        );
        let report_path = PathBuf::from("tools/data/offline_report.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
    }
    if args.serve {
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for the serve loop")?;
        runtime.block_on(async {
            let refresh = {
                let bridge = gui_bridge.clone();
                let runner = runner.clone();
                let base_config = generator_config.clone();
                let focus_user = args.resident;
                let mut refresh_round: u64 = 0;
                PeriodicTask::spawn(Duration::from_secs(args.refresh_secs.max(1)), move || {
                    refresh_round += 1;
                    let mut config = base_config.clone();
                    config.seed = base_config.seed.wrapping_add(refresh_round);
                    match build_facility_snapshot(&config) {
                        Ok(snapshot) => {
                            let dashboard = build_dashboard(&runner, &snapshot, focus_user);
                            if let Err(err) = bridge.publish(snapshot, dashboard) {
                                log::warn!("refresh publish failed: {}", err);
                            }
                        }
                        Err(err) => log::warn!("snapshot refresh failed: {}", err),
                    }
                })
            };
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            refresh.cancel();
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
