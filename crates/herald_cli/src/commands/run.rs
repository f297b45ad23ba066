//! Run command implementation.

use herald_protocol::{RunReport, RunSummary};
use herald_sync::{
    BeamerPublisher, ProductboardSource, ReqwestClient, RunPlan, SyncConfig, SyncEngine,
};
use serde::Serialize;
use std::error::Error;

/// What a dry run would have published.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DryRunReport {
    /// Items fetched from the source.
    fetched: usize,
    /// Items matching the released label.
    released: usize,
    /// Items dropped by dedup.
    skipped: usize,
    /// Item ids a real run would publish, in order.
    would_publish: Vec<String>,
}

impl From<RunPlan> for DryRunReport {
    fn from(plan: RunPlan) -> Self {
        Self {
            fetched: plan.fetched,
            released: plan.released,
            skipped: plan.skipped,
            would_publish: plan.pending.into_iter().map(|item| item.id).collect(),
        }
    }
}

/// Runs the run command.
///
/// The structured report always goes to stdout, including for fatal
/// failures; the exit code tells the scheduler whether the run completed.
pub fn run(dry_run: bool, format: &str) -> Result<(), Box<dyn Error>> {
    let config = SyncConfig::from_env()?;
    let store = super::open_store(&config.state_dsn)?;

    let source = ProductboardSource::new(
        ReqwestClient::new(config.request_timeout)?,
        &config.source_base_url,
        &config.source_token,
    )
    .with_page_size(config.page_size);

    let publisher = BeamerPublisher::new(
        ReqwestClient::new(config.request_timeout)?,
        &config.target_base_url,
        &config.target_token,
    );

    let engine = SyncEngine::new(config, source, publisher, store);
    tracing::info!(dry_run, "starting sync run");

    if dry_run {
        let plan = engine.plan().map_err(|err| {
            print_report(&RunReport::failed(err.to_string()), format);
            err
        })?;
        print_dry_run(&DryRunReport::from(plan), format);
        return Ok(());
    }

    match engine.run() {
        Ok(summary) => {
            let report = RunReport::completed(summary);
            print_report(&report, format);
            Ok(())
        }
        Err(err) => {
            print_report(&RunReport::failed(err.to_string()), format);
            Err(err.into())
        }
    }
}

fn print_report(report: &RunReport, format: &str) {
    match format {
        "json" => match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("error: failed to encode report: {err}"),
        },
        _ => print_text_report(&report.summary, report.error.as_deref()),
    }
}

fn print_text_report(summary: &RunSummary, error: Option<&str>) {
    if let Some(error) = error {
        println!("run failed: {error}");
        return;
    }

    println!("fetched:   {}", summary.fetched);
    println!("released:  {}", summary.released);
    println!("published: {}", summary.published);
    println!("skipped:   {}", summary.skipped);
    if summary.failures.is_empty() {
        println!("failures:  none");
    } else {
        println!("failures:");
        for failure in &summary.failures {
            println!("  {}: {}", failure.item_id, failure.reason);
        }
    }
}

fn print_dry_run(report: &DryRunReport, format: &str) {
    match format {
        "json" => match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("error: failed to encode report: {err}"),
        },
        _ => {
            println!("fetched:  {}", report.fetched);
            println!("released: {}", report.released);
            println!("skipped:  {}", report.skipped);
            if report.would_publish.is_empty() {
                println!("nothing to publish");
            } else {
                println!("would publish:");
                for id in &report.would_publish {
                    println!("  {id}");
                }
            }
        }
    }
}
