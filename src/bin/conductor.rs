//! conductor CLI: submit runs and inspect routing.

use conductor_rs::config::Config;
use conductor_rs::engine::classify::classify;
use conductor_rs::engine::graph::route;
use conductor_rs::engine::{Dispatcher, Engine, EngineConfig, Ports, RunReport};
use conductor_rs::model::{EventType, NewWorkItem, SourceEvent};
use conductor_rs::telemetry::{TelemetryConfig, init_telemetry};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "conductor", about = "Route tasks and repository events through the workflow")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit one run and wait for it to finish
    Run {
        /// Task description (replaced by the event's own description when an event is given)
        description: String,
        /// GitHub event name (push, pull_request, issues, ...)
        #[arg(long, requires = "payload")]
        event_type: Option<String>,
        /// File holding the webhook JSON payload
        #[arg(long, requires = "event_type")]
        payload: Option<PathBuf>,
        /// Repository to clone instead of the one named in the payload
        #[arg(long)]
        repo_url: Option<String>,
        /// Use the in-process ledger and memory graph
        #[arg(long)]
        local: bool,
    },
    /// Print the classification and route for a description
    Classify {
        description: String,
        /// GitHub event name
        #[arg(long)]
        event_type: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            description,
            event_type,
            payload,
            repo_url,
            local,
        } => cmd_run(description, event_type, payload, repo_url, local).await,
        Command::Classify {
            description,
            event_type,
        } => {
            let event_type = event_type.as_deref().map(EventType::parse);
            let classification = classify(&description, event_type.as_ref());
            println!("classification: {classification}");
            println!("next:           {}", route(classification));
            Ok(())
        }
    }
}

async fn cmd_run(
    description: String,
    event_type: Option<String>,
    payload: Option<PathBuf>,
    repo_url: Option<String>,
    local: bool,
) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let _guard = init_telemetry(TelemetryConfig::from_config(&config))?;

    let mut work = NewWorkItem::new(description);
    if let (Some(event_type), Some(path)) = (event_type, payload) {
        let raw = tokio::fs::read_to_string(&path).await?;
        let mut event = SourceEvent::github(&event_type, serde_json::from_str(&raw)?);
        if let Some(url) = repo_url.clone() {
            event = event.with_repo_url(url);
        }
        work = work.source_event(event);
    }

    let mut engine_config = EngineConfig::from(&config);
    if repo_url.is_some() {
        engine_config.default_repo_url = repo_url;
    }

    let (ports, local_ledger) = if local {
        let (ports, ledger, _graph) = Ports::local(&config)?;
        (ports, Some(ledger))
    } else {
        (Ports::remote(&config)?, None)
    };

    let dispatcher = Dispatcher::new(Engine::new(ports, engine_config));
    let handle = dispatcher.submit(work);
    println!("Accepted: run {}", handle.run_id());

    let report = handle.wait().await?;
    print_report(&report);

    if let (Some(ledger), Some(task_id)) = (local_ledger, report.item.task_id()) {
        let task = ledger.get(task_id)?;
        println!("Ledger:       task {} is {}", task.id, task.status);
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    let item = &report.item;
    println!("Run:          {}", report.run_id);
    println!(
        "Task:         {}",
        item.task_id().map(|id| id.to_string()).unwrap_or("-".to_string())
    );
    println!("Description:  {}", item.description);
    println!(
        "Class:        {}",
        item.classification()
            .map(|c| c.to_string())
            .unwrap_or("-".to_string())
    );
    println!("Termination:  {:?}", report.termination);
    println!("Status:       {}", item.status_message);
    for change in &item.code_changes {
        println!("Change:       {change}");
    }
    if let Some(ref docs) = item.documentation {
        println!("---\n{docs}");
    }
    if let Some(ref checklist) = item.checklist {
        println!("---\n{checklist}");
    }
    println!("---");
    for event in &report.events {
        match serde_json::to_string(&event.kind) {
            Ok(json) => println!("{:>3} {}", event.seq, json),
            Err(e) => println!("{:>3} <unprintable event: {e}>", event.seq),
        }
    }
}
