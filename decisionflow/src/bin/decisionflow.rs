//! Decisionflow CLI: runs one four-stage pipeline and prints the result.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use decisionflow::config::{AppConfig, DELAY_ENV, ENDPOINT_ENV};
use decisionflow::context::WorkflowRequest;
use decisionflow::events::LoggingEventSink;
use decisionflow::observability::{init_tracing, LogFormat};
use decisionflow::pipeline::Orchestrator;
use decisionflow::providers::{build_client, HealthReport};

/// Run a business decision through research, analysis, strategy and validation.
#[derive(Debug, Parser)]
#[command(name = "decisionflow", version, about, long_about = None)]
struct Cli {
    /// What the business wants to achieve.
    #[arg(long, required_unless_present = "health")]
    goal: Option<String>,

    /// Industry or sector.
    #[arg(long, required_unless_present = "health")]
    industry: Option<String>,

    /// Budget range.
    #[arg(long, default_value = "")]
    budget: String,

    /// Timeline.
    #[arg(long, default_value = "")]
    timeline: String,

    /// Known constraints.
    #[arg(long, default_value = "")]
    constraints: String,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generation endpoint.
    #[arg(long, env = ENDPOINT_ENV)]
    endpoint: Option<String>,

    /// Call the messages API directly instead of a proxy.
    #[arg(long)]
    direct: bool,

    /// Pause between stages in milliseconds.
    #[arg(long, env = DELAY_ENV)]
    delay_ms: Option<u64>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    /// Print the configuration health report and exit.
    #[arg(long)]
    health: bool,
}

impl Cli {
    fn app_config(&self) -> Result<AppConfig> {
        let config = match &self.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => AppConfig::default(),
        };
        let mut config = config.with_env_overrides()?;

        if let Some(endpoint) = &self.endpoint {
            config.generation.endpoint.clone_from(endpoint);
        }
        if self.direct {
            config.generation = config.generation.into_direct();
        }
        if let Some(ms) = self.delay_ms {
            config.orchestrator.inter_stage_delay_ms = ms;
        }
        Ok(config)
    }

    fn request(&self) -> WorkflowRequest {
        WorkflowRequest::new(
            self.goal.clone().unwrap_or_default(),
            self.industry.clone().unwrap_or_default(),
        )
        .with_budget(self.budget.as_str())
        .with_timeline(self.timeline.as_str())
        .with_constraints(self.constraints.as_str())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    });

    let config = cli.app_config()?;

    if cli.health {
        let report = HealthReport::from_config(&config.generation);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let request = cli.request();
    request.validate()?;

    let client = build_client(&config.generation)?;
    info!(client = %client.describe(), "Generation client ready");

    let mut orchestrator = Orchestrator::new(client, config.orchestrator)
        .with_event_sink(Arc::new(LoggingEventSink::default()));
    let result = orchestrator.run_pipeline(&request).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
