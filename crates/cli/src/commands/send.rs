use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::Args;
use herald_core::{EventSource, SendMessageSpec, TriggeringEvent};
use herald_executor::{ActivityContext, ActivityExecutor, OutputVariables, SendMessageExecutor};
use herald_messaging::FsResourceLoader;
use herald_simulation::{CapturedSend, Fixture, InMemoryMessageService, SendPath};
use tracing::{error, info};

use crate::OutputFormat;
use crate::config::HeraldConfig;

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Activity definition (YAML).
    #[arg(long)]
    pub activity: PathBuf,
    /// Activity id used to qualify output variables.
    #[arg(long, default_value = "sendMessage")]
    pub activity_id: String,
    /// Triggering event (JSON), e.g. `{"type": "message_sent", "message": {...}}`.
    #[arg(long)]
    pub event: Option<PathBuf>,
    /// Stored messages and attachment payloads to seed the message store with (JSON).
    #[arg(long)]
    pub fixture: Option<PathBuf>,
}

/// What a dry run produced.
#[derive(Debug)]
pub struct DryRun {
    pub activity_id: String,
    pub sent: Vec<CapturedSend>,
    pub outputs: OutputVariables,
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

pub async fn execute(config: &HeraldConfig, args: &SendArgs) -> anyhow::Result<DryRun> {
    let spec: SendMessageSpec = serde_yaml_ng::from_str(&read(&args.activity)?)
        .with_context(|| format!("invalid activity {}", args.activity.display()))?;

    let event = match &args.event {
        Some(path) => {
            let source: EventSource = serde_json::from_str(&read(path)?)
                .with_context(|| format!("invalid event {}", path.display()))?;
            Some(TriggeringEvent::new(source))
        }
        None => None,
    };

    let fixture = match &args.fixture {
        Some(path) => Fixture::load(path)?,
        None => Fixture::default(),
    };

    let service = Arc::new(InMemoryMessageService::from_fixture(fixture).with_name("dry-run"));
    let resources = Arc::new(FsResourceLoader::new(&config.resources.root));

    let mut ctx = ActivityContext::new(args.activity_id.clone(), service.clone(), resources);
    if let Some(event) = event {
        ctx = ctx.with_event(event);
    }

    if let Err(e) = SendMessageExecutor::new().execute(&spec, &mut ctx).await {
        error!(activity_id = %args.activity_id, code = e.code(), error = %e, "activity failed");
        return Err(e.into());
    }
    info!(activity_id = %args.activity_id, "activity completed");

    Ok(DryRun {
        activity_id: args.activity_id.clone(),
        sent: service.sent(),
        outputs: ctx.outputs().clone(),
    })
}

pub async fn run(
    config: &HeraldConfig,
    args: &SendArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let result = execute(config, args).await?;

    match format {
        OutputFormat::Json => {
            let sent: Vec<_> = result
                .sent
                .iter()
                .map(|send| {
                    serde_json::json!({
                        "streamId": send.stream_id,
                        "path": match send.send_path {
                            SendPath::Text => "text",
                            SendPath::WithAttachments => "attachments",
                        },
                        "content": send.content,
                        "messageId": send.message_id,
                        "attachments": send.attachments.iter().map(|a| serde_json::json!({
                            "filename": a.filename,
                            "size": a.data.len(),
                        })).collect::<Vec<_>>(),
                    })
                })
                .collect();
            let report = serde_json::json!({
                "activityId": result.activity_id,
                "sent": sent,
                "outputs": result.outputs,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            for send in &result.sent {
                println!("Sent to stream {} ({:?})", send.stream_id, send.send_path);
                println!("  content: {:?}", send.content);
                for attachment in &send.attachments {
                    println!(
                        "  attachment: {} ({} bytes)",
                        attachment.filename,
                        attachment.data.len()
                    );
                }
            }
            for (key, value) in result.outputs.iter() {
                println!("{}.outputs.{key} = {value}", result.activity_id);
            }
        }
    }

    Ok(())
}
