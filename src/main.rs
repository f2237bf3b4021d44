// Demonstration entry point: runs one read → [filter] → [resize] → write event
// through a worker pool and reports the outcome.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use image_pipeline::utils::{validate_input_path, validate_output_path};
use image_pipeline::{
    ChannelListener, FileTask, ImageEvent, Kernel, KernelTask, PipelineConfig, Priority,
    ResizeTask, WorkerPool,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Filter {
    Average,
    Gaussian,
    Sharpen,
}

impl Filter {
    fn kernel(self) -> Kernel {
        match self {
            Self::Average => Kernel::AVERAGE,
            Self::Gaussian => Kernel::GAUSSIAN,
            Self::Sharpen => Kernel::SHARPEN,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "image-pipeline", version, about = "Process an image on a worker pool")]
struct Args {
    /// Image to read
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the result; the extension selects the format
    #[arg(short, long)]
    output: PathBuf,

    /// Fit the image inside WIDTHxHEIGHT
    #[arg(long, value_parser = parse_size)]
    resize: Option<(u32, u32)>,

    /// 3x3 spatial filter to apply before resizing
    #[arg(long, value_enum)]
    filter: Option<Filter>,

    #[arg(long, default_value_t = Priority::Medium)]
    priority: Priority,

    /// JSON pipeline configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value}"))?;
    let width = width.trim().parse().map_err(|e| format!("invalid width: {e}"))?;
    let height = height.trim().parse().map_err(|e| format!("invalid height: {e}"))?;
    Ok((width, height))
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .with_thread_names(true) // Worker threads are named after their id
        .compact()
        .init();

    let args = Args::parse();
    debug!("{:?}", args);

    let config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    config.validate()?;
    validate_input_path(&args.input)?;
    validate_output_path(&args.output)?;

    let pool = WorkerPool::new(&config);
    pool.start().context("Failed to start workers")?;
    info!("=== Pipeline started with {} workers ===", config.worker_count);

    let (listener, replies) = ChannelListener::pair();
    let mut event = ImageEvent::new(args.priority)
        .with_reply_to(&listener)
        .with_metadata(serde_json::json!({
            "input": args.input.display().to_string(),
            "output": args.output.display().to_string(),
        }))
        .with_task(FileTask::read(&args.input));
    if let Some(filter) = args.filter {
        event.add_task(KernelTask::new(filter.kernel()));
    }
    if let Some((width, height)) = args.resize {
        event.add_task(ResizeTask::new(width, height)?);
    }
    event.add_task(FileTask::write(&args.output));

    pool.submit(event);

    let reply = replies.recv_timeout(config.reply_timeout());
    pool.shutdown().context("Failed to shut down workers")?;

    let outcome = reply.context("Timed out waiting for the image to be processed")?;
    if !outcome.is_ok() {
        warn!("{} reported {:?}", outcome.worker, outcome.status);
        bail!(
            "Processing failed: {}",
            outcome.message.as_deref().unwrap_or("no message")
        );
    }

    let (width, height) = outcome
        .image
        .as_ref()
        .map(|image| (image.width(), image.height()))
        .unwrap_or_default();
    info!(
        "Saved {} ({}x{}) on {}",
        args.output.display(),
        width,
        height,
        outcome.worker
    );
    Ok(())
}
