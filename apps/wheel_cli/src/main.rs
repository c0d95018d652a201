use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use shared::SpinPhase;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wheel_core::{
    FanoutRenderPort, HttpImageFetcher, ImageFetcher, OutcomeResolver, RandomSpinDuration,
    RecordingRenderPort, RenderPort, UnavailableImageFetcher, WheelDriver, WheelHandle,
};

mod config;
mod console;
mod shell;

use config::{load_settings, Settings};
use console::{describe, describe_wheel, frame_summary, ConsoleRenderPort};
use shell::{dispatch_host_command, parse_command, ShellCommand, HELP};

#[derive(Parser, Debug)]
#[command(name = "wheel", about = "Spin a seven-color wheel of fortune")]
struct Args {
    /// Settings file; missing files fall back to defaults.
    #[arg(long, default_value = "wheel.toml")]
    config: PathBuf,
    #[arg(long)]
    image_url: Option<String>,
    /// Never hit the network; image sectors settle as failures.
    #[arg(long)]
    offline: bool,
    #[arg(long)]
    size: Option<i64>,
    #[arg(long)]
    seed: Option<u64>,
    /// Spin once, print the result and exit.
    #[arg(long)]
    spin_once: bool,
    /// Print snapshots as JSON lines.
    #[arg(long)]
    json: bool,
    /// Record every rendered frame and print a per-phase summary on exit.
    #[arg(long)]
    trace_frames: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(&args.config);
    apply_args(&mut settings, &args);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    for message in &settings.ignored {
        warn!("ignored setting: {message}");
    }
    settings.validate().context("invalid wheel settings")?;

    let fetcher: Arc<dyn ImageFetcher> = if args.offline {
        info!("offline mode: image results are disabled");
        Arc::new(UnavailableImageFetcher)
    } else {
        let fetcher = HttpImageFetcher::new(&settings.image_url, settings.fetch_timeout())
            .context("failed to configure image provider")?;
        info!(endpoint = %fetcher.endpoint(), "image provider configured");
        Arc::new(fetcher)
    };

    let console: Arc<dyn RenderPort> = Arc::new(ConsoleRenderPort::new(args.json));
    let recorder = args.trace_frames.then(RecordingRenderPort::new);
    let render: Arc<dyn RenderPort> = match &recorder {
        Some(recorder) => {
            let ports: Vec<Arc<dyn RenderPort>> = vec![console, Arc::new(recorder.clone())];
            Arc::new(FanoutRenderPort::new(ports))
        }
        None => console,
    };

    let engine_config = settings.engine_config();
    let (handle, driver_task) = WheelDriver::spawn(
        engine_config,
        render,
        OutcomeResolver::new(fetcher),
        Box::new(RandomSpinDuration::from_config(&engine_config, settings.spin_seed)),
    );
    handle.resize(settings.wheel_size)?;

    if args.spin_once {
        spin_once(&handle, settings.settle_deadline()).await?;
    } else {
        run_shell(&handle).await?;
    }

    handle.shutdown()?;
    driver_task.await.context("wheel driver task failed")?;

    if let Some(recorder) = recorder {
        println!("{}", frame_summary(&recorder.frames()));
    }
    Ok(())
}

fn apply_args(settings: &mut Settings, args: &Args) {
    if let Some(url) = &args.image_url {
        settings.image_url = url.clone();
    }
    if let Some(size) = args.size {
        settings.wheel_size = size;
    }
    if let Some(seed) = args.seed {
        settings.spin_seed = Some(seed);
    }
}

async fn spin_once(handle: &WheelHandle, deadline: Duration) -> Result<()> {
    handle.start_spin()?;

    let settled = tokio::time::timeout(deadline, async {
        loop {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let snapshot = handle.snapshot().await?;
            if snapshot.rotation.phase == SpinPhase::Settled {
                return Ok::<_, wheel_core::DriverError>(snapshot);
            }
        }
    })
    .await;

    match settled {
        Ok(snapshot) => {
            let snapshot = snapshot?;
            info!(result = %describe(&snapshot), "spin finished");
            Ok(())
        }
        Err(_) => bail!("wheel did not settle within {}s", deadline.as_secs()),
    }
}

async fn run_shell(handle: &WheelHandle) -> Result<()> {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::State => {
                let snapshot = handle.snapshot().await?;
                println!("{}", describe_wheel(&snapshot));
            }
            other => dispatch_host_command(handle, other)?,
        }
    }

    Ok(())
}
