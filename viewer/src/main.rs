use anyhow::Context;
use bridge::ViewerBridge;
use clap::Parser;
use config::ViewerConfig;
use session::Session;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod bridge;
mod config;
mod model;
mod page;
mod session;

#[derive(Parser)]
#[command(author, version, about = "Interactive cable spectrogram viewer")]
struct Args {
    /// Load a viewer config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory of spectrogram PNG files (required without --config)
    #[arg(long)]
    image_dir: Option<PathBuf>,
    /// Channel spacing in meters
    #[arg(long, default_value_t = 3.19)]
    spacing: f64,
    /// Total route length in meters
    #[arg(long, default_value_t = 1920.0)]
    length: f64,
    #[arg(long, default_value_t = 9000)]
    port: u16,
    /// Print a route/catalog summary and append it to the report file
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Keep the HTTP bridge alive for the browser view
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let viewer_config = if let Some(path) = args.config {
        ViewerConfig::load(path)?
    } else {
        let image_dir = args
            .image_dir
            .context("--image-dir is required without --config")?;
        ViewerConfig::from_args(args.spacing, args.length, image_dir, args.port)
    };

    let session = Arc::new(Session::new(&viewer_config)?);
    log::info!(
        "session ready: {} route points, {} spectrograms",
        session.plan().len(),
        session.catalog().len()
    );
    // The offline summary never binds a port; the resolved selection is kept
    // so a combined --offline --serve run starts with it pre-published.
    let offline_selection = if args.offline {
        let selection = session
            .select(0)
            .context("resolving the first route point")?;

        println!(
            "Offline run -> {} route points, {} spectrograms, first: {}",
            session.plan().len(),
            session.catalog().len(),
            selection.label
        );

        let report = format!(
            "route_points={} catalog_entries={} spacing_m={} length_m={}\n",
            session.plan().len(),
            session.catalog().len(),
            viewer_config.channel_spacing_m,
            viewer_config.total_length_m
        );
        let report_path = PathBuf::from("tools/data/route_summary.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;

        Some(selection)
    } else {
        None
    };

    if args.serve {
        let bind = SocketAddr::from(([127, 0, 0, 1], viewer_config.port));
        let viewer_bridge = ViewerBridge::new(session.clone(), bind);

        if let Some(selection) = &offline_selection {
            viewer_bridge.publish(selection)?;
            viewer_bridge.publish_status("Offline route summary ready.");
        }

        viewer_bridge.publish_status(&format!(
            "Browser view on http://{} (Ctrl+C to stop)...",
            bind
        ));
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
        viewer_bridge.publish_status(&format!(
            "Shutting down: {}",
            viewer_bridge.metrics().summary()
        ));
    }

    Ok(())
}
