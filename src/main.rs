// What you SEE:
// • Live (mirrored) camera with a row of buttons along the top.
// • Point with your index finger to press buttons: Board shows the whiteboard,
//   Colors opens the swatches (+ Eraser, Clear), Size opens the pen sizes.
// • Raise index AND middle finger over the whiteboard to draw.
// • ESC or Q quits. With --diagnostics, Tab cycles the compositing stages.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use virtual_board::app::{self, Display, Session};
use virtual_board::camera::{CameraCapture, FrameSource};
use virtual_board::config::Config;
use virtual_board::detector::SubprocessDetector;
use virtual_board::draw::Drawer;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long)]
    cam: Option<u32>,

    /// Requested capture width
    #[arg(long)]
    width: Option<u32>,

    /// Requested capture height
    #[arg(long)]
    height: Option<u32>,

    /// Show the camera image unmirrored
    #[arg(long)]
    no_mirror: bool,

    /// Open a second window with the compositing stages
    #[arg(long)]
    diagnostics: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (JSON format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Write the effective configuration (file + flags) as JSON and exit
    #[arg(long, value_name = "PATH")]
    save_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(filter));

    /* --- Configuration: file first, command line on top --- */
    let mut cfg = Config::load_or_default(args.config.as_deref()).context("loading configuration")?;
    if let Some(cam) = args.cam {
        cfg.camera.index = cam;
    }
    if let Some(width) = args.width {
        cfg.camera.width = width;
    }
    if let Some(height) = args.height {
        cfg.camera.height = height;
    }
    if args.no_mirror {
        cfg.camera.mirror = false;
    }
    cfg.display.diagnostics |= args.diagnostics;
    cfg.validate().context("invalid configuration")?;
    if let Some(path) = &args.save_config {
        cfg.to_file(path)
            .with_context(|| format!("writing configuration to {}", path.display()))?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    /* --- Camera + detector + window setup ---
       Visual: window opens with live camera feed. */
    let mut cam = CameraCapture::new(&cfg.camera)?;
    let (w, h) = cam.resolution();
    let mut detector = SubprocessDetector::spawn(&cfg.detector).context("starting hand detector")?;
    let mut drawer = Drawer::new(&cfg.display.title, w as usize, h as usize)?;
    let mut diag_window = if cfg.display.diagnostics {
        Some(Drawer::new("Virtual Board - compositing", w as usize, h as usize)?)
    } else {
        None
    };

    info!("Virtual Board running at {w}x{h}");

    /* --- Main loop ---
       Visual: every frame the board, strokes and buttons are redrawn over the video. */
    let mut session = Session::new(&cfg, w as usize, h as usize);
    app::run(
        &mut session,
        &mut cam,
        &mut detector,
        &mut drawer,
        diag_window.as_mut().map(|d| d as &mut dyn Display),
    )?;

    Ok(())
}
