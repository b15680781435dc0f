use std::path::PathBuf;
use std::process::exit;
use std::sync::mpsc::Receiver;
use clap::Parser;
use tracing::info;
use crate::core::config::Config;
use crate::core::emu::{Emulator, EMU_BUILD_DATE_TIME, EMU_NAME, EMU_VERSION};
use crate::renderer::GUIEvent;
use crate::renderer::pixels::PixelsDisplay;
use crate::renderer::png::PngRenderer;

mod core;
mod log;
pub mod renderer;

#[derive(Parser, Debug)]
#[command(version, about = "Emulator of the NDS 3D geometry and rendering engine")]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Run without window for the given number of frames
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u64>,
    /// Directory where headless frames are saved as PNG
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
    /// Log level or filter directive (e.g. debug, nds_e3d::core::e3d=trace)
    #[arg(long, value_name = "LEVEL")]
    log: Option<String>,
    /// Append every prepared 3D scene to this file
    #[arg(long, value_name = "FILE")]
    dump_scene: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<Config,String> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(level) = &args.log {
        config.log_level = level.clone();
    }
    if args.headless.is_some() {
        config.display.headless_frames = args.headless;
    }
    if args.out.is_some() {
        config.display.output_dir = args.out.clone();
    }
    if args.dump_scene.is_some() {
        config.engine.dump_scene = args.dump_scene.clone();
    }
    Ok(config)
}

fn start_windowed(renderer: PixelsDisplay, gui_event_rx: Receiver<GUIEvent>, config: Config) {
    let logger = log::Logger::new(&config.log_level);
    info!("Welcome to {} v{} compiled on {}",EMU_NAME,EMU_VERSION,EMU_BUILD_DATE_TIME);

    let mut emu = Emulator::new(config, logger, Box::new(renderer), gui_event_rx);
    if let Err(e) = emu.emulate() {
        eprintln!("{}",e);
        exit(1);
    }
}

fn run_headless(config: Config) -> Result<(),String> {
    let logger = log::Logger::new(&config.log_level);
    info!("Welcome to {} v{} compiled on {}",EMU_NAME,EMU_VERSION,EMU_BUILD_DATE_TIME);
    info!("Running headless for {} frames",config.display.headless_frames.unwrap_or_default());

    let renderer = PngRenderer::new(config.display.output_dir.clone())?;
    // no window, no input
    let (_gui_event_tx, gui_event_rx) = std::sync::mpsc::channel();
    let mut emu = Emulator::new(config, logger, Box::new(renderer), gui_event_rx);
    emu.emulate()
}

fn main() {
    let args = Args::parse();
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}",e);
            exit(1);
        }
    };

    let result = if config.display.headless_frames.is_some() {
        run_headless(config)
    }
    else {
        renderer::pixels::run_loop(start_windowed, config)
    };

    if let Err(e) = result {
        eprintln!("{}",e);
        exit(1);
    }
}
