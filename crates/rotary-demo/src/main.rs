use clap::Parser;
use relm4::prelude::*;
use rotary_demo::config::{self, Overrides};
use rotary_demo::gui::app::{AppInit, AppModel};
use rotary_demo::sys::runtime;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rotary-demo", version, about, long_about = None)]
struct Cli {
    /// Config file to load (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Knob diameter in pixels
    #[arg(short = 'd', long)]
    diameter: Option<f64>,

    /// Degrees between tick marks
    #[arg(short = 't', long)]
    tick_spacing: Option<f64>,

    /// Snap to ticks and show them
    #[arg(short = 's', long)]
    snap: bool,

    /// Write the default config file and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    if cli.write_config {
        config::write_default_config(&config_path)?;
        println!("{}", config_path.display());
        return Ok(());
    }

    let overrides = Overrides {
        diameter: cli.diameter,
        tick_spacing: cli.tick_spacing,
        snap: cli.snap,
    };
    let mut config = config::load_or_default(&config_path);
    overrides.apply(&mut config.knob);
    config.knob.validate()?;

    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(tx, config_path.clone());

    // clap owns the command line, keep gtk from parsing it again
    let app = RelmApp::new("org.rotary.demo").with_args(Vec::new());

    app.run::<AppModel>(AppInit {
        config,
        config_path,
        overrides,
        rx,
    });
    Ok(())
}
