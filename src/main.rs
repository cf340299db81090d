mod app;
mod camera;
mod config;
mod headless;

use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use simplelog::{ColorChoice, CombinedLogger, LevelFilter, TermLogger, TerminalMode, WriteLogger};

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "horizon", about = "Endless streamed heightfield fly-through")]
struct Cli {
    /// TOML config with [stream], [terrain], [camera] and [window] sections
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override terrain.seed
    #[arg(long)]
    seed: Option<i32>,
    /// Run the streaming loop without a window
    #[arg(long)]
    headless: bool,
    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 2000)]
    frames: u64,
    /// Override stream.render_n
    #[arg(long)]
    render_n: Option<usize>,
    /// Retire at most one chunk per frame
    #[arg(long)]
    no_catch_up: bool,
    /// Generate the next chunk on a background thread
    #[arg(long)]
    prefetch: bool,
    /// Also write debug logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match log_file {
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        }
        Some(path) => {
            let file = File::create(path)?;
            CombinedLogger::init(vec![
                TermLogger::new(
                    LevelFilter::Info,
                    simplelog::Config::default(),
                    TerminalMode::Mixed,
                    ColorChoice::Auto,
                ),
                WriteLogger::new(LevelFilter::Debug, simplelog::Config::default(), file),
            ])?;
        }
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<AppConfig, Box<dyn Error>> {
    let mut cfg = match &cli.config {
        Some(path) => config::load_from_path(path)?,
        None => AppConfig::default(),
    };
    if let Some(seed) = cli.seed {
        cfg.terrain.seed = seed;
    }
    if let Some(n) = cli.render_n {
        cfg.stream.render_n = n;
    }
    if cli.no_catch_up {
        cfg.stream.catch_up = false;
    }
    if cli.prefetch {
        cfg.stream.prefetch = true;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.log_file.as_deref()) {
        eprintln!("failed to initialize logging: {}", e);
        process::exit(2);
    }
    let cfg = match build_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("invalid configuration: {}", e);
            process::exit(1);
        }
    };
    log::info!(
        "seed {}, {}x{} cells of {}, window {}, catch-up {}",
        cfg.terrain.seed,
        cfg.stream.rows,
        cfg.stream.cols,
        cfg.stream.cell_size,
        cfg.stream.render_n,
        cfg.stream.catch_up
    );

    if cli.headless {
        headless::run(&cfg, cli.frames);
        return;
    }
    if let Err(e) = app::run(&cfg) {
        log::error!("{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_apply() {
        let cli = Cli::parse_from([
            "horizon",
            "--seed",
            "7",
            "--render-n",
            "3",
            "--no-catch-up",
            "--prefetch",
            "--headless",
        ]);
        assert!(cli.headless);
        assert_eq!(cli.frames, 2000);
        let cfg = build_config(&cli).unwrap();
        assert_eq!(cfg.terrain.seed, 7);
        assert_eq!(cfg.stream.render_n, 3);
        assert!(!cfg.stream.catch_up);
        assert!(cfg.stream.prefetch);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let cli = Cli::parse_from(["horizon", "--render-n", "0"]);
        assert!(build_config(&cli).is_err());
    }
}
