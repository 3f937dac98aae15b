use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufRead, BufReader};

use zoomist::cli::Args;
use zoomist::config::Config;
use zoomist::replay::Replay;

fn init_logging(args: &Args) -> Result<()> {
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt.clone().unwrap_or_else(|| "zoomist.log".into());
        let file = File::create(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!("Logging to file: {} (level: {:?})", log_path.display(), log_level);
    } else {
        // Console logging goes to stderr; stdout carries the outbound JSON lines.
        // Respects RUST_LOG if set.
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format_timestamp_millis()
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    debug!("Command-line args: {:?}", args);

    let config = Config::resolve(args.config.clone())?;
    info!(
        "Debounce window: {}ms, container data expression: {:?}",
        config.debounce_ms, config.container_data_expression
    );

    let mut replay = Replay::new(&config, &args.src)?;
    {
        let widget = replay.widget_mut()?;
        if let Some(fill) = args.fill {
            widget.set_fill(Some(fill))?;
        }
        if args.slider {
            widget.set_slider(true)?;
        }
        if args.zoomer {
            widget.set_zoomer(true)?;
        }
    }
    info!("Replaying against widget {}", replay.widget_id());

    let input: Box<dyn BufRead> = if args.script.as_os_str() == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&args.script)
            .with_context(|| format!("Failed to open script: {}", args.script.display()))?;
        Box::new(BufReader::new(file))
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = replay.run(input, &mut out)?;

    if report.rejected > 0 {
        log::warn!("{} script line(s) rejected", report.rejected);
    }
    Ok(())
}
