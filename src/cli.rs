use clap::Parser;
use std::path::PathBuf;

use crate::widget::Fill;

/// Replay scripted client traffic against a zoomist widget handle
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON-lines script of client notifications ("-" reads stdin)
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Image source of the attached widget
    #[arg(short = 's', long = "src", value_name = "URL", default_value = "image.jpg")]
    pub src: String,

    /// Initial fill mode
    #[arg(long = "fill", value_name = "cover|contain|none")]
    pub fill: Option<Fill>,

    /// Show the slider control
    #[arg(long = "slider")]
    pub slider: bool,

    /// Show the zoomer buttons
    #[arg(long = "zoomer")]
    pub zoomer: bool,

    /// Settings file (overrides ZOOMIST_CONFIG and the platform default)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging to file (default: zoomist.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["zoomist-replay", "script.jsonl"]).unwrap();
        assert_eq!(args.script, PathBuf::from("script.jsonl"));
        assert_eq!(args.src, "image.jpg");
        assert_eq!(args.fill, None);
        assert!(!args.slider && !args.zoomer);
        assert!(args.log_file.is_none());
        assert_eq!(args.verbosity, 0);
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "zoomist-replay", "-", "--src", "b.png", "--fill", "contain", "--slider", "--zoomer", "-vv", "--log",
        ])
        .unwrap();
        assert_eq!(args.src, "b.png");
        assert_eq!(args.fill, Some(Fill::Contain));
        assert!(args.slider && args.zoomer);
        assert_eq!(args.verbosity, 2);
        assert_eq!(args.log_file, Some(None));
    }

    #[test]
    fn test_bad_fill() {
        assert!(Args::try_parse_from(["zoomist-replay", "s.jsonl", "--fill", "stretch"]).is_err());
    }
}
