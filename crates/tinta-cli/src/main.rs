//! `tinta`: headless front end for the grading engine.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tinta_core::kernels::{ColorTarget, HexColor, OverlayStyle, RecolorSettings};
use tinta_core::{EditError, EditEvent, EditSession, FilterParams, SessionConfig, registry};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tinta")]
#[command(version, about = "Non-destructive color grading from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the kernel catalog (ids, defaults, bounds) as JSON
    List,

    /// Apply one or more filters to an image
    Apply {
        /// Input image
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output image; format from the extension. Prints a PNG data URL
        /// when omitted.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Kernel id, applied in order (repeatable)
        #[arg(short, long = "filter", value_name = "ID", required = true)]
        filters: Vec<String>,

        /// Effect strength 0-100
        #[arg(long)]
        intensity: Option<f32>,

        /// Final contrast -100..100
        #[arg(long, allow_hyphen_values = true)]
        contrast: Option<f32>,

        /// Final brightness -100..100
        #[arg(long, allow_hyphen_values = true)]
        brightness: Option<f32>,

        /// Kernel extra as KEY=VALUE (repeatable; ignored by kernels without it)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_extra)]
        extras: Vec<(String, f32)>,

        /// Recolor target as #RRGGBB[:SIGMA] (repeatable)
        #[arg(long = "target", value_name = "HEX[:SIGMA]", value_parser = parse_target)]
        targets: Vec<ColorTarget>,

        /// Recolor background color
        #[arg(long, value_name = "HEX")]
        background: Option<HexColor>,

        /// Composite the recolor gradient overlay
        #[arg(long)]
        overlay: bool,

        /// Undo this many commits before writing
        #[arg(long, value_name = "N", default_value_t = 0)]
        undo: usize,

        /// Session config JSON (defaults, then TINTA_* environment)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn parse_extra(s: &str) -> Result<(String, f32), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|e| format!("bad value for {key}: {e}"))?;
    Ok((key.trim().to_string(), value))
}

fn parse_target(s: &str) -> Result<ColorTarget, String> {
    let (hex, sigma) = match s.split_once(':') {
        Some((hex, sigma)) => (hex, sigma.parse().map_err(|e| format!("bad sigma: {e}"))?),
        None => (s, 25.0),
    };
    let color = hex.parse::<HexColor>().map_err(|e| e.to_string())?;
    Ok(ColorTarget { color, sigma })
}

/// Slider overrides shared by every filter in one `apply` run.
struct Overrides {
    intensity: Option<f32>,
    contrast: Option<f32>,
    brightness: Option<f32>,
    extras: Vec<(String, f32)>,
    targets: Vec<ColorTarget>,
    background: Option<HexColor>,
    overlay: bool,
}

impl Overrides {
    fn apply_to(&self, mut params: FilterParams) -> FilterParams {
        if let Some(v) = self.intensity {
            params.intensity = v;
        }
        if let Some(v) = self.contrast {
            params.contrast = v;
        }
        if let Some(v) = self.brightness {
            params.brightness = v;
        }
        for (key, value) in &self.extras {
            params.extras.insert(key.clone(), *value);
        }
        if let Some(recolor) = params.recolor.as_mut() {
            self.apply_recolor(recolor);
        }
        params
    }

    fn apply_recolor(&self, recolor: &mut RecolorSettings) {
        if !self.targets.is_empty() {
            recolor.targets = self.targets.clone();
        }
        if let Some(bg) = self.background {
            recolor.background = bg;
        }
        if self.overlay {
            recolor.overlay = Some(OverlayStyle::default());
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SessionConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(SessionConfig::from_json(&text)?)
        }
        None => Ok(SessionConfig::from_env()),
    }
}

fn report(event: &EditEvent) {
    match serde_json::to_string(event) {
        Ok(json) => tracing::info!(event = %json),
        Err(e) => tracing::warn!("unserializable event: {e}"),
    }
}

fn run_apply(
    input: PathBuf,
    output: Option<PathBuf>,
    filters: Vec<String>,
    overrides: Overrides,
    undo: usize,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let mut session = EditSession::new(load_config(config.as_ref())?);

    let image = match tinta_io::load_path(&input) {
        Ok(image) => image,
        Err(e) => {
            if let Some(event) = e.notification() {
                report(&event);
            }
            return Err(e.into());
        }
    };
    report(&session.load(image)?);

    for id in &filters {
        let params = overrides.apply_to(session.begin_edit(id)?);
        report(&session.commit(params)?);
    }

    for _ in 0..undo {
        match session.undo() {
            Ok(event) => report(&event),
            Err(e @ EditError::EmptyHistory) => {
                if let Some(event) = e.notification() {
                    report(&event);
                }
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let result = session.export()?;
    match output {
        Some(path) => tinta_io::save_path(&result, &path)?,
        None => println!("{}", tinta_io::to_data_url(&result)?),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let outcome: Result<(), Box<dyn Error>> = match cli.command {
        Commands::List => serde_json::to_string_pretty(registry())
            .map(|json| println!("{json}"))
            .map_err(Into::into),
        Commands::Apply {
            input,
            output,
            filters,
            intensity,
            contrast,
            brightness,
            extras,
            targets,
            background,
            overlay,
            undo,
            config,
        } => run_apply(
            input,
            output,
            filters,
            Overrides {
                intensity,
                contrast,
                brightness,
                extras,
                targets,
                background,
                overlay,
            },
            undo,
            config,
        ),
    };

    if let Err(e) = &outcome {
        tracing::error!("{e}");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extra() {
        assert_eq!(parse_extra("variant=3"), Ok(("variant".into(), 3.0)));
        assert!(parse_extra("variant").is_err());
        assert!(parse_extra("variant=x").is_err());
    }

    #[test]
    fn test_parse_target() {
        let t = parse_target("#a75d5a:30").unwrap();
        assert_eq!(t.color, HexColor([0xa7, 0x5d, 0x5a]));
        assert_eq!(t.sigma, 30.0);
        assert_eq!(parse_target("#000000").unwrap().sigma, 25.0);
        assert!(parse_target("red").is_err());
    }

    #[test]
    fn test_overrides_fill_recolor_only_when_present() {
        let o = Overrides {
            intensity: Some(40.0),
            contrast: None,
            brightness: Some(-5.0),
            extras: vec![("variant".into(), 2.0)],
            targets: Vec::new(),
            background: Some(HexColor([1, 2, 3])),
            overlay: true,
        };
        let plain = o.apply_to(FilterParams::default());
        assert_eq!(plain.intensity, 40.0);
        assert_eq!(plain.brightness, -5.0);
        assert!(plain.recolor.is_none());

        let recolor = o.apply_to(FilterParams::default().with_recolor(RecolorSettings::default()));
        let settings = recolor.recolor.unwrap();
        assert_eq!(settings.background, HexColor([1, 2, 3]));
        assert!(settings.overlay.is_some());
        assert_eq!(settings.targets.len(), 1);
    }

    #[test]
    fn test_cli_parses_apply() {
        let cli = Cli::try_parse_from([
            "tinta", "apply", "-i", "in.png", "-f", "orange-teal", "-f", "vignette",
            "--contrast", "-20", "--set", "variant=2",
        ])
        .unwrap();
        match cli.command {
            Commands::Apply {
                filters, contrast, extras, ..
            } => {
                assert_eq!(filters, vec!["orange-teal", "vignette"]);
                assert_eq!(contrast, Some(-20.0));
                assert_eq!(extras, vec![("variant".to_string(), 2.0)]);
            }
            Commands::List => panic!("expected apply"),
        }
    }
}
