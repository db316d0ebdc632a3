use clap::{Parser, ValueEnum};
use gapfind::{
    decode, decode_base64, CorrelationConfig, GapConfig, GapFinder, GapMatch, RasterImage,
    ShapeConfig, ShapeMetric, Strategy,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Slide-puzzle gap offset finder")]
struct Cli {
    /// Scene (background) image: a file path, or base64 with `--input base64`.
    #[arg(long, value_name = "SRC", required_unless_present_any = ["stdin", "print_schema", "print_example"])]
    scene: Option<String>,
    /// Piece image: a file path, or base64 with `--input base64`.
    #[arg(long, value_name = "SRC", required_unless_present_any = ["stdin", "print_schema", "print_example"])]
    piece: Option<String>,
    /// How `--scene` and `--piece` are interpreted.
    #[arg(long, value_enum, default_value_t = InputKind::Path)]
    input: InputKind,
    /// Read two base64 images from stdin: scene first, then piece, separated
    /// by whitespace.
    #[arg(long, conflicts_with_all = ["scene", "piece"])]
    stdin: bool,
    /// Path to a JSON configuration file; every field is optional.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Override the configured strategy.
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// Override the calibration constant of the shape strategy.
    #[arg(long, allow_hyphen_values = true)]
    calibration: Option<i64>,
    /// Print a JSON record instead of the bare offset.
    #[arg(long)]
    json: bool,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for the pipeline stages.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InputKind {
    Path,
    Base64,
}

#[derive(Clone, Copy, Debug, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
enum StrategyArg {
    Correlation,
    Shape,
}

impl From<StrategyArg> for Strategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Correlation => Strategy::Correlation,
            StrategyArg::Shape => Strategy::Shape,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MetricConfig {
    I1,
    I2,
    I3,
}

impl From<MetricConfig> for ShapeMetric {
    fn from(value: MetricConfig) -> Self {
        match value {
            MetricConfig::I1 => ShapeMetric::I1,
            MetricConfig::I2 => ShapeMetric::I2,
            MetricConfig::I3 => ShapeMetric::I3,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CorrelationConfigJson {
    parallel: bool,
    min_var_i: f64,
}

impl Default for CorrelationConfigJson {
    fn default() -> Self {
        let cfg = CorrelationConfig::default();
        Self {
            parallel: cfg.parallel,
            min_var_i: cfg.min_var_i,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ShapeConfigJson {
    canny_low: f32,
    canny_high: f32,
    metric: MetricConfig,
    min_candidate_area: f64,
}

impl Default for ShapeConfigJson {
    fn default() -> Self {
        let cfg = ShapeConfig::default();
        Self {
            canny_low: cfg.canny_low,
            canny_high: cfg.canny_high,
            metric: MetricConfig::I2,
            min_candidate_area: cfg.min_candidate_area,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config {
    strategy: StrategyArg,
    calibration: i64,
    correlation: CorrelationConfigJson,
    shape: ShapeConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: StrategyArg::Correlation,
            calibration: GapConfig::default().calibration,
            correlation: CorrelationConfigJson::default(),
            shape: ShapeConfigJson::default(),
        }
    }
}

impl From<Config> for GapConfig {
    fn from(value: Config) -> Self {
        GapConfig {
            strategy: value.strategy.into(),
            calibration: value.calibration,
            correlation: CorrelationConfig {
                parallel: value.correlation.parallel,
                min_var_i: value.correlation.min_var_i,
            },
            shape: ShapeConfig {
                canny_low: value.shape.canny_low,
                canny_high: value.shape.canny_high,
                metric: value.shape.metric.into(),
                min_candidate_area: value.shape.min_candidate_area,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct BoxRecord {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

#[derive(Debug, Serialize)]
struct Output {
    offset: i64,
    score: f64,
    strategy: &'static str,
    bbox: BoxRecord,
}

impl From<GapMatch> for Output {
    fn from(value: GapMatch) -> Self {
        Self {
            offset: value.offset(),
            score: value.score(),
            strategy: value.strategy.name(),
            bbox: BoxRecord {
                x: value.bbox.x,
                y: value.bbox.y,
                width: value.bbox.width,
                height: value.bbox.height,
            },
        }
    }
}

fn load_inputs(cli: &Cli) -> Result<(RasterImage, RasterImage), Box<dyn std::error::Error>> {
    if cli.stdin {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        let mut parts = text.split_whitespace();
        let (Some(scene), Some(piece), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err("stdin must hold exactly two base64 images".into());
        };
        return Ok((decode_base64(scene)?, decode_base64(piece)?));
    }

    let (Some(scene), Some(piece)) = (cli.scene.as_deref(), cli.piece.as_deref()) else {
        return Err("--scene and --piece must be set".into());
    };
    let images = match cli.input {
        InputKind::Path => (decode(&fs::read(scene)?)?, decode(&fs::read(piece)?)?),
        InputKind::Base64 => (decode_base64(scene)?, decode_base64(piece)?),
    };
    Ok(images)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("gapfind=info".parse()?))
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config: Config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    let mut gap_cfg = GapConfig::from(config);
    if let Some(strategy) = cli.strategy {
        gap_cfg.strategy = strategy.into();
    }
    if let Some(calibration) = cli.calibration {
        gap_cfg.calibration = calibration;
    }

    tracing::info!(
        strategy = gap_cfg.strategy.name(),
        calibration = gap_cfg.calibration,
        "configuration resolved"
    );

    let (scene, piece) = load_inputs(&cli)?;
    let found = GapFinder::new(gap_cfg).locate_rasters(scene, piece)?;

    if cli.json {
        let output = Output::from(found);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", found.offset());
    }

    Ok(())
}
