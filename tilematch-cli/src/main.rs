use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tilematch::diag::{DiagnosticSink, NullSink, TracingSink};
use tilematch::{ExtractConfig, GradientExtractor, RankConfig, RankReport, Ranker};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Find which tile appears in a scene image")]
struct Cli {
    /// Scene image (overrides `scene_path` from the config).
    #[arg(short, long, value_name = "FILE")]
    scene: Option<PathBuf>,
    /// Directory of candidate tiles (overrides `tiles_dir` from the config).
    #[arg(short, long, value_name = "DIR")]
    tiles: Option<PathBuf>,
    /// Optional JSON configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Ratio-test threshold.
    #[arg(long)]
    ratio: Option<f32>,
    /// Score tiles in parallel (needs the `rayon` feature).
    #[arg(long)]
    parallel: bool,
    /// Print a JSON record instead of the bare result.
    #[arg(long)]
    json: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Log progress to stderr.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
struct ExtractConfigJson {
    octaves: usize,
    border: usize,
    harris_k: f32,
    min_response: f32,
    relative_threshold: f32,
    nms_radius: usize,
    max_features_per_level: usize,
    orientation_radius: usize,
    parallel: bool,
}

impl Default for ExtractConfigJson {
    fn default() -> Self {
        let cfg = ExtractConfig::default();
        Self {
            octaves: cfg.octaves,
            border: cfg.border,
            harris_k: cfg.harris_k,
            min_response: cfg.min_response,
            relative_threshold: cfg.relative_threshold,
            nms_radius: cfg.nms_radius,
            max_features_per_level: cfg.max_features_per_level,
            orientation_radius: cfg.orientation_radius,
            parallel: cfg.parallel,
        }
    }
}

impl From<ExtractConfigJson> for ExtractConfig {
    fn from(value: ExtractConfigJson) -> Self {
        Self {
            octaves: value.octaves,
            border: value.border,
            harris_k: value.harris_k,
            min_response: value.min_response,
            relative_threshold: value.relative_threshold,
            nms_radius: value.nms_radius,
            max_features_per_level: value.max_features_per_level,
            orientation_radius: value.orientation_radius,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
struct RankConfigJson {
    ratio: f32,
    parallel: bool,
}

impl Default for RankConfigJson {
    fn default() -> Self {
        let cfg = RankConfig::default();
        Self {
            ratio: cfg.ratio,
            parallel: cfg.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct Config {
    scene_path: String,
    tiles_dir: String,
    extract: ExtractConfigJson,
    rank: RankConfigJson,
}

impl Config {
    fn example() -> Self {
        Self {
            scene_path: "scene.jpg".to_string(),
            tiles_dir: "tiles".to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    result: String,
    best_score: usize,
    scored: usize,
    skipped: usize,
}

impl From<&RankReport> for Output {
    fn from(report: &RankReport) -> Self {
        Self {
            result: report.outcome.as_str().to_string(),
            best_score: report.best_score,
            scored: report.scored,
            skipped: report.skipped,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("tilematch=info".parse()?))
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    if cli.print_example {
        println!("{}", serde_json::to_string_pretty(&Config::example())?);
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            serde_json::from_str::<Config>(&text)?
        }
        None => Config::default(),
    };
    if let Some(scene) = &cli.scene {
        config.scene_path = scene.display().to_string();
    }
    if let Some(tiles) = &cli.tiles {
        config.tiles_dir = tiles.display().to_string();
    }
    if let Some(ratio) = cli.ratio {
        config.rank.ratio = ratio;
    }
    if cli.parallel {
        config.rank.parallel = true;
        config.extract.parallel = true;
    }
    if config.scene_path.is_empty() || config.tiles_dir.is_empty() {
        return Err("a scene and a tiles directory must be given via flags or config".into());
    }

    let extract: ExtractConfig = config.extract.into();
    extract.validate()?;
    let rank = RankConfig {
        ratio: config.rank.ratio,
        parallel: config.rank.parallel,
    };
    tracing::debug!(?extract, ?rank, "resolved configuration");

    let ranker = Ranker::new(GradientExtractor::new(extract)).with_config(rank)?;
    let sink: &dyn DiagnosticSink = if cli.trace { &TracingSink } else { &NullSink };
    let report = ranker.find_best_tile(&config.scene_path, &config.tiles_dir, sink);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&Output::from(&report))?);
    } else {
        println!("{}", report.outcome);
    }
    Ok(())
}
