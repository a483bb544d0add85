use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use termbonsai::config::{checked_seconds, parse_step, parse_wait, BonsaiConfig, GrowthConfig, Leaves, Palette};
use termbonsai::settings::Settings;
use termbonsai::{bonsai, persist};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "termbonsai")]
#[command(author = "Terminal Art Generator")]
#[command(version)]
#[command(about = "A randomly grown bonsai tree for your terminal", long_about = None)]
struct Cli {
    /// Show live growth animation
    #[arg(short, long)]
    live: bool,

    /// In live mode, seconds between growth steps [default: 0.03]
    #[arg(short, long, value_parser = parse_step)]
    time: Option<f64>,

    /// Keep generating trees infinitely
    #[arg(short, long)]
    infinite: bool,

    /// Wait time between trees in infinite mode (seconds) [default: 4.0]
    #[arg(short, long, value_parser = parse_wait)]
    wait: Option<f64>,

    /// Screensaver mode: live, infinite, save/load progress, quit on any key
    #[arg(short = 'S', long)]
    screensaver: bool,

    /// Message to display next to tree
    #[arg(short, long)]
    message: Option<String>,

    /// Base/pot type (0=none, 1=large pot, 2=small pot) [default: 1]
    #[arg(short, long)]
    base: Option<u8>,

    /// Leaf strings, comma-separated [default: &]
    #[arg(short = 'c', long)]
    leaf: Option<OsString>,

    /// Palette indices (0-255) for dark leaf, dark wood, light leaf, light wood [default: 2,3,10,11]
    #[arg(short = 'k', long = "color")]
    color: Option<Palette>,

    /// Branch multiplier (0-20, higher = bushier) [default: 5]
    #[arg(short = 'M', long)]
    multiplier: Option<u32>,

    /// Initial branch life (0-200, higher = bigger tree) [default: 32]
    #[arg(short = 'L', long)]
    life: Option<u32>,

    /// Print tree to stdout (no interactive display)
    #[arg(short, long)]
    print: bool,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Save seed and progress to FILE [default: $XDG_CACHE_HOME/termbonsai]
    #[arg(short = 'W', long, value_name = "FILE", num_args = 0..=1)]
    save: Option<Option<PathBuf>>,

    /// Load seed and progress from FILE [default: $XDG_CACHE_HOME/termbonsai]
    #[arg(short = 'C', long, value_name = "FILE", num_args = 0..=1)]
    load: Option<Option<PathBuf>>,

    /// Increase log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "off",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn settings_seconds(key: &str, value: Option<f64>) -> Option<f64> {
    let value = value?;
    let checked = checked_seconds(value);
    if checked.is_none() {
        tracing::warn!(key, value, "ignoring invalid time from settings");
    }
    checked
}

fn build_config(cli: Cli, settings: Settings) -> BonsaiConfig {
    let file = settings.bonsai;
    let defaults = BonsaiConfig::default();
    let growth_defaults = GrowthConfig::default();

    let leaves = match (cli.leaf, file.leaves) {
        (Some(list), _) => Leaves::parse_list(list.as_encoded_bytes()),
        (None, Some(leaves)) => Leaves::new(leaves),
        (None, None) => growth_defaults.leaves,
    };

    let palette = cli.color.unwrap_or_else(|| {
        file.colors
            .and_then(|colors| match colors.parse::<Palette>() {
                Ok(palette) => Some(palette),
                Err(err) => {
                    tracing::warn!(%err, "ignoring colors from settings");
                    None
                }
            })
            .unwrap_or(growth_defaults.palette)
    });

    let life = cli.life.or(file.life).map_or(growth_defaults.life_start, |l| l.min(200) as i32);
    let multiplier = cli
        .multiplier
        .or(file.multiplier)
        .map_or(growth_defaults.multiplier, |m| m.min(20) as i32);

    let mut config = BonsaiConfig {
        growth: GrowthConfig {
            life_start: life,
            multiplier,
            palette,
            leaves,
            seed: cli.seed.unwrap_or(0),
        },
        live: cli.live,
        infinite: cli.infinite,
        screensaver: cli.screensaver,
        print: cli.print,
        time_step: cli
            .time
            .or_else(|| settings_seconds("time_step", file.time_step))
            .unwrap_or(defaults.time_step),
        time_wait: cli
            .wait
            .or_else(|| settings_seconds("time_wait", file.time_wait))
            .unwrap_or(defaults.time_wait),
        base_type: cli.base.or(file.base).unwrap_or(defaults.base_type).min(2),
        message: cli.message.or(file.message),
        save: cli.save.map(|path| path.unwrap_or_else(persist::default_path)),
        load: cli.load.map(|path| path.unwrap_or_else(persist::default_path)),
    };

    if config.screensaver {
        config.live = true;
        config.infinite = true;
        config.save.get_or_insert_with(persist::default_path);
        if config.load.is_none() && persist::default_path().exists() {
            config.load = Some(persist::default_path());
        }
    }

    config
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(cli, Settings::load());
    tracing::debug!(?config, "starting");

    match bonsai::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
