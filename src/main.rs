use std::path::PathBuf;
use std::process::ExitCode;

use lunar_mochi::{SceneConfig, Viewer};

const USAGE: &str = "Usage: lunar-mochi [CONFIG.json] [--seed N] [--dump-config]";

struct Args {
    config: Option<PathBuf>,
    seed: Option<u64>,
    dump_config: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args {
        config: None,
        seed: None,
        dump_config: false,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                let seed = value
                    .parse()
                    .map_err(|_| format!("Invalid seed '{}'", value))?;
                parsed.seed = Some(seed);
            }
            "--dump-config" => parsed.dump_config = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with('-') => return Err(format!("Unknown option '{}'\n{}", flag, USAGE)),
            path => {
                if parsed.config.replace(PathBuf::from(path)).is_some() {
                    return Err(format!("Only one config file may be given\n{}", USAGE));
                }
            }
        }
    }

    Ok(parsed)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            SceneConfig::load(path)?
        }
        None => SceneConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    if args.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    match config.seed {
        Some(seed) => log::info!("Scene seed: {}", seed),
        None => log::info!("Scene seed: random"),
    }

    Viewer::new(config)?.run()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
