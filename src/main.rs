use clap::{Parser, Subcommand};
use std::fs;
use std::process::ExitCode;

use airprox::aircraft::{AircraftState, AlertLevel};
use airprox::conflict::{self, ThresholdTable};
use airprox::web::{self, Config};

#[derive(Parser)]
#[command(name = "airprox")]
#[command(about = "Aircraft proximity alerts around airports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        #[arg(long)]
        config: String,
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<String>,
    },
    /// Validate a config file
    Check {
        #[arg(long)]
        config: String,
    },
    /// Assess a snapshot stored as a JSON array of aircraft records
    Analyze {
        snapshot: String,
        #[arg(long)]
        config: Option<String>,
        /// Print the assessed snapshot as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, bind } => serve(&config, bind),
        Commands::Check { config } => check(&config),
        Commands::Analyze {
            snapshot,
            config,
            json,
        } => analyze(&snapshot, config.as_deref(), json),
    }
}

fn load_config(path: &str) -> Option<Config> {
    match Config::from_file(path) {
        Ok(c) => Some(c),
        Err(e) => {
            eprintln!("Error loading config {}: {}", path, e);
            None
        }
    }
}

fn serve(path: &str, bind: Option<String>) -> ExitCode {
    let Some(mut config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    if let Some(bind) = bind {
        config.web.bind = bind;
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(web::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Server failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn check(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    println!("Config is valid ({} airports)", config.airports.len());
    for airport in &config.airports {
        let marker = if airport.code.eq_ignore_ascii_case(&config.default_airport) {
            " (default)"
        } else {
            ""
        };
        println!(
            "  {}: {} @ {:.4}, {:.4}{}",
            airport.code, airport.name, airport.latitude, airport.longitude, marker
        );
    }
    let t = &config.thresholds;
    for (name, bands) in [
        ("Ground-Ground", &t.ground_ground),
        ("Air-Air", &t.air_air),
        ("Air-Ground", &t.air_ground),
    ] {
        println!(
            "  {}: low {} m, medium {} m, high {} m",
            name,
            bands.low(),
            bands.medium(),
            bands.high()
        );
    }
    println!(
        "  refresh every {}, {} api keys",
        humantime::format_duration(config.refresh.interval),
        config.api_keys.len()
    );
    ExitCode::SUCCESS
}

fn analyze(path: &str, config_path: Option<&str>, json: bool) -> ExitCode {
    let thresholds = match config_path {
        Some(p) => match load_config(p) {
            Some(c) => c.thresholds,
            None => return ExitCode::FAILURE,
        },
        None => ThresholdTable::default(),
    };

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut snapshot: Vec<AircraftState> = match serde_json::from_str(&content) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rejected = snapshot.iter().filter(|ac| !is_finite(ac)).count();
    if rejected > 0 {
        log::warn!("dropping {} records with non-finite values", rejected);
        snapshot.retain(is_finite);
    }

    conflict::assess(&mut snapshot, &thresholds);

    if json {
        return match serde_json::to_string_pretty(&snapshot) {
            Ok(out) => {
                println!("{}", out);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Serialization error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let alerting = snapshot
        .iter()
        .filter(|ac| ac.alert_level > AlertLevel::None)
        .count();
    println!("{} aircraft assessed, {} alerting", snapshot.len(), alerting);
    for ac in &snapshot {
        println!(
            "  {} {}: {}, {}",
            ac.icao24, ac.callsign, ac.status, ac.alert_level
        );
        for c in &ac.conflicts {
            println!(
                "    {} {} at {} m [{}] {}",
                c.icao24, c.callsign, c.distance_m, c.category, c.alert
            );
        }
    }
    ExitCode::SUCCESS
}

fn is_finite(ac: &AircraftState) -> bool {
    [
        ac.latitude,
        ac.longitude,
        ac.altitude_m,
        ac.velocity_mps,
        ac.vertical_rate_mps,
    ]
    .iter()
    .flatten()
    .all(|v| v.is_finite())
}
