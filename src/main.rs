use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use park2go::config::{self, Config};
use park2go::recommend::{recommend, resolve_location, RecommendRequest};
use park2go::scoring::{self, BookingType, PricingConfig, VehicleType};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Args, Debug, Default)]
struct RecommendArgs {
    /// Named Dhaka area, e.g. "gulshan" (takes precedence over --lat/--lon)
    #[arg(short, long)]
    location: Option<String>,

    /// Latitude of the user
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude of the user
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Only slots for this vehicle type, as stored (e.g. "Car", "Bike")
    #[arg(long)]
    vehicle_type: Option<String>,

    /// Only slots with this booking type (regular, premium, prebooked)
    #[arg(long)]
    booking_type: Option<String>,

    /// Price sensitivity (overrides config)
    #[arg(long, allow_negative_numbers = true)]
    alpha: Option<f64>,

    /// Reference composite score (overrides config)
    #[arg(long, allow_negative_numbers = true)]
    delta_bar: Option<f64>,

    /// Slot time-series JSON file (overrides config)
    #[arg(long)]
    slots: Option<PathBuf>,

    /// Evaluate at this local time instead of now (YYYY-MM-DDTHH:MM)
    #[arg(long)]
    at: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recommend the cheapest nearby slots (default if no subcommand)
    Recommend(RecommendArgs),
    /// Price a single slot from a YAML or JSON signals file
    Price {
        /// Signals file
        #[arg(long)]
        signals: PathBuf,

        /// Booking type: regular, premium or prebooked
        #[arg(long, default_value = "regular")]
        booking_type: String,

        /// Vehicle type: car or motorcycle
        #[arg(long, default_value = "car")]
        vehicle_type: String,

        /// Price sensitivity (overrides config)
        #[arg(long, allow_negative_numbers = true)]
        alpha: Option<f64>,

        /// Reference composite score (overrides config)
        #[arg(long, allow_negative_numbers = true)]
        delta_bar: Option<f64>,
    },
    /// Show the effective factor weights
    Weights,
    /// List the named areas accepted by --location
    Areas,
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "park2go")]
#[command(about = "Nearby parking slots with demand-adjusted prices", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/park2go/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "park2go=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Exit with an input error, printing the message
fn input_error(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(EXIT_INPUT);
}

fn evaluation_time(at: Option<&str>, offset: FixedOffset) -> DateTime<FixedOffset> {
    match at {
        None => Utc::now().with_timezone(&offset),
        Some(s) => match NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
            Ok(naive) => match naive.and_local_timezone(offset).single() {
                Some(dt) => dt,
                None => input_error(format!("Invalid --at time: {}", s)),
            },
            Err(e) => input_error(format!("Invalid --at time '{}': {}", s, e)),
        },
    }
}

/// Config pricing with the --alpha/--delta-bar flags applied, checked the
/// same way as the config file
fn pricing_with_flags(config: &Config, alpha: Option<f64>, delta_bar: Option<f64>) -> PricingConfig {
    let pricing = config.pricing().with_overrides(alpha, delta_bar);
    if let Err(errors) = scoring::validate_pricing(&pricing) {
        input_error(errors.join("\n"));
    }
    pricing
}

fn run_recommend(args: RecommendArgs, config: &Config, verbose: bool) {
    let start_time = Instant::now();
    let pricing = pricing_with_flags(config, args.alpha, args.delta_bar);
    let search = config.search();

    let coords = match resolve_location(args.location.as_deref(), args.lat, args.lon) {
        Ok(c) => c,
        Err(e) => input_error(e),
    };

    let weights = match pricing.weight_table() {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let slots_path = args.slots.unwrap_or_else(|| config::slots_path(config));
    let slots = match park2go::slots::load_slots(&slots_path) {
        Ok(s) => s,
        Err(e) => input_error(format!("{:#}", e)),
    };

    // validate_config already checked the offset
    let offset = config::utc_offset(&search)
        .unwrap_or_else(|| input_error("Invalid search.utc_offset_minutes"));

    let request = RecommendRequest {
        location: args.location.filter(|n| !n.trim().is_empty()),
        coords,
        vehicle_type: args.vehicle_type,
        booking_type: args.booking_type,
        alpha: pricing.alpha(),
        delta_bar: pricing.delta_bar(),
        at: evaluation_time(args.at.as_deref(), offset),
        radius_km: search.radius_km,
        limit: search.limit,
    };

    let rec = recommend(&slots, &request, &weights);

    match args.format {
        OutputFormat::Table => {
            let use_colors = park2go::output::should_use_colors();
            println!(
                "{}",
                park2go::output::format_recommendations_table(&rec, use_colors)
            );
        }
        OutputFormat::Tsv => {
            let output = park2go::output::format_tsv(&rec);
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        OutputFormat::Json => match park2go::output::format_json(&rec) {
            Ok(json) => println!("{}", json),
            Err(e) => input_error(e),
        },
    }

    if verbose {
        eprintln!();
        eprintln!(
            "Searched {} stored slots, {} results in {:?}",
            slots.len(),
            rec.results.len(),
            start_time.elapsed()
        );
    }
}

fn run_price(
    signals_path: PathBuf,
    booking_type: String,
    vehicle_type: String,
    alpha: Option<f64>,
    delta_bar: Option<f64>,
    config: &Config,
) {
    // Unlike the slot store, an interactive price check rejects unknown types
    let booking: BookingType = match booking_type.parse() {
        Ok(b) => b,
        Err(e) => input_error(format!("{}. Use regular, premium or prebooked.", e)),
    };
    let vehicle: VehicleType = match vehicle_type.parse() {
        Ok(v) => v,
        Err(e) => input_error(format!("{}. Use car or motorcycle.", e)),
    };

    let signals = match scoring::load_signals(&signals_path) {
        Ok(s) => s,
        Err(e) => input_error(format!("{:#}", e)),
    };

    let pricing = pricing_with_flags(config, alpha, delta_bar);
    let weights = match pricing.weight_table() {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let base_price = scoring::base_price_for(booking, vehicle);
    let scores = scoring::calculate_all_scores(&signals);
    let breakdown = scoring::explain_price(
        base_price,
        &scores,
        &weights,
        pricing.alpha(),
        pricing.delta_bar(),
    );

    println!("Booking type: {}", booking);
    println!("Vehicle type: {}", vehicle);
    println!();
    println!(
        "{}",
        park2go::output::format_price_report(&breakdown, park2go::output::should_use_colors())
    );
}

/// Load and validate the config, exiting on any problem
fn load_config_or_exit(config_path: Option<PathBuf>) -> Config {
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    config
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Recommend(RecommendArgs::default()));
    let config_path = cli.config.map(PathBuf::from);

    match command {
        Commands::Init => {
            if let Err(e) = config::run_init_wizard(config_path) {
                eprintln!("Init failed: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
        Commands::Recommend(args) => {
            let config = load_config_or_exit(config_path);
            run_recommend(args, &config, cli.verbose);
        }
        Commands::Price {
            signals,
            booking_type,
            vehicle_type,
            alpha,
            delta_bar,
        } => {
            let config = load_config_or_exit(config_path);
            run_price(signals, booking_type, vehicle_type, alpha, delta_bar, &config);
        }
        Commands::Weights => {
            let config = load_config_or_exit(config_path);
            match config.pricing().weight_table() {
                Ok(weights) => println!("{}", park2go::output::format_weights(&weights)),
                Err(e) => {
                    eprintln!("Config error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
        Commands::Areas => println!("{}", park2go::output::format_areas()),
    }

    std::process::exit(EXIT_SUCCESS);
}
