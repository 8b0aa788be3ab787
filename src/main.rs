//! Trip planner entry point — CLI wiring and config-driven orchestrator
//! construction.

use std::path::Path;
use std::process;
use std::sync::Arc;

use eld_trip_planner::config::AppConfig;
use eld_trip_planner::io::export::{export_daily_logs_csv, export_timeline_csv};
use eld_trip_planner::planner::{NominatimGeocoder, OpenRouteServiceRouter, TripPlanner};

/// Parsed CLI arguments.
struct CliArgs {
    current: String,
    pickup: String,
    dropoff: String,
    cycle_used_hours: f64,
    csv_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("eld-trip-planner — FMCSA Hours-of-Service trip planner");
    eprintln!();
    eprintln!("Usage: eld-trip-planner --current <addr> --pickup <addr> --dropoff <addr> --cycle-used <hours>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --current <address>     Driver's current location");
    eprintln!("  --pickup <address>      Pickup location");
    eprintln!("  --dropoff <address>     Dropoff location");
    eprintln!("  --cycle-used <hours>    Hours already used in the 70-hour/8-day cycle");
    eprintln!("  --csv-out <prefix>      Write <prefix>-timeline.csv and <prefix>-logs.csv");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start the HTTP API server instead of planning a trip");
        eprintln!("  --port <u16>             API server port (overrides ELD_BIND_ADDR's port)");
    }
    eprintln!("  --help                   Show this help message");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut current = None;
    let mut pickup = None;
    let mut dropoff = None;
    let mut cycle_used_hours = None;
    let mut csv_out = None;
    #[cfg(feature = "api")]
    let mut serve = false;
    #[cfg(feature = "api")]
    let mut port: Option<u16> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--current" => {
                i += 1;
                current = args.get(i).cloned();
            }
            "--pickup" => {
                i += 1;
                pickup = args.get(i).cloned();
            }
            "--dropoff" => {
                i += 1;
                dropoff = args.get(i).cloned();
            }
            "--cycle-used" => {
                i += 1;
                match args.get(i).map(|s| s.parse::<f64>()) {
                    Some(Ok(v)) => cycle_used_hours = Some(v),
                    _ => {
                        eprintln!("error: --cycle-used requires a numeric hours argument");
                        process::exit(1);
                    }
                }
            }
            "--csv-out" => {
                i += 1;
                csv_out = args.get(i).cloned();
            }
            #[cfg(feature = "api")]
            "--serve" => {
                serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                match args.get(i).map(|s| s.parse::<u16>()) {
                    Some(Ok(p)) => port = Some(p),
                    _ => {
                        eprintln!("error: --port requires a valid u16 argument");
                        process::exit(1);
                    }
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    #[cfg(feature = "api")]
    if serve {
        return CliArgs {
            current: String::new(),
            pickup: String::new(),
            dropoff: String::new(),
            cycle_used_hours: 0.0,
            csv_out: None,
            serve,
            port: port.unwrap_or(0),
        };
    }

    let (Some(current), Some(pickup), Some(dropoff), Some(cycle_used_hours)) =
        (current, pickup, dropoff, cycle_used_hours)
    else {
        eprintln!("error: --current, --pickup, --dropoff, and --cycle-used are all required");
        print_help();
        process::exit(1);
    };

    CliArgs {
        current,
        pickup,
        dropoff,
        cycle_used_hours,
        csv_out,
        #[cfg(feature = "api")]
        serve,
        #[cfg(feature = "api")]
        port: port.unwrap_or(0),
    }
}

fn print_report(response: &eld_trip_planner::planner::PlanTripResponse) {
    println!(
        "Route: {:.1} mi, {:.1} h driving",
        response.route.total_distance_miles, response.route.total_duration_hours
    );
    for leg in &response.route.legs {
        println!(
            "  {} -> {}: {:.1} mi, {:.1} h",
            leg.from, leg.to, leg.distance_miles, leg.duration_hours
        );
    }

    println!();
    println!("Timeline ({} events):", response.timeline.len());
    for ev in &response.timeline {
        println!(
            "  day {} [{}] {} -> {} ({} min) at {} — {}",
            ev.day, ev.status, ev.start_time, ev.end_time, ev.duration_mins, ev.location, ev.note
        );
    }

    println!();
    println!("Daily logs ({} days):", response.daily_logs.len());
    for log in &response.daily_logs {
        println!(
            "  {}: OFF {:.2}h SB {:.2}h D {:.2}h ON {:.2}h",
            log.date, log.totals.off, log.totals.sleeper_berth, log.totals.driving, log.totals.on_duty
        );
    }

    println!();
    println!(
        "Summary: {} day(s), {:.1} mi driven, cycle {:.1}h -> {:.1}h",
        response.summary.total_days,
        response.summary.total_driving_miles,
        response.summary.cycle_hours_at_start,
        response.summary.cycle_hours_at_end
    );
}

fn main() {
    #[cfg(feature = "api")]
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = parse_args();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });

    #[cfg(feature = "api")]
    if cli.serve {
        let geocoder = NominatimGeocoder::new(
            config.geocoder_user_agent.clone(),
            config.geocoder_rate_limit_per_sec,
        );
        let router = OpenRouteServiceRouter::new(config.ors_api_key.clone());
        let planner = TripPlanner::new(Arc::new(geocoder), Arc::new(router));
        let state = Arc::new(eld_trip_planner::api::AppState { planner });

        let mut addr = config.bind_addr;
        if cli.port != 0 {
            addr.set_port(cli.port);
        }

        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(eld_trip_planner::api::serve(state, addr));
        return;
    }

    let geocoder = NominatimGeocoder::new(
        config.geocoder_user_agent.clone(),
        config.geocoder_rate_limit_per_sec,
    );
    let router = OpenRouteServiceRouter::new(config.ors_api_key.clone());
    let planner = TripPlanner::new(Arc::new(geocoder), Arc::new(router));

    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("error: failed to create tokio runtime: {e}");
        process::exit(1);
    });

    let response = rt.block_on(planner.plan_trip(
        &cli.current,
        &cli.pickup,
        &cli.dropoff,
        cli.cycle_used_hours,
    ));

    let response = match response {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    print_report(&response);

    if let Some(prefix) = cli.csv_out {
        let timeline_path = format!("{prefix}-timeline.csv");
        let logs_path = format!("{prefix}-logs.csv");
        if let Err(e) = export_timeline_csv(&response.timeline, Path::new(&timeline_path)) {
            eprintln!("error: failed to write {timeline_path}: {e}");
            process::exit(1);
        }
        if let Err(e) = export_daily_logs_csv(&response.daily_logs, Path::new(&logs_path)) {
            eprintln!("error: failed to write {logs_path}: {e}");
            process::exit(1);
        }
        eprintln!("Timeline written to {timeline_path}");
        eprintln!("Daily logs written to {logs_path}");
    }
}
