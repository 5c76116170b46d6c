use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skyview::location::FixedLocation;
use skyview::logging::init_logging;
use skyview::session::{self, require_dashboard_access};
use skyview::{
    Credentials, DashboardService, SessionStore, SkyviewConfig, SkyviewError, VERSION,
    resolve_location,
};
use std::path::PathBuf;
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "skyview")]
#[command(about = "Weather dashboard: current conditions, air quality and ML forecasts")]
#[command(version)]
struct Cli {
    /// Path to a config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where the login session is stored
    #[arg(long, global = true, env = "SKYVIEW_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print views as JSON instead of text tiles
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the weather dashboard (requires an admin login)
    Dashboard {
        /// Latitude; the configured default location is used when omitted
        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,
        /// Longitude
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,
    },
    /// Show the ML forecast and heatmap for a coordinate
    Forecast {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Forecast property (e.g. T2M)
        #[arg(long)]
        property: Option<String>,
    },
    /// Show client and backend versions
    Version,
    /// Log in against the forecast backend
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "SKYVIEW_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
}

fn session_store(path: Option<PathBuf>) -> Result<SessionStore> {
    match path {
        Some(path) => Ok(SessionStore::new(path)),
        None => Ok(SessionStore::in_config_dir()?),
    }
}

fn print_view<T: std::fmt::Display + serde::Serialize>(view: &T, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(view).context("Failed to encode view")?
        );
    } else {
        print!("{view}");
    }
    Ok(())
}

async fn run(cli: Cli, config: SkyviewConfig) -> Result<()> {
    let store = session_store(cli.session_file)?;

    match cli.command {
        Commands::Dashboard { lat, lon } => {
            let session = require_dashboard_access(&store)?;
            debug!("Dashboard opened by '{}'", session.username);
            let service = DashboardService::new(&config)?;

            let (latitude, longitude) = match (lat, lon) {
                (Some(lat), Some(lon)) => (lat, lon),
                _ => {
                    let (coordinate, notice) =
                        resolve_location(&FixedLocation(None), config.default_coordinate()).await;
                    if let Some(notice) = notice {
                        eprintln!("{notice}");
                    }
                    (coordinate.latitude(), coordinate.longitude())
                }
            };

            let snapshot = service.refresh(latitude, longitude).await?;
            if !cli.json {
                println!(
                    "{} ({}) - {}",
                    session.username,
                    session.avatar(),
                    snapshot.coordinate
                );
            }
            print_view(&snapshot.view, cli.json)?;
        }
        Commands::Forecast { lat, lon, property } => {
            let service = DashboardService::new(&config)?;
            let snapshot = service.forecast(lat, lon, property.as_deref()).await?;
            print_view(&snapshot.view, cli.json)?;

            if !cli.json {
                if let Some(cells) = &snapshot.view.heatmap {
                    for cell in cells {
                        println!(
                            "   {:>8.3} {:>9.3}  {:>6.1}°C  intensity {:.2}",
                            cell.latitude,
                            cell.longitude,
                            cell.temperature,
                            cell.intensity()
                        );
                    }
                }
            }
        }
        Commands::Version => {
            let service = DashboardService::new(&config)?;
            let backend = service.backend_version().await;
            println!("skyview {VERSION}");
            println!("backend {backend}");
        }
        Commands::Login { username, password } => {
            let service = DashboardService::new(&config)?;
            let credentials = Credentials { username, password };
            let session = session::login(service.backend(), &store, &credentials).await?;
            println!("Logged in as {} ({:?})", session.username, session.role);
            if !session.can_view_dashboard() {
                println!("This account cannot open the dashboard");
            }
        }
        Commands::Logout => {
            store.clear()?;
            println!("Logged out");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SkyviewConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    init_logging(&config.logging);

    if let Err(e) = run(cli, config).await {
        if let Some(skyview_error) = e.downcast_ref::<SkyviewError>() {
            error!("{}", skyview_error);
            eprintln!("{}", skyview_error.user_message());
            std::process::exit(1);
        }
        return Err(e);
    }

    Ok(())
}
