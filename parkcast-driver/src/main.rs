use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::warn;
use parkcast_driver::{ConsoleMap, ConsoleSender, DriverWeather, SimulatedLocation, prelude::*};
use parkcast_logic::{
    Controller, ControllerSettings, ControllerUiState, Coordinates, POINTS_OF_INTEREST,
    WeatherOrdering, find_point_of_interest,
};
use parkcast_weather::OpenWeatherClient;
use tokio::task::JoinSet;

type DriverController = Controller<SimulatedLocation, DriverWeather, ConsoleMap, ConsoleSender>;

/// Drive the park weather controller from the command line, against the live weather API
#[derive(Parser)]
struct Cli {
    /// Print the resulting state as JSON
    #[arg(long)]
    json: bool,

    /// Drop weather results that arrive after a newer request's result
    #[arg(long)]
    latest_request: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the points of interest
    Parks,
    /// Select points of interest and fetch their weather, all at once
    Weather {
        /// Ids of the points of interest, selected in this order
        #[arg(required = true, num_args = 1..)]
        ids: Vec<u32>,
    },
    /// Run "find my location" as if the device were at the given position
    Locate {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
    /// Run "find my location" with location permission denied
    Deny,
    /// Open a point of interest in an external map
    MapUrl {
        /// Id of the point of interest
        id: u32,
    },
}

fn weather_service() -> DriverWeather {
    match OpenWeatherClient::from_env() {
        Ok(client) => DriverWeather::Live(client),
        Err(why) => {
            warn!("Weather unavailable: {why:#}");
            DriverWeather::Offline
        }
    }
}

fn print_state(state: &ControllerUiState, json: bool) -> Result {
    if json {
        let out = serde_json::to_string_pretty(state).context("Failed to serialize state")?;
        println!("{out}");
        return Ok(());
    }

    match state.current_location {
        Some(c) => println!("Location: {}, {}", c.latitude, c.longitude),
        None => println!("Location: unknown"),
    }
    match &state.last_weather {
        Some(weather) => println!("Weather: {}", weather.summary()),
        None => println!("Weather: none"),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    colog::init();

    let cli = Cli::parse();

    let settings = ControllerSettings {
        weather_ordering: if cli.latest_request {
            WeatherOrdering::LatestRequest
        } else {
            WeatherOrdering::LastResolved
        },
        ..Default::default()
    };

    let controller = match cli.command {
        Commands::Parks => {
            for point in POINTS_OF_INTEREST.iter() {
                let Coordinates {
                    latitude,
                    longitude,
                } = point.coordinates;
                println!("{:>2}  {:<42} {latitude:>10}, {longitude}", point.id, point.name);
            }
            return Ok(());
        }
        Commands::Weather { ids } => {
            let controller =
                mk_controller(settings, SimulatedLocation::denied(), weather_service());
            let mut selections = JoinSet::new();
            for id in ids {
                let controller = controller.clone();
                selections.spawn(async move { controller.select_point_of_interest(id).await });
            }
            while let Some(res) = selections.join_next().await {
                res.context("Selection task panicked")?
                    .context("Failed to select point of interest")?;
            }
            controller
        }
        Commands::Locate { lat, lon } => {
            let location = SimulatedLocation::at(Coordinates::new(lat, lon));
            let controller = mk_controller(settings, location, weather_service());
            controller.find_my_location().await;
            controller
        }
        Commands::Deny => {
            let controller =
                mk_controller(settings, SimulatedLocation::denied(), DriverWeather::Offline);
            controller.find_my_location().await;
            controller
        }
        Commands::MapUrl { id } => {
            let point = find_point_of_interest(id)
                .with_context(|| format!("No point of interest with id {id}"))?;
            let controller =
                mk_controller(settings, SimulatedLocation::denied(), DriverWeather::Offline);
            controller.open_external_map(point.coordinates);
            for url in controller.map().opened() {
                println!("{url}");
            }
            return Ok(());
        }
    };

    print_state(&controller.get_ui_state().await, cli.json)?;
    if !cli.json {
        println!("Updates: {}", controller.state_update_sender().updates());
    }

    let failures = controller.state_update_sender().failures();
    if let Some(first) = failures.first() {
        bail!("{} operation(s) failed, first: {first}", failures.len());
    }

    Ok(())
}

fn mk_controller(
    settings: ControllerSettings,
    location: SimulatedLocation,
    weather: DriverWeather,
) -> Arc<DriverController> {
    Arc::new(Controller::new(
        settings,
        location,
        weather,
        ConsoleMap::default(),
        ConsoleSender::default(),
    ))
}
