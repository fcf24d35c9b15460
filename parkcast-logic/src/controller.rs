use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::{sync::RwLock, task::JoinHandle};

use crate::{
    controller_state::{ControllerState, ControllerUiState},
    error::ControllerError,
    location::{Coordinates, LocationService},
    map::{MapRegion, MapService, external_map_url},
    points::{POINTS_OF_INTEREST, PointOfInterest, find_point_of_interest},
    settings::ControllerSettings,
    weather::WeatherService,
};

pub trait StateUpdateSender: Send + Sync {
    /// The controller's state changed, the UI should call [Controller::get_ui_state]
    fn send_update(&self);
    /// Something failed. The controller has already logged it and left its state as it was.
    fn report_failure(&self, _failure: &ControllerError) {}
}

/// Owns the user's location and the last weather snapshot. Gets location from [LocationService],
/// weather from [WeatherService], and moves the map through [MapService].
pub struct Controller<L: LocationService, W: WeatherService, M: MapService, S: StateUpdateSender>
{
    state: RwLock<ControllerState>,
    location: L,
    weather: W,
    map: M,
    state_update_sender: S,
    settings: ControllerSettings,
}

impl<L: LocationService, W: WeatherService, M: MapService, S: StateUpdateSender>
    Controller<L, W, M, S>
{
    pub fn new(
        settings: ControllerSettings,
        location: L,
        weather: W,
        map: M,
        state_update_sender: S,
    ) -> Self {
        Self {
            state: RwLock::new(ControllerState::new()),
            location,
            weather,
            map,
            state_update_sender,
            settings,
        }
    }

    pub fn points_of_interest(&self) -> &'static [PointOfInterest] {
        &POINTS_OF_INTEREST
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn state_update_sender(&self) -> &S {
        &self.state_update_sender
    }

    pub async fn get_ui_state(&self) -> ControllerUiState {
        self.state.read().await.as_ui_state()
    }

    fn report(&self, failure: ControllerError) {
        warn!("{failure}");
        self.state_update_sender.report_failure(&failure);
    }

    /// Ask for permission and, if given, get and store the current position
    async fn locate(&self) -> Option<Coordinates> {
        match self.location.request_permission().await {
            Ok(permission) if permission.is_granted() => {}
            Ok(_) => {
                self.report(ControllerError::PermissionDenied);
                return None;
            }
            Err(why) => {
                self.report(ControllerError::Location(format!("{why:#}")));
                return None;
            }
        }

        match self.location.current_position().await {
            Ok(coordinates) => {
                self.state.write().await.set_location(coordinates);
                self.state_update_sender.send_update();
                Some(coordinates)
            }
            Err(why) => {
                self.report(ControllerError::Location(format!("{why:#}")));
                None
            }
        }
    }

    /// Startup: get the user's position once so it can be shown on the map, no weather is fetched.
    pub async fn initialize(&self) {
        if let Some(coordinates) = self.locate().await {
            info!(
                "Initial location: {}, {}",
                coordinates.latitude, coordinates.longitude
            );
        }
    }

    /// Run [Controller::initialize] in the background
    pub fn spawn_initialize(self: &Arc<Self>) -> JoinHandle<()>
    where
        L: 'static,
        W: 'static,
        M: 'static,
        S: 'static,
    {
        let controller = self.clone();
        tokio::spawn(async move { controller.initialize().await })
    }

    /// "Find my location": locate the user, center the map on them, and fetch their weather.
    /// The camera only waits on the location, the weather updates whenever it arrives.
    pub async fn find_my_location(&self) {
        let Some(coordinates) = self.locate().await else {
            return;
        };

        let region = MapRegion::around(coordinates, self.settings.camera_delta);
        self.map
            .animate_to_region(region, self.settings.camera_animation);

        self.fetch_weather(coordinates).await;
    }

    /// Fetch weather for `coordinates` and make it the current snapshot.
    /// Failures are reported and leave the previous snapshot in place.
    pub async fn fetch_weather(&self, coordinates: Coordinates) {
        let request = self.state.write().await.next_weather_request();

        debug!(
            "Weather request {request} for {}, {}",
            coordinates.latitude, coordinates.longitude
        );

        match self.weather.current_weather(coordinates).await {
            Ok(snapshot) => {
                let applied = self.state.write().await.apply_weather(
                    request,
                    snapshot,
                    self.settings.weather_ordering,
                    Utc::now(),
                );
                if applied {
                    self.state_update_sender.send_update();
                } else {
                    debug!("Dropping weather from request {request}, a newer one already landed");
                }
            }
            Err(why) => self.report(why.into()),
        }
    }

    /// A marker was tapped, show weather for that point. The camera stays where it is.
    pub async fn select_point_of_interest(&self, id: u32) -> Result<(), ControllerError> {
        let point =
            find_point_of_interest(id).ok_or(ControllerError::UnknownPointOfInterest(id))?;
        self.fetch_weather(point.coordinates).await;
        Ok(())
    }

    /// Open `coordinates` in an external maps app or browser
    pub fn open_external_map(&self, coordinates: Coordinates) {
        let url = external_map_url(coordinates, self.settings.external_map_zoom);
        if let Err(why) = self.map.open_url(&url) {
            self.report(ControllerError::ExternalOpenFailure(format!("{why:#}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        settings::WeatherOrdering,
        tests::{MockLocation, MockMap, MockWeather, RecordingSender, server_error, snapshot},
    };
    use tokio::test;

    type TestController = Controller<MockLocation, MockWeather, MockMap, RecordingSender>;

    const HERE: Coordinates = Coordinates::new(43.27, -79.87);

    fn mk_controller(location: MockLocation, weather: MockWeather) -> TestController {
        mk_controller_with(ControllerSettings::default(), location, weather, MockMap::default())
    }

    /// Located at `HERE`, where it's 21.3°C and clear
    fn mk_clear_sky() -> TestController {
        mk_controller(MockLocation::granted(HERE), MockWeather::ok(21.3, "clear sky"))
    }

    fn mk_controller_with(
        settings: ControllerSettings,
        location: MockLocation,
        weather: MockWeather,
        map: MockMap,
    ) -> TestController {
        Controller::new(settings, location, weather, map, RecordingSender::default())
    }

    #[test]
    async fn test_initialize_stores_location_only() {
        let controller = mk_clear_sky();

        controller.initialize().await;

        let state = controller.get_ui_state().await;
        assert_eq!(state.current_location, Some(HERE));
        assert!(state.last_weather.is_none(), "Initialize fetched weather");
        assert!(controller.weather.calls().is_empty());
        assert!(controller.map.regions().is_empty());
        assert_eq!(controller.state_update_sender.updates(), 1);
    }

    #[test]
    async fn test_initialize_denied() {
        let controller = mk_controller(MockLocation::denied(), MockWeather::ok(21.3, "clear sky"));

        controller.initialize().await;

        assert!(controller.get_ui_state().await.current_location.is_none());
        assert_eq!(controller.location.position_requests(), 0);
        assert_eq!(
            controller.state_update_sender.failures(),
            vec![ControllerError::PermissionDenied]
        );
    }

    #[test]
    async fn test_spawn_initialize() {
        let controller = Arc::new(mk_controller(
            MockLocation::granted(HERE),
            MockWeather::ok(21.3, "clear sky"),
        ));

        controller
            .spawn_initialize()
            .await
            .expect("Initialize task panicked");

        assert_eq!(controller.get_ui_state().await.current_location, Some(HERE));
    }

    #[test]
    async fn test_position_failure_leaves_state() {
        let controller = mk_controller(MockLocation::no_fix(), MockWeather::ok(21.3, "clear sky"));

        controller.find_my_location().await;

        let state = controller.get_ui_state().await;
        assert!(state.current_location.is_none());
        assert!(state.last_weather.is_none());
        assert!(controller.weather.calls().is_empty());
        assert!(controller.map.regions().is_empty());
        let failures = controller.state_update_sender.failures();
        assert!(
            matches!(failures.as_slice(), [ControllerError::Location(_)]),
            "Unexpected failures {failures:?}"
        );
    }

    #[test]
    async fn test_find_my_location_denied() {
        let controller = mk_controller(MockLocation::denied(), MockWeather::ok(21.3, "clear sky"));

        controller.select_point_of_interest(1).await.unwrap();
        let before = controller.get_ui_state().await;

        controller.find_my_location().await;

        assert_eq!(controller.get_ui_state().await, before);
        assert_eq!(controller.weather.calls().len(), 1, "Weather fetched without permission");
        assert!(controller.map.regions().is_empty());
        assert_eq!(
            controller.state_update_sender.failures(),
            vec![ControllerError::PermissionDenied]
        );
    }

    #[test]
    async fn test_find_my_location_granted() {
        let controller = mk_clear_sky();

        controller.find_my_location().await;

        let state = controller.get_ui_state().await;
        assert_eq!(state.current_location, Some(HERE));
        assert_eq!(state.last_weather, Some(snapshot(21.3, "clear sky")));
        assert!(state.weather_fetched_at.is_some());
        assert_eq!(controller.weather.calls(), vec![HERE]);

        let regions = controller.map.regions();
        assert_eq!(regions.len(), 1);
        let (region, duration) = regions[0];
        assert_eq!(region.center, HERE);
        assert_eq!(region.latitude_delta, 0.05);
        assert_eq!(region.longitude_delta, 0.05);
        assert_eq!(duration, Duration::from_millis(1000));
        assert!(controller.state_update_sender.failures().is_empty());
    }

    #[test]
    async fn test_find_my_location_twice() {
        let controller = mk_clear_sky();

        controller.find_my_location().await;
        let first = controller.get_ui_state().await;
        controller.find_my_location().await;
        let second = controller.get_ui_state().await;

        assert_eq!(controller.location.permission_requests(), 2);
        assert_eq!(controller.location.position_requests(), 2);
        assert_eq!(controller.weather.calls(), vec![HERE, HERE]);
        assert_eq!(controller.map.regions().len(), 2);
        assert_eq!(first.current_location, second.current_location);
        assert_eq!(first.last_weather, second.last_weather);
    }

    #[test]
    async fn test_camera_moves_when_weather_fails() {
        let controller = mk_controller(MockLocation::granted(HERE), MockWeather::status(503));

        controller.find_my_location().await;

        assert_eq!(controller.get_ui_state().await.current_location, Some(HERE));
        assert_eq!(controller.map.regions().len(), 1);
    }

    #[test]
    async fn test_camera_moves_before_weather_arrives() {
        tokio::time::pause();

        let weather = MockWeather::ok(0.0, "unused").respond_at(
            HERE,
            Duration::from_secs(1),
            Ok(snapshot(21.3, "clear sky")),
        );
        let controller = mk_controller(MockLocation::granted(HERE), weather);

        let midway = async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            (controller.map.regions().len(), controller.get_ui_state().await.last_weather)
        };
        let ((), (regions_midway, weather_midway)) =
            tokio::join!(controller.find_my_location(), midway);

        assert_eq!(regions_midway, 1, "Camera waited on the weather fetch");
        assert!(weather_midway.is_none(), "Weather landed early");
        assert_eq!(
            controller.get_ui_state().await.last_weather,
            Some(snapshot(21.3, "clear sky"))
        );
        assert_eq!(controller.map.regions().len(), 1);
    }

    #[test]
    async fn test_select_each_point_of_interest() {
        for point in POINTS_OF_INTEREST.iter() {
            let controller =
                mk_controller(MockLocation::granted(HERE), MockWeather::ok(12.0, "light rain"));

            controller
                .select_point_of_interest(point.id)
                .await
                .expect("Known point rejected");

            assert_eq!(
                controller.weather.calls(),
                vec![point.coordinates],
                "Wrong fetch for {}",
                point.name
            );
            assert!(
                controller.map.regions().is_empty(),
                "Selecting {} moved the camera",
                point.name
            );
            assert_eq!(
                controller.get_ui_state().await.last_weather,
                Some(snapshot(12.0, "light rain"))
            );
        }
    }

    #[test]
    async fn test_select_unknown_point_of_interest() {
        let controller =
            mk_controller(MockLocation::granted(HERE), MockWeather::ok(12.0, "light rain"));

        let res = controller.select_point_of_interest(42).await;

        assert_eq!(res, Err(ControllerError::UnknownPointOfInterest(42)));
        assert!(controller.weather.calls().is_empty());
    }

    #[test]
    async fn test_failed_fetch_keeps_previous_snapshot() {
        let controller = mk_clear_sky();

        controller.fetch_weather(HERE).await;
        controller.weather.set_default(Err(server_error(500)));
        controller.fetch_weather(HERE).await;

        assert_eq!(
            controller.get_ui_state().await.last_weather,
            Some(snapshot(21.3, "clear sky"))
        );
        let failures = controller.state_update_sender.failures();
        assert_eq!(failures, vec![ControllerError::Weather(server_error(500))]);
        assert!(failures[0].to_string().contains("500"));
    }

    #[test]
    async fn test_failed_fetch_without_snapshot() {
        let controller = mk_controller(MockLocation::granted(HERE), MockWeather::status(500));

        controller.fetch_weather(HERE).await;

        assert!(controller.get_ui_state().await.last_weather.is_none());
        assert_eq!(controller.state_update_sender.updates(), 0);
    }

    #[test]
    async fn test_fetch_weather() {
        let controller = mk_clear_sky();

        controller.fetch_weather(Coordinates::new(43.27, -79.87)).await;

        assert_eq!(
            controller.get_ui_state().await.last_weather,
            Some(snapshot(21.3, "clear sky"))
        );
        assert_eq!(controller.state_update_sender.updates(), 1);
    }

    #[test]
    async fn test_open_external_map() {
        let controller = mk_clear_sky();

        controller.open_external_map(Coordinates::new(43.27, -79.87));

        let urls = controller.map.urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains("43.27"));
        assert!(urls[0].contains("-79.87"));
        assert!(urls[0].contains("z=15"));
        assert!(controller.state_update_sender.failures().is_empty());
    }

    #[test]
    async fn test_open_external_map_failure() {
        let controller = mk_controller_with(
            ControllerSettings::default(),
            MockLocation::granted(HERE),
            MockWeather::ok(21.3, "clear sky"),
            MockMap::unable_to_open(),
        );

        controller.open_external_map(HERE);

        assert_eq!(controller.map.urls().len(), 1);
        let failures = controller.state_update_sender.failures();
        assert!(
            matches!(failures.as_slice(), [ControllerError::ExternalOpenFailure(_)]),
            "Unexpected failures {failures:?}"
        );
    }

    const SLOW: Coordinates = Coordinates::new(43.241850, -79.837614);
    const FAST: Coordinates = Coordinates::new(43.270365, -79.871871);

    /// `SLOW` is requested first but resolves after `FAST`
    async fn race(ordering: WeatherOrdering) -> TestController {
        tokio::time::pause();

        let weather = MockWeather::ok(0.0, "unused")
            .respond_at(SLOW, Duration::from_secs(2), Ok(snapshot(1.0, "slow")))
            .respond_at(FAST, Duration::from_secs(1), Ok(snapshot(2.0, "fast")));

        let settings = ControllerSettings {
            weather_ordering: ordering,
            ..Default::default()
        };

        let controller =
            mk_controller_with(settings, MockLocation::granted(HERE), weather, MockMap::default());

        tokio::join!(controller.fetch_weather(SLOW), controller.fetch_weather(FAST));

        controller
    }

    #[test]
    async fn test_last_resolved_wins() {
        let controller = race(WeatherOrdering::LastResolved).await;

        assert_eq!(
            controller.get_ui_state().await.last_weather,
            Some(snapshot(1.0, "slow"))
        );
        assert_eq!(controller.state_update_sender.updates(), 2);
    }

    #[test]
    async fn test_latest_request_wins() {
        let controller = race(WeatherOrdering::LatestRequest).await;

        assert_eq!(
            controller.get_ui_state().await.last_weather,
            Some(snapshot(2.0, "fast"))
        );
        assert_eq!(controller.state_update_sender.updates(), 1);
    }
}
