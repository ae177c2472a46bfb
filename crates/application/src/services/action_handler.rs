//! Callback dispatch
//!
//! Follow-up buttons carry a [`WeatherAction`]. The handler resolves the
//! user's language and units, runs the matching weather operation and
//! renders the result. Failures render as a localized error line.

use std::{fmt, sync::Arc};

use chrono::Utc;
use domain::{ActionKind, UnitPreferences, UserId, WeatherAction};
use tracing::{debug, instrument, warn};

use super::{report_renderer::ReportRenderer, weather_service::WeatherService};
use crate::ports::PreferencePort;

/// Dispatches weather actions to the orchestrator and renderer
pub struct ActionHandler {
    weather: WeatherService,
    renderer: ReportRenderer,
    preferences: Arc<dyn PreferencePort>,
    default_units: UnitPreferences,
}

impl fmt::Debug for ActionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHandler")
            .field("weather", &self.weather)
            .field("default_units", &self.default_units)
            .finish_non_exhaustive()
    }
}

impl ActionHandler {
    /// Create a handler
    pub fn new(
        weather: WeatherService,
        renderer: ReportRenderer,
        preferences: Arc<dyn PreferencePort>,
    ) -> Self {
        Self {
            weather,
            renderer,
            preferences,
            default_units: UnitPreferences::metric(),
        }
    }

    /// Units used for users without a preferences row
    #[must_use]
    pub const fn with_default_units(mut self, units: UnitPreferences) -> Self {
        self.default_units = units;
        self
    }

    /// The user's language, or the catalog default
    pub async fn language_for(&self, user: &UserId) -> String {
        let stored = match self.preferences.language(user).await {
            Ok(language) => language,
            Err(e) => {
                warn!(user = %user, error = %e, "Failed to load language preference");
                None
            },
        };
        self.renderer.resolve_language(stored.as_deref())
    }

    /// The user's units, or the configured default
    pub async fn units_for(&self, user: &UserId) -> UnitPreferences {
        match self.preferences.units(user).await {
            Ok(Some(units)) => units,
            Ok(None) => self.default_units,
            Err(e) => {
                warn!(user = %user, error = %e, "Failed to load unit preference");
                self.default_units
            },
        }
    }

    /// Decode callback data and handle it
    #[instrument(skip(self), fields(user = %user))]
    pub async fn handle_callback(&self, user: &UserId, data: &str) -> String {
        match WeatherAction::parse_callback(data) {
            Ok(action) => self.handle(user, &action).await,
            Err(e) => {
                debug!(error = %e, "Rejected callback data");
                let language = self.language_for(user).await;
                self.renderer.t("invalid_request", &language)
            },
        }
    }

    /// Run `action` for `user` and render the outcome
    #[instrument(skip(self), fields(user = %user, action = %action.kind, location = %action.location))]
    pub async fn handle(&self, user: &UserId, action: &WeatherAction) -> String {
        let language = self.language_for(user).await;
        let units = self.units_for(user).await;
        let location = action.location.as_str();
        let r = &self.renderer;

        let rendered = match action.kind {
            ActionKind::Current | ActionKind::Refresh => self
                .weather
                .current(user, location)
                .await
                .map(|c| r.current(&c, &language, units)),
            ActionKind::Forecast12h => self
                .weather
                .hourly_forecast(user, location)
                .await
                .map(|h| r.hourly(&h, &language, units)),
            ActionKind::Forecast7d => self
                .weather
                .daily_forecast(user, location)
                .await
                .map(|d| r.daily(&d, &language, units)),
            ActionKind::AirQuality => self
                .weather
                .air_quality(user, location)
                .await
                .map(|a| r.air_quality(&a, &language)),
            ActionKind::Alerts => self
                .weather
                .alerts(user, location)
                .await
                .map(|a| r.alerts(&a, &language)),
            ActionKind::Astronomy => self
                .weather
                .astronomy(user, location, Utc::now().date_naive())
                .await
                .map(|a| r.astronomy(&a, location, &language)),
        };

        rendered.unwrap_or_else(|e| r.error_line(&e, &language))
    }

    /// Follow-up buttons as `(label, callback data)` pairs
    #[must_use]
    pub fn keyboard(&self, language: &str, location: &str) -> Vec<(String, String)> {
        ActionKind::KEYBOARD
            .iter()
            .map(|kind| {
                (
                    self.renderer.t(kind.label_key(), language),
                    WeatherAction::new(*kind, location).to_callback_data(),
                )
            })
            .collect()
    }
}
