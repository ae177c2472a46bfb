//! Wiring of configuration, stores and services, and command execution

use std::{fmt::Write as _, sync::Arc};

use anyhow::{Context, bail};
use application::{
    ActionHandler, ReportRenderer, WeatherService,
    ports::{
        FavoriteLocation, PreferencePort, RequestLogPort, TextLookupPort, WeatherCachePort,
        WeatherPort,
    },
};
use chrono::Utc;
use domain::{UnitPreferences, UserId};
use infrastructure::{
    AppConfig, CACHE_MAINTENANCE_TASK, MaintenanceScheduler, SqlitePreferenceStore,
    SqliteRequestLog, SqliteWeatherCache, TextCatalog, WeatherAdapter, create_cache_maintenance_task,
    create_pool,
};
use tracing::info;

use crate::cli::{Commands, PrefsCommand};

/// Everything a command needs, built once from configuration
pub struct App {
    config: AppConfig,
    weather: WeatherService,
    actions: ActionHandler,
    renderer: ReportRenderer,
    catalog: Arc<dyn TextLookupPort>,
    preferences: Arc<dyn PreferencePort>,
    request_log: Arc<dyn RequestLogPort>,
    cache: Arc<dyn WeatherCachePort>,
}

impl App {
    /// Open the database, build the adapter and wire the services
    ///
    /// # Errors
    ///
    /// Fails if the database cannot be opened, the API key is missing or the
    /// default language has no catalog.
    pub fn build(config: AppConfig) -> anyhow::Result<Self> {
        let pool = Arc::new(create_pool(&config.database).context("Failed to open database")?);

        let mut catalog = TextCatalog::embedded(&config.localization.default_language)
            .context("Failed to load text catalog")?;
        if let Some(dir) = &config.localization.catalog_dir {
            catalog = catalog
                .with_overrides_from(dir)
                .with_context(|| format!("Failed to load catalogs from {}", dir.display()))?;
        }
        let catalog: Arc<dyn TextLookupPort> = Arc::new(catalog);
        let weather_port: Arc<dyn WeatherPort> = Arc::new(
            WeatherAdapter::new(&config.weather.client_config())
                .context("Failed to configure weather provider")?,
        );
        let cache: Arc<dyn WeatherCachePort> = Arc::new(SqliteWeatherCache::with_log_retention_days(
            Arc::clone(&pool),
            config.cache.log_retention_days,
        ));
        let request_log: Arc<dyn RequestLogPort> = Arc::new(SqliteRequestLog::new(Arc::clone(&pool)));
        let preferences: Arc<dyn PreferencePort> = Arc::new(SqlitePreferenceStore::new(pool));

        let weather = WeatherService::with_config(
            weather_port,
            Arc::clone(&cache),
            Arc::clone(&request_log),
            config.cache.service_config(),
        );
        let renderer = ReportRenderer::new(Arc::clone(&catalog));
        let actions = ActionHandler::new(weather.clone(), renderer.clone(), Arc::clone(&preferences))
            .with_default_units(config.localization.default_units());

        Ok(Self {
            config,
            weather,
            actions,
            renderer,
            catalog,
            preferences,
            request_log,
            cache,
        })
    }

    /// Run one command and return what to print
    ///
    /// Weather lookups that fail are rendered as an error line rather than
    /// returned as errors, the same way a chat reply would show them.
    pub async fn run(
        &self,
        user: &UserId,
        lang: Option<&str>,
        command: Commands,
    ) -> anyhow::Result<String> {
        let language = match lang {
            Some(lang) => self.renderer.resolve_language(Some(lang)),
            None => self.actions.language_for(user).await,
        };
        let units = self.actions.units_for(user).await;
        let r = &self.renderer;
        let fail = |e: application::ApplicationError| r.error_line(&e, &language);

        let out = match command {
            Commands::Current { location } => self
                .weather
                .current(user, &location)
                .await
                .map_or_else(fail, |c| r.current(&c, &language, units)),
            Commands::Forecast { location, days, .. } => {
                if days {
                    self.weather
                        .daily_forecast(user, &location)
                        .await
                        .map_or_else(fail, |d| r.daily(&d, &language, units))
                } else {
                    self.weather
                        .hourly_forecast(user, &location)
                        .await
                        .map_or_else(fail, |h| r.hourly(&h, &language, units))
                }
            },
            Commands::Air { location } => self
                .weather
                .air_quality(user, &location)
                .await
                .map_or_else(fail, |a| r.air_quality(&a, &language)),
            Commands::Alerts { location } => self
                .weather
                .alerts(user, &location)
                .await
                .map_or_else(fail, |a| r.alerts(&a, &language)),
            Commands::Report { location } => self
                .weather
                .full_report(user, &location)
                .await
                .map_or_else(fail, |report| r.full_report(&report, &language, units)),
            Commands::Astronomy { location, date } => {
                let date = date.unwrap_or_else(|| Utc::now().date_naive());
                self.weather
                    .astronomy(user, &location, date)
                    .await
                    .map_or_else(fail, |a| r.astronomy(&a, &location, &language))
            },
            Commands::Search { text } => self
                .weather
                .search_locations(user, &text)
                .await
                .map_or_else(fail, |m| r.search_results(&m, &language)),
            Commands::History { location, date } => self
                .weather
                .historical(user, &location, date)
                .await
                .map_or_else(fail, |d| r.history(&d, &location, &language, units)),
            Commands::Action { callback_data } => {
                let mut out = self.actions.handle_callback(user, &callback_data).await;
                if let Ok(action) = domain::WeatherAction::parse_callback(&callback_data) {
                    out.push_str("\n\n");
                    for (label, data) in self.actions.keyboard(&language, &action.location) {
                        let _ = writeln!(out, "[{label}] {data}");
                    }
                }
                out.trim_end().to_string()
            },
            Commands::Prefs { command } => self.prefs(user, &language, command).await?,
            Commands::Stats { days } => self.stats(user, days).await?,
            Commands::Analytics => self.analytics().await?,
            Commands::Cleanup => {
                let task = create_cache_maintenance_task(Arc::clone(&self.cache));
                task().await.map_err(anyhow::Error::msg)?;
                "🧹 Cache maintenance completed".to_string()
            },
            Commands::ServeMaintenance => {
                self.serve_maintenance().await?;
                "Maintenance stopped".to_string()
            },
        };

        Ok(plain_text(&out))
    }

    async fn prefs(
        &self,
        user: &UserId,
        language: &str,
        command: PrefsCommand,
    ) -> anyhow::Result<String> {
        match command {
            PrefsCommand::SetLanguage { language: requested } => {
                if !self.catalog.is_supported(&requested) {
                    bail!(
                        "Unsupported language '{requested}' (available: {})",
                        self.catalog.supported_languages().join(", ")
                    );
                }
                self.preferences.set_language(user, &requested).await?;
                Ok(self.renderer.t("language_set", &requested))
            },
            PrefsCommand::SetUnits(args) => {
                let units = UnitPreferences {
                    temperature: args.temperature,
                    wind: args.wind,
                };
                self.preferences.set_units(user, units).await?;
                Ok(self.renderer.t("units_set", language))
            },
            PrefsCommand::AddFavorite { name, default } => {
                let favorite = FavoriteLocation::new(name.trim());
                let favorite = if default { favorite.as_default() } else { favorite };
                self.preferences.add_favorite(user, &favorite).await?;
                Ok(format!("⭐ {}", favorite.name))
            },
            PrefsCommand::Show => {
                let stored = self.preferences.language(user).await?;
                let units = self.actions.units_for(user).await;
                let favorites = self.preferences.favorites(user).await?;

                let mut out = format!("👤 {user}\n");
                let _ = writeln!(
                    out,
                    "Language: {}",
                    stored.as_deref().unwrap_or("(default)")
                );
                let _ = writeln!(out, "Temperature: {}", units.temperature.as_str());
                let _ = writeln!(out, "Wind: {}", units.wind.as_str());
                for favorite in favorites {
                    let marker = if favorite.is_default { " (default)" } else { "" };
                    let _ = writeln!(out, "⭐ {}{marker}", favorite.name);
                }
                Ok(out.trim_end().to_string())
            },
        }
    }

    async fn stats(&self, user: &UserId, days: u32) -> anyhow::Result<String> {
        let stats = self.request_log.user_stats(user, days).await?;

        let mut out = format!("📊 Requests by {user} in the last {days} days\n");
        let _ = writeln!(out, "Total: {}", stats.total_requests);
        let _ = writeln!(
            out,
            "Successful: {} ({:.1}%)",
            stats.successful_requests,
            stats.success_rate() * 100.0
        );
        let _ = writeln!(out, "Average response: {:.0} ms", stats.avg_response_ms);
        for top in &stats.top_locations {
            let _ = writeln!(out, "  {} × {}", top.count, top.location);
        }
        Ok(out.trim_end().to_string())
    }

    async fn analytics(&self) -> anyhow::Result<String> {
        let summary = self.request_log.analytics_summary().await?;

        let mut out = String::from("📈 Usage summary\n");
        let _ = writeln!(out, "Users: {}", summary.total_users);
        let _ = writeln!(out, "Requests today: {}", summary.requests_today);
        if !summary.top_locations.is_empty() {
            let _ = writeln!(out, "Top locations (7 days):");
            for top in &summary.top_locations {
                let _ = writeln!(out, "  {} × {}", top.count, top.location);
            }
        }
        if !summary.languages.is_empty() {
            let _ = writeln!(out, "Languages:");
            for lang in &summary.languages {
                let _ = writeln!(out, "  {}: {}", lang.language, lang.users);
            }
        }
        Ok(out.trim_end().to_string())
    }

    async fn serve_maintenance(&self) -> anyhow::Result<()> {
        let scheduler = MaintenanceScheduler::new().await?;
        scheduler
            .add_task(
                CACHE_MAINTENANCE_TASK,
                &self.config.cache.cleanup_cron,
                create_cache_maintenance_task(Arc::clone(&self.cache)),
            )
            .await?;
        scheduler.start().await?;
        info!(cron = %self.config.cache.cleanup_cron, "Serving cache maintenance, Ctrl-C to stop");

        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl-C")?;

        if let Some(stats) = scheduler.task_stats(CACHE_MAINTENANCE_TASK) {
            info!(
                runs = stats.success_count,
                failures = stats.failure_count,
                "Maintenance summary"
            );
        }
        scheduler.remove_task(CACHE_MAINTENANCE_TASK).await?;
        scheduler.shutdown().await?;
        Ok(())
    }
}

/// Strip the chat markup the renderer emits
pub fn plain_text(rendered: &str) -> String {
    rendered.replace("<b>", "").replace("</b>", "")
}
