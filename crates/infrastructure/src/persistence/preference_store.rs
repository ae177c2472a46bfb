//! SQLite user preference store
//!
//! Implements `PreferencePort` on `user_preferences` and `favorite_locations`.

use std::sync::Arc;

use application::{
    error::ApplicationError,
    ports::{FavoriteLocation, PreferencePort},
};
use async_trait::async_trait;
use chrono::Utc;
use domain::{GeoLocation, TemperatureUnit, UnitPreferences, UserId, WindUnit};
use rusqlite::{OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument, warn};

use super::{
    connection::ConnectionPool,
    error::{internal, parse_timestamp, timestamp},
};

/// SQLite-based preference store
#[derive(Debug, Clone)]
pub struct SqlitePreferenceStore {
    pool: Arc<ConnectionPool>,
}

impl SqlitePreferenceStore {
    /// Create a new preference store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

fn row_to_units(row: &Row<'_>) -> rusqlite::Result<(String, String)> {
    Ok((row.get(0)?, row.get(1)?))
}

fn parse_units(temperature: &str, wind: &str) -> UnitPreferences {
    let temperature = temperature.parse::<TemperatureUnit>().unwrap_or_else(|e| {
        warn!(value = %temperature, error = %e, "Unknown stored temperature unit");
        TemperatureUnit::default()
    });
    let wind = wind.parse::<WindUnit>().unwrap_or_else(|e| {
        warn!(value = %wind, error = %e, "Unknown stored wind unit");
        WindUnit::default()
    });
    UnitPreferences { temperature, wind }
}

fn row_to_favorite(row: &Row<'_>) -> rusqlite::Result<FavoriteLocation> {
    let latitude: Option<f64> = row.get(1)?;
    let longitude: Option<f64> = row.get(2)?;
    let created_at: String = row.get(4)?;

    Ok(FavoriteLocation {
        name: row.get(0)?,
        coordinates: latitude
            .zip(longitude)
            .and_then(|(lat, lon)| GeoLocation::new(lat, lon).ok()),
        is_default: row.get::<_, i32>(3)? != 0,
        created_at: parse_timestamp(&created_at),
    })
}

#[async_trait]
impl PreferencePort for SqlitePreferenceStore {
    #[instrument(skip(self), fields(user = %user))]
    async fn language(&self, user: &UserId) -> Result<Option<String>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let user = user.as_str().to_string();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            let language = conn
                .query_row(
                    "SELECT language_code FROM user_preferences WHERE user_id = ?1",
                    [&user],
                    |row| row.get::<_, Option<String>>(0),
                )
                .optional()
                .map_err(internal)?;
            Ok(language.flatten())
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn units(&self, user: &UserId) -> Result<Option<UnitPreferences>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let user = user.as_str().to_string();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            let units = conn
                .query_row(
                    "SELECT temperature_unit, wind_unit FROM user_preferences WHERE user_id = ?1",
                    [&user],
                    row_to_units,
                )
                .optional()
                .map_err(internal)?;
            Ok(units.map(|(t, w)| parse_units(&t, &w)))
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn set_language(&self, user: &UserId, language: &str) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let user = user.as_str().to_string();
        let language = language.to_string();
        let now = timestamp(Utc::now());

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            conn.execute(
                "INSERT INTO user_preferences (user_id, language_code, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)
                 ON CONFLICT(user_id) DO UPDATE SET
                     language_code = excluded.language_code,
                     updated_at = excluded.updated_at",
                params![user, language, now],
            )
            .map_err(internal)?;
            debug!("Stored language preference");
            Ok(())
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn set_units(
        &self,
        user: &UserId,
        units: UnitPreferences,
    ) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let user = user.as_str().to_string();
        let now = timestamp(Utc::now());

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            conn.execute(
                "INSERT INTO user_preferences (user_id, temperature_unit, wind_unit, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(user_id) DO UPDATE SET
                     temperature_unit = excluded.temperature_unit,
                     wind_unit = excluded.wind_unit,
                     updated_at = excluded.updated_at",
                params![user, units.temperature.as_str(), units.wind.as_str(), now],
            )
            .map_err(internal)?;
            debug!("Stored unit preference");
            Ok(())
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip(self, favorite), fields(user = %user, name = %favorite.name))]
    async fn add_favorite(
        &self,
        user: &UserId,
        favorite: &FavoriteLocation,
    ) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let user = user.as_str().to_string();
        let favorite = favorite.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(internal)?;
            let tx = conn.transaction().map_err(internal)?;

            if favorite.is_default {
                tx.execute(
                    "UPDATE favorite_locations SET is_default = 0 WHERE user_id = ?1",
                    [&user],
                )
                .map_err(internal)?;
                tx.execute(
                    "INSERT INTO user_preferences (user_id, default_location, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?3)
                     ON CONFLICT(user_id) DO UPDATE SET
                         default_location = excluded.default_location,
                         updated_at = excluded.updated_at",
                    params![user, favorite.name, timestamp(Utc::now())],
                )
                .map_err(internal)?;
            }

            tx.execute(
                "INSERT INTO favorite_locations (user_id, name, latitude, longitude, is_default, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(user_id, name) DO UPDATE SET
                     latitude = excluded.latitude,
                     longitude = excluded.longitude,
                     is_default = excluded.is_default",
                params![
                    user,
                    favorite.name,
                    favorite.coordinates.map(|c| c.latitude()),
                    favorite.coordinates.map(|c| c.longitude()),
                    i32::from(favorite.is_default),
                    timestamp(favorite.created_at),
                ],
            )
            .map_err(internal)?;

            tx.commit().map_err(internal)?;
            debug!("Saved favorite location");
            Ok(())
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn favorites(&self, user: &UserId) -> Result<Vec<FavoriteLocation>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let user = user.as_str().to_string();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            let mut stmt = conn
                .prepare(
                    "SELECT name, latitude, longitude, is_default, created_at
                     FROM favorite_locations WHERE user_id = ?1
                     ORDER BY is_default DESC, created_at DESC, id DESC",
                )
                .map_err(internal)?;
            let favorites = stmt
                .query_map([&user], row_to_favorite)
                .map_err(internal)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(internal)?;
            Ok(favorites)
        })
        .await
        .map_err(internal)?
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::{config::DatabaseConfig, persistence::create_pool};

    fn store() -> SqlitePreferenceStore {
        let pool = Arc::new(create_pool(&DatabaseConfig::in_memory()).unwrap());
        SqlitePreferenceStore::new(pool)
    }

    #[tokio::test]
    async fn unknown_user_has_no_preferences() {
        let store = store();
        let user = UserId::new("nobody");
        assert!(store.language(&user).await.unwrap().is_none());
        assert!(store.units(&user).await.unwrap().is_none());
        assert!(store.favorites(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn language_and_units_are_independent() {
        let store = store();
        let user = UserId::new("42");

        store.set_language(&user, "fr").await.unwrap();
        assert_eq!(
            store.units(&user).await.unwrap(),
            Some(UnitPreferences::metric())
        );

        store
            .set_units(&user, UnitPreferences::imperial())
            .await
            .unwrap();
        store.set_language(&user, "de").await.unwrap();

        assert_eq!(store.language(&user).await.unwrap().as_deref(), Some("de"));
        assert_eq!(
            store.units(&user).await.unwrap(),
            Some(UnitPreferences::imperial())
        );
    }

    #[tokio::test]
    async fn units_only_row_has_no_language() {
        let store = store();
        let user = UserId::new("7");
        store
            .set_units(&user, UnitPreferences::imperial())
            .await
            .unwrap();
        assert!(store.language(&user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn new_default_favorite_replaces_old_default() {
        let store = store();
        let user = UserId::new("42");
        let earlier = Utc::now() - TimeDelta::hours(1);

        let mut home = FavoriteLocation::new("Home")
            .with_coordinates(GeoLocation::new(52.52, 13.405).unwrap())
            .as_default();
        home.created_at = earlier;
        store.add_favorite(&user, &home).await.unwrap();
        store
            .add_favorite(&user, &FavoriteLocation::new("Gym"))
            .await
            .unwrap();
        store
            .add_favorite(&user, &FavoriteLocation::new("Office").as_default())
            .await
            .unwrap();

        let favorites = store.favorites(&user).await.unwrap();
        let names: Vec<&str> = favorites.iter().map(|f| f.name.as_str()).collect();

        assert_eq!(names[0], "Office");
        assert_eq!(favorites.iter().filter(|f| f.is_default).count(), 1);
        assert_eq!(names.len(), 3);
        let home = favorites.iter().find(|f| f.name == "Home").unwrap();
        assert!(home.coordinates.is_some());
    }

    #[test]
    fn unknown_stored_units_fall_back() {
        let units = parse_units("kelvin", "knots");
        assert_eq!(units, UnitPreferences::default());
    }
}
