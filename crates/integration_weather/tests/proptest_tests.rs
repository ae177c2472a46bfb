//! Property-based tests for normalization

#![allow(clippy::unwrap_used)]

use domain::{AqiBand, Pollutants};
use integration_weather::{
    api,
    normalize::{self, HOURLY_WINDOW},
};
use proptest::prelude::*;

fn concentration() -> impl Strategy<Value = f64> {
    0.0..5000.0_f64
}

fn pollutants() -> impl Strategy<Value = Pollutants> {
    (
        concentration(),
        concentration(),
        concentration(),
        concentration(),
        concentration(),
    )
        .prop_map(|(co, no2, o3, pm2_5, pm10)| Pollutants {
            co,
            no2,
            o3,
            pm2_5,
            pm10,
        })
}

proptest! {
    #[test]
    fn aqi_is_monotonic_in_each_pollutant(base in pollutants(), bump in 0.0..500.0_f64, which in 0usize..5) {
        let mut raised = base;
        match which {
            0 => raised.co += bump,
            1 => raised.no2 += bump,
            2 => raised.o3 += bump,
            3 => raised.pm2_5 += bump,
            _ => raised.pm10 += bump,
        }
        prop_assert!(raised.composite_aqi() >= base.composite_aqi());
    }

    #[test]
    fn band_is_monotonic(a in 0u32..1000, b in 0u32..1000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let rank = |band: AqiBand| match band {
            AqiBand::Good => 0,
            AqiBand::Moderate => 1,
            AqiBand::UnhealthyForSensitiveGroups => 2,
            AqiBand::Unhealthy => 3,
        };
        prop_assert!(rank(AqiBand::from_aqi(lo)) <= rank(AqiBand::from_aqi(hi)));
    }

    #[test]
    fn local_hour_accepts_any_valid_time(hour in 0u8..24, minute in 0u8..60) {
        let localtime = format!("2024-05-01 {hour}:{minute:02}");
        prop_assert_eq!(normalize::local_hour(&localtime), Some(hour));
    }
}

mod hourly {
    use super::*;

    fn day(hours: usize) -> serde_json::Value {
        let entries: Vec<serde_json::Value> = (0..hours)
            .map(|h| serde_json::json!({ "time": format!("2024-01-15 {h:02}:00"), "temp_c": h }))
            .collect();
        serde_json::json!({ "date": "2024-01-15", "hour": entries })
    }

    proptest! {
        #[test]
        fn window_is_bounded_and_ordered(current in 0u8..24, hours in 0usize..=24) {
            let body = serde_json::json!({ "forecast": { "forecastday": [day(hours)] } });
            let entries = hourly_window_from(&body, current);

            prop_assert!(entries.len() <= HOURLY_WINDOW);
            let expected: Vec<u8> = (0..HOURLY_WINDOW)
                .map(|i| ((usize::from(current) + i) % 24) as u8)
                .filter(|h| usize::from(*h) < hours)
                .collect();
            let got: Vec<u8> = entries.iter().map(|e| e.hour).collect();
            prop_assert_eq!(got, expected);
        }
    }

    fn hourly_window_from(body: &serde_json::Value, current: u8) -> Vec<domain::HourlyForecastEntry> {
        let resp: api::ForecastResponse = serde_json::from_value(body.clone()).unwrap();
        normalize::hourly_window(&resp.forecast.forecastday, current)
    }
}
