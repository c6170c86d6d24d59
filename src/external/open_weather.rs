use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Deserialize;

use crate::external::provider::{ProviderError, WeatherProvider};
use crate::models::{DayForecast, WeekendWeather};

const ONE_CALL_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";

pub struct OpenWeatherProvider {
    client: reqwest::Client,
    api_key: String,
}

impl OpenWeatherProvider {
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var("OPENWEATHERMAP_API_KEY")
            .map_err(|_| ProviderError::BadResponse("OPENWEATHERMAP_API_KEY not set".into()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OneCallResponse {
    #[serde(default)]
    daily: Vec<DailyEntry>,
}

#[derive(Debug, Deserialize)]
struct DailyEntry {
    dt: i64,
    temp: DailyTemp,
    #[serde(default)]
    weather: Vec<WeatherCondition>,
}

#[derive(Debug, Deserialize)]
struct DailyTemp {
    day: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: String,
}

/// The upcoming Saturday and Sunday, counted from `today`. A Saturday
/// resolves to itself and the next day; a Sunday resolves to itself and
/// the Saturday six days out.
fn next_weekend(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let days_until_saturday = (5 - weekday).rem_euclid(7);
    let days_until_sunday = (6 - weekday).rem_euclid(7);

    (
        today + Duration::days(days_until_saturday),
        today + Duration::days(days_until_sunday),
    )
}

fn day_forecast(entry: &DailyEntry, date: NaiveDate) -> DayForecast {
    DayForecast {
        date: date.format("%Y-%m-%d").to_string(),
        temperature: entry.temp.day.round() as i32,
        description: entry
            .weather
            .first()
            .map(|condition| condition.description.clone())
            .unwrap_or_default(),
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn weekend_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeekendWeather, ProviderError> {
        let response = self
            .client
            .get(ONE_CALL_URL)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("exclude", "current,minutely,hourly,alerts".to_string()),
                ("units", "imperial".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::BadResponse(format!(
                "one call returned HTTP {}",
                response.status()
            )));
        }

        let forecast = response
            .json::<OneCallResponse>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let (saturday, sunday) = next_weekend(Utc::now().date_naive());

        let mut weather = WeekendWeather::default();
        for entry in &forecast.daily {
            let entry_date = match DateTime::from_timestamp(entry.dt, 0) {
                Some(dt) => dt.date_naive(),
                None => continue,
            };

            if entry_date == saturday {
                weather.saturday = Some(day_forecast(entry, saturday));
            } else if entry_date == sunday {
                weather.sunday = Some(day_forecast(entry, sunday));
            }
        }

        Ok(weather)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn midweek_resolves_to_coming_weekend() {
        // 2026-08-05 is a Wednesday
        let (saturday, sunday) = next_weekend(date(2026, 8, 5));
        assert_eq!(saturday, date(2026, 8, 8));
        assert_eq!(sunday, date(2026, 8, 9));
    }

    #[test]
    fn saturday_resolves_to_itself() {
        let (saturday, sunday) = next_weekend(date(2026, 8, 8));
        assert_eq!(saturday, date(2026, 8, 8));
        assert_eq!(sunday, date(2026, 8, 9));
    }

    #[test]
    fn sunday_keeps_itself_but_rolls_saturday_forward() {
        let (saturday, sunday) = next_weekend(date(2026, 8, 9));
        assert_eq!(sunday, date(2026, 8, 9));
        assert_eq!(saturday, date(2026, 8, 15));
    }

    #[test]
    fn forecast_entries_round_temperature() {
        let entry = DailyEntry {
            dt: 0,
            temp: DailyTemp { day: 64.6 },
            weather: vec![WeatherCondition {
                description: "clear sky".to_string(),
            }],
        };

        let forecast = day_forecast(&entry, date(2026, 8, 8));
        assert_eq!(forecast.temperature, 65);
        assert_eq!(forecast.date, "2026-08-08");
        assert_eq!(forecast.description, "clear sky");
    }
}
