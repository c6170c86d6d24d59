use serde::{Deserialize, Serialize};

/// One day of forecast data. Temperature is a rounded daytime value in
/// Fahrenheit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayForecast {
    pub date: String,
    pub temperature: i32,
    pub description: String,
}

/// Forecast for the upcoming weekend. A day the upstream forecast does not
/// cover is simply absent from the serialized object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekendWeather {
    #[serde(rename = "Saturday", skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DayForecast>,
    #[serde(rename = "Sunday", skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DayForecast>,
}

impl WeekendWeather {
    pub fn is_empty(&self) -> bool {
        self.saturday.is_none() && self.sunday.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_days_are_omitted() {
        let weather = WeekendWeather {
            saturday: Some(DayForecast {
                date: "2026-08-08".to_string(),
                temperature: 72,
                description: "clear sky".to_string(),
            }),
            sunday: None,
        };

        let value = serde_json::to_value(&weather).unwrap();
        assert_eq!(value["Saturday"]["temperature"], 72);
        assert!(value.get("Sunday").is_none());
    }
}
