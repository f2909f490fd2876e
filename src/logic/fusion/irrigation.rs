use crate::config::ArbitrationConfig;
use crate::logic::agronomy::AgronomyTables;
use crate::models::{FieldSnapshot, ForecastPair, IrrigationAction};

pub const DISAGREEMENT_ALERT: &str = "Uncertain weather: forecasts disagree significantly.";
pub const HEAVY_RAIN_ALERT: &str = "Warning: heavy rain predicted soon.";

#[derive(Debug, Clone, PartialEq)]
pub struct IrrigationDecision {
    pub action: IrrigationAction,
    pub liters_per_acre: f64,
    pub timing: String,
    pub notes: Vec<String>,
    pub risk_alert: Option<String>,
}

impl IrrigationDecision {
    fn new(action: IrrigationAction, timing: &str) -> Self {
        Self {
            action,
            liters_per_acre: 0.0,
            timing: timing.to_string(),
            notes: Vec::new(),
            risk_alert: None,
        }
    }
}

/// Reconciles soil moisture with the live and learned rain forecasts
pub struct IrrigationArbiter<'a> {
    pub agronomy: &'a AgronomyTables,
    pub thresholds: &'a ArbitrationConfig,
}

impl IrrigationArbiter<'_> {
    pub fn decide(&self, snapshot: &FieldSnapshot, forecast: &ForecastPair) -> IrrigationDecision {
        let Some(sensor) = &snapshot.sensor_reading else {
            let mut decision = IrrigationDecision::new(IrrigationAction::Unknown, "unknown");
            decision
                .notes
                .push("Cannot determine irrigation need without soil moisture.".to_string());
            return decision;
        };

        let crop = snapshot.crop.as_str();
        let threshold = self.agronomy.moisture_threshold(crop);
        let mut notes = Vec::new();

        if !snapshot.has_forecast_points() {
            notes.push("No weather forecast available; assuming 0 mm rain.".to_string());
        }

        let mut decision = if sensor.moisture >= threshold {
            notes.push(format!(
                "Moisture {:.1}% is sufficient (>= {:.0}% for {}).",
                sensor.moisture, threshold, crop
            ));
            IrrigationDecision::new(IrrigationAction::NoAction, "n/a")
        } else {
            notes.push(format!(
                "Moisture {:.1}% is below the {:.0}% threshold for {}.",
                sensor.moisture, threshold, crop
            ));
            if !forecast.model_available() {
                notes.push(
                    "Learned rainfall forecast unavailable for this field; arbitration uses the live forecast only."
                        .to_string(),
                );
            }
            self.arbitrate(crop, forecast, &mut notes)
        };

        if forecast.model_available() {
            decision.risk_alert = self.risk_alert(forecast);
        }
        if let Some(alert) = &decision.risk_alert {
            notes.push(alert.clone());
        }

        decision.notes = notes;
        decision
    }

    fn arbitrate(
        &self,
        crop: &str,
        forecast: &ForecastPair,
        notes: &mut Vec<String>,
    ) -> IrrigationDecision {
        let t = self.thresholds;
        let api_says_rain = forecast.api_rain_24h > t.api_rain_today_mm;
        let model_says_rain = forecast.model_rain_24h() > t.model_rain_today_mm;

        if api_says_rain || model_says_rain {
            let mut cited = Vec::new();
            if api_says_rain {
                cited.push(format!("weather API ({:.1} mm)", forecast.api_rain_24h));
            }
            if model_says_rain {
                cited.push(format!("rainfall model ({:.1} mm)", forecast.model_rain_24h()));
            }
            tracing::debug!("Rain expected today per {}", cited.join(", "));
            notes.push(format!(
                "Rain expected in the next 24h per {}; delay irrigation.",
                cited.join(" and ")
            ));
            return IrrigationDecision::new(IrrigationAction::Delay, "after rain");
        }

        if forecast.api_rain_24h < t.storm_api_max_mm
            && forecast.model_rain_48h() > t.storm_model_48h_mm
        {
            tracing::debug!("Storm approaching: model 48h {:.1} mm", forecast.model_rain_48h());
            notes.push(format!(
                "Rainfall model predicts {:.1} mm within 48h although the weather API shows little rain today; delay until the storm passes.",
                forecast.model_rain_48h()
            ));
            return IrrigationDecision::new(IrrigationAction::Delay, "until after storm");
        }

        let liters = self.agronomy.irrigation_liters(crop);
        let outlook = if forecast.model_available() {
            format!(
                "API {:.1} mm, model {:.1} mm in 24h",
                forecast.api_rain_24h, forecast.model_rain_24h()
            )
        } else {
            format!("API {:.1} mm in 24h", forecast.api_rain_24h)
        };
        notes.push(format!(
            "No significant rain expected ({}); irrigate {:.0} L/acre now.",
            outlook, liters
        ));
        let mut decision = IrrigationDecision::new(IrrigationAction::IrrigateNow, "now");
        decision.liters_per_acre = liters;
        decision
    }

    /// First matching alert wins, so at most one is ever raised
    fn risk_alert(&self, forecast: &ForecastPair) -> Option<String> {
        let t = self.thresholds;
        if (forecast.api_rain_24h - forecast.model_rain_24h()).abs() > t.disagreement_mm {
            Some(DISAGREEMENT_ALERT.to_string())
        } else if forecast.api_rain_24h < t.heavy_rain_api_max_mm
            && forecast.model_rain_48h() > t.heavy_rain_model_48h_mm
        {
            Some(HEAVY_RAIN_ALERT.to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastPoint, ModelForecast, SensorReading, WeatherSummary};
    use chrono::{DateTime, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 10, 6, 0, 0).unwrap()
    }

    /// Wheat (30% threshold) with a forecast attached
    fn dry_wheat(moisture: f64) -> FieldSnapshot {
        FieldSnapshot::new("f1", "wheat", "vegetative", now())
            .with_sensor(SensorReading::new(moisture, 6.8, 300.0, 20.0, 150.0))
            .with_weather(WeatherSummary {
                forecast_points: vec![ForecastPoint::new(now(), 0.0)],
                ..Default::default()
            })
    }

    fn decide(snapshot: &FieldSnapshot, pair: ForecastPair) -> IrrigationDecision {
        let agronomy = AgronomyTables::builtin();
        let thresholds = ArbitrationConfig::default();
        IrrigationArbiter {
            agronomy: &agronomy,
            thresholds: &thresholds,
        }
        .decide(snapshot, &pair)
    }

    #[test]
    fn api_rain_delays() {
        let d = decide(&dry_wheat(10.0), ForecastPair::new(6.0, 0.0, 0.0));
        assert_eq!(d.action, IrrigationAction::Delay);
        assert_eq!(d.timing, "after rain");
        assert!(d.notes.iter().any(|n| n.contains("weather API (6.0 mm)")));
        assert!(!d.notes.iter().any(|n| n.contains("rainfall model (")));
    }

    #[test]
    fn model_rain_delays() {
        let d = decide(&dry_wheat(10.0), ForecastPair::new(0.0, 3.5, 3.5));
        assert_eq!(d.action, IrrigationAction::Delay);
        assert!(d.notes.iter().any(|n| n.contains("rainfall model (3.5 mm)")));
    }

    #[test]
    fn storm_delays() {
        let d = decide(&dry_wheat(10.0), ForecastPair::new(0.0, 0.0, 12.0));
        assert_eq!(d.action, IrrigationAction::Delay);
        assert_eq!(d.timing, "until after storm");
        assert_eq!(d.risk_alert.as_deref(), Some(HEAVY_RAIN_ALERT));
    }

    #[test]
    fn dry_forecast_irrigates() {
        let d = decide(&dry_wheat(10.0), ForecastPair::new(0.5, 1.0, 2.0));
        assert_eq!(d.action, IrrigationAction::IrrigateNow);
        assert_eq!(d.timing, "now");
        assert_eq!(d.liters_per_acre, 500.0);
        assert!(d.risk_alert.is_none());
    }

    #[test]
    fn adequate_moisture_is_terminal() {
        let d = decide(&dry_wheat(30.0), ForecastPair::new(0.0, 0.0, 12.0));
        assert_eq!(d.action, IrrigationAction::NoAction);
        assert_eq!(d.liters_per_acre, 0.0);
        // Conflict detection runs regardless of the action
        assert_eq!(d.risk_alert.as_deref(), Some(HEAVY_RAIN_ALERT));
        assert_eq!(d.notes.last().map(String::as_str), Some(HEAVY_RAIN_ALERT));
    }

    #[test]
    fn disagreement_beats_heavy_rain() {
        let d = decide(&dry_wheat(10.0), ForecastPair::new(0.0, 6.0, 20.0));
        assert_eq!(d.risk_alert.as_deref(), Some(DISAGREEMENT_ALERT));
    }

    #[test]
    fn missing_sensor_is_unknown() {
        let snapshot = FieldSnapshot::new("f1", "wheat", "vegetative", now());
        let d = decide(&snapshot, ForecastPair::new(9.0, 0.0, 20.0));
        assert_eq!(d.action, IrrigationAction::Unknown);
        assert_eq!(d.timing, "unknown");
        assert!(d.risk_alert.is_none());
        assert_eq!(d.notes.len(), 1);
    }

    #[test]
    fn unavailable_model_carries_no_weight() {
        // Without a model the 0 mm figures would otherwise read as a
        // 6 mm disagreement
        let pair = ForecastPair::from_sources(6.0, ModelForecast::Unavailable);
        let d = decide(&dry_wheat(10.0), pair);
        assert_eq!(d.action, IrrigationAction::Delay);
        assert!(d.risk_alert.is_none());
        assert!(d
            .notes
            .iter()
            .any(|n| n.starts_with("Learned rainfall forecast unavailable")));
    }

    #[test]
    fn all_zero_model_figures_raise_no_alert() {
        let d = decide(&dry_wheat(10.0), ForecastPair::new(6.0, 0.0, 0.0));
        assert_eq!(
            d,
            decide(
                &dry_wheat(10.0),
                ForecastPair::from_sources(6.0, ModelForecast::from_raw([0.0; 3]))
            )
        );
        assert!(d.risk_alert.is_none());
    }

    #[test]
    fn missing_forecast_is_noted() {
        let snapshot = FieldSnapshot::new("f1", "wheat", "vegetative", now())
            .with_sensor(SensorReading::new(10.0, 6.8, 300.0, 20.0, 150.0));
        let d = decide(&snapshot, ForecastPair::new(0.0, 0.0, 0.0));
        assert_eq!(d.notes[0], "No weather forecast available; assuming 0 mm rain.");
        assert_eq!(d.action, IrrigationAction::IrrigateNow);
    }

    #[test]
    fn thresholds_are_configurable() {
        let agronomy = AgronomyTables::builtin();
        let thresholds = ArbitrationConfig {
            api_rain_today_mm: 10.0,
            ..Default::default()
        };
        let d = IrrigationArbiter {
            agronomy: &agronomy,
            thresholds: &thresholds,
        }
        .decide(&dry_wheat(10.0), &ForecastPair::new(6.0, 0.0, 0.0));
        assert_eq!(d.action, IrrigationAction::IrrigateNow);
    }
}
