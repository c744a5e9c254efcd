use super::{CutoffRange, GeocoderConfig, LocationConfig, RouterConfig};
use crate::{app::HeatmapAppError, output::HeatmapOutputFormat};
use heatmap_core::{algorithm::AggregationOptions, model::TravelDirection};
use serde::{Deserialize, Serialize};

/// defines behaviors for a heatmap run
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct HeatmapConfiguration {
    pub locations: Vec<LocationConfig>,
    pub directions: Vec<TravelDirection>,
    pub from_cutoffs: CutoffRange,
    pub to_cutoffs: CutoffRange,
    pub router: RouterConfig,
    pub geocoder: GeocoderConfig,
    pub aggregation: AggregationOptions,
    pub output_format: HeatmapOutputFormat,
    pub output_file: Option<String>,
}

impl Default for HeatmapConfiguration {
    fn default() -> Self {
        Self {
            locations: vec![],
            directions: TravelDirection::ALL.to_vec(),
            from_cutoffs: CutoffRange::new(1, 40, 1),
            to_cutoffs: CutoffRange::new(1, 30, 1),
            router: RouterConfig::default(),
            geocoder: GeocoderConfig::default(),
            aggregation: AggregationOptions::default(),
            output_format: HeatmapOutputFormat::default(),
            output_file: None,
        }
    }
}

impl HeatmapConfiguration {
    /// cutoff times in seconds for isochrones of the given direction
    pub fn cutoffs_seconds(&self, direction: TravelDirection) -> Result<Vec<u64>, HeatmapAppError> {
        let range = match direction {
            TravelDirection::From => &self.from_cutoffs,
            TravelDirection::To => &self.to_cutoffs,
        };
        range.cutoffs_seconds().map_err(|e| {
            HeatmapAppError::ConfigurationError(format!("invalid {direction} cutoffs: {e}"))
        })
    }

    /// file to write results to, falling back to a name based on the output format
    pub fn get_output_file(&self) -> String {
        self.output_file
            .clone()
            .unwrap_or_else(|| format!("heatmap.{}", self.output_format.extension()))
    }

    pub fn validate(&self) -> Result<(), HeatmapAppError> {
        if self.locations.is_empty() {
            return Err(HeatmapAppError::ConfigurationError(String::from(
                "at least one location is required",
            )));
        }
        if self.directions.is_empty() {
            return Err(HeatmapAppError::ConfigurationError(String::from(
                "at least one travel direction is required",
            )));
        }
        for direction in self.directions.iter() {
            let _ = self.cutoffs_seconds(*direction)?;
        }
        if self.router.modes.is_empty() {
            return Err(HeatmapAppError::ConfigurationError(String::from(
                "router modes must not be empty",
            )));
        }
        if self.router.precision_meters == 0 {
            return Err(HeatmapAppError::ConfigurationError(String::from(
                "router precision must be strictly positive",
            )));
        }
        Ok(())
    }
}

impl TryFrom<&String> for HeatmapConfiguration {
    type Error = HeatmapAppError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        if f.ends_with(".toml") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                HeatmapAppError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            toml::from_str(&s).map_err(|e| {
                HeatmapAppError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else if f.ends_with(".json") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                HeatmapAppError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            serde_json::from_str(&s).map_err(|e| {
                HeatmapAppError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else {
            Err(HeatmapAppError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HeatmapConfiguration;
    use crate::config::LocationConfig;
    use crate::output::HeatmapOutputFormat;
    use heatmap_core::{algorithm::EmptyMergePolicy, model::TravelDirection};

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
            directions = ["from"]
            output_format = "wkt"

            [[locations]]
            address = "Haartmaninkatu 8, 00100 Helsinki"

            [[locations]]
            address = "Rautatientori, Helsinki"
            coordinate = [60.1710, 24.9414]

            [from_cutoffs]
            min_minutes = 5
            max_minutes = 30
            step_minutes = 5

            [aggregation]
            workers = 2
            empty_merge_policy = "carry_forward"
        "#;
        let conf: HeatmapConfiguration = toml::from_str(toml_str).unwrap();
        assert_eq!(conf.locations.len(), 2);
        assert_eq!(conf.locations[0].coordinate, None);
        let point = conf.locations[1].point().unwrap();
        assert_eq!(point.x(), 24.9414);
        assert_eq!(point.y(), 60.1710);
        assert_eq!(conf.directions, vec![TravelDirection::From]);
        assert_eq!(conf.output_format, HeatmapOutputFormat::Wkt);
        assert_eq!(conf.aggregation.workers, Some(2));
        assert_eq!(
            conf.aggregation.empty_merge_policy,
            EmptyMergePolicy::CarryForward
        );
        assert_eq!(conf.router.router_id, "hsl");
        assert_eq!(
            conf.cutoffs_seconds(TravelDirection::From).unwrap(),
            vec![300, 600, 900, 1200, 1500, 1800]
        );
        assert_eq!(conf.get_output_file(), "heatmap.csv");
        assert!(conf.validate().is_ok());
    }

    #[test]
    fn test_json_configuration() {
        let json = serde_json::json!({
            "locations": [{"address": "Maarintie 6, 02150 Espoo"}],
            "router": {"base_url": "http://otp:8080", "date": "2024-01-15", "time": "07:30:00"}
        });
        let conf: HeatmapConfiguration = serde_json::from_value(json).unwrap();
        assert_eq!(conf.router.base_url, "http://otp:8080");
        assert_eq!(conf.router.precision_meters, 100);
        assert_eq!(conf.router.date.to_string(), "2024-01-15");
        assert_eq!(conf.directions, TravelDirection::ALL.to_vec());
    }

    #[test]
    fn test_validate_requires_locations() {
        let conf = HeatmapConfiguration::default();
        assert!(conf.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_cutoffs() {
        let mut conf = HeatmapConfiguration::default();
        conf.locations.push(LocationConfig::new("Rautatientori, Helsinki"));
        conf.to_cutoffs.step_minutes = 0;
        assert!(conf.validate().is_err());
        conf.directions = vec![TravelDirection::From];
        assert!(conf.validate().is_ok());
    }

    #[test]
    fn test_unsupported_configuration_file_type() {
        let result = HeatmapConfiguration::try_from(&String::from("config.yaml"));
        assert!(result.is_err());
    }
}
