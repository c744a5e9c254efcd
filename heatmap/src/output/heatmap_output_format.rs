use std::{fs::File, io::Write, path::Path};

use clap::ValueEnum;
use geo::{Geometry, MultiPolygon};
use heatmap_core::model::{TimeBand, WeightedIsochrone};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map};
use wkt::ToWkt;

use crate::app::HeatmapAppError;

/// file formats for writing the aggregated heatmap. GeoJSON writes a FeatureCollection
/// with `time` and `divider` properties, WKT and WKB write CSV rows of
/// `time,divider,geometry`.
#[derive(Deserialize, Serialize, ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapOutputFormat {
    #[default]
    #[serde(rename = "geojson")]
    #[value(name = "geojson")]
    GeoJson,
    Wkt,
    Wkb,
}

impl HeatmapOutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            HeatmapOutputFormat::GeoJson => "geojson",
            HeatmapOutputFormat::Wkt => "csv",
            HeatmapOutputFormat::Wkb => "csv",
        }
    }

    pub fn serialize_geometry(
        &self,
        geometry: &MultiPolygon<f64>,
    ) -> Result<String, HeatmapAppError> {
        match self {
            HeatmapOutputFormat::Wkt => Ok(geometry.wkt_string()),
            HeatmapOutputFormat::Wkb => {
                let mut out_bytes = vec![];
                let geometry = Geometry::MultiPolygon(geometry.clone());
                let write_options = wkb::writer::WriteOptions {
                    endianness: wkb::Endianness::BigEndian,
                };
                wkb::writer::write_geometry(&mut out_bytes, &geometry, &write_options).map_err(
                    |e| {
                        HeatmapAppError::OutputError(format!(
                            "failed to write geometry as WKB: {e}"
                        ))
                    },
                )?;
                Ok(hex::encode_upper(out_bytes))
            }
            HeatmapOutputFormat::GeoJson => {
                let geometry = geojson::Geometry::from(geometry);
                let result = serde_json::to_value(geometry)?;
                Ok(result.to_string())
            }
        }
    }

    /// writes every band of the isochrone to the writer in this format
    pub fn write<W: Write>(
        &self,
        isochrone: &WeightedIsochrone,
        writer: W,
    ) -> Result<(), HeatmapAppError> {
        match self {
            HeatmapOutputFormat::GeoJson => {
                let features = isochrone.bands().iter().map(band_feature).collect();
                let collection = geojson::FeatureCollection {
                    bbox: None,
                    features,
                    foreign_members: None,
                };
                serde_json::to_writer(writer, &collection)?;
                Ok(())
            }
            HeatmapOutputFormat::Wkt | HeatmapOutputFormat::Wkb => {
                let mut csv_writer = csv::Writer::from_writer(writer);
                let csv_error =
                    |e: csv::Error| HeatmapAppError::OutputError(format!("failure writing CSV: {e}"));
                csv_writer
                    .write_record(["time", "divider", "geometry"])
                    .map_err(csv_error)?;
                for band in isochrone.bands() {
                    let geometry = self.serialize_geometry(&band.geometry)?;
                    csv_writer
                        .write_record([band.time.to_string(), band.divider.to_string(), geometry])
                        .map_err(csv_error)?;
                }
                csv_writer.flush()?;
                Ok(())
            }
        }
    }

    pub fn write_file(
        &self,
        isochrone: &WeightedIsochrone,
        path: &Path,
    ) -> Result<(), HeatmapAppError> {
        let file = File::create(path).map_err(|e| {
            HeatmapAppError::OutputError(format!("failure creating {}: {e}", path.display()))
        })?;
        self.write(isochrone, std::io::BufWriter::new(file))
    }
}

fn band_feature(band: &TimeBand) -> geojson::Feature {
    let mut properties = Map::new();
    properties.insert(String::from("time"), json!(band.time));
    properties.insert(String::from("divider"), json!(band.divider));
    geojson::Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::from(&band.geometry)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
