use geo::{Geometry, MultiPolygon};
use geojson::FeatureCollection;
use serde_json::Value;

use super::{SourceId, TimeUnit};
use crate::error::HeatmapError;

/// a reachability region for "within `time` minutes".
#[derive(Clone, Debug)]
pub struct CumulativePolygon {
    pub geometry: MultiPolygon<f64>,
    pub time: f64,
}

impl CumulativePolygon {
    pub fn new(geometry: MultiPolygon<f64>, time: f64) -> CumulativePolygon {
        CumulativePolygon { geometry, time }
    }
}

/// the cumulative isochrones computed for one (address, direction) pair, one per cutoff,
/// expected in increasing cutoff order where each polygon contains its predecessor.
#[derive(Clone, Debug)]
pub struct RawCumulativeSequence {
    source: SourceId,
    polygons: Vec<CumulativePolygon>,
}

impl RawCumulativeSequence {
    pub fn new(source: SourceId, polygons: Vec<CumulativePolygon>) -> RawCumulativeSequence {
        RawCumulativeSequence { source, polygons }
    }

    /// reads a cumulative sequence from a GeoJSON feature collection where each feature
    /// is a polygonal reachability region tagged with a numeric time property.
    ///
    /// # Arguments
    ///
    /// * `source` - the (address, direction) pair this collection was computed for
    /// * `collection` - features in payload order
    /// * `time_property` - name of the feature property holding the cutoff time
    /// * `time_unit` - unit of the cutoff time property
    ///
    /// # Returns
    ///
    /// the sequence, or a MalformedIsochrone error naming the offending feature
    pub fn try_from_feature_collection(
        source: SourceId,
        collection: &FeatureCollection,
        time_property: &str,
        time_unit: TimeUnit,
    ) -> Result<RawCumulativeSequence, HeatmapError> {
        let malformed = |message: String| HeatmapError::MalformedIsochrone {
            source_id: source.clone(),
            message,
        };
        if collection.features.is_empty() {
            return Err(malformed(String::from("feature collection has no features")));
        }
        let mut polygons = Vec::with_capacity(collection.features.len());
        for (idx, feature) in collection.features.iter().enumerate() {
            let geojson_geometry = feature
                .geometry
                .as_ref()
                .ok_or_else(|| malformed(format!("feature {idx} has no geometry")))?;
            let geometry = Geometry::<f64>::try_from(geojson_geometry.clone())
                .map_err(|e| malformed(format!("feature {idx} has invalid geometry: {e}")))?;
            let geometry = match geometry {
                Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
                Geometry::MultiPolygon(mp) => mp,
                other => {
                    return Err(malformed(format!(
                        "feature {idx} has unexpected {} geometry, must be polygonal",
                        geometry_type_name(&other)
                    )))
                }
            };
            let raw_time = feature
                .property(time_property)
                .ok_or_else(|| malformed(format!("feature {idx} missing '{time_property}'")))?;
            let time = parse_time(raw_time).ok_or_else(|| {
                malformed(format!(
                    "feature {idx} has non-numeric '{time_property}' value {raw_time}"
                ))
            })?;
            polygons.push(CumulativePolygon::new(geometry, time_unit.to_minutes(time)));
        }
        Ok(RawCumulativeSequence { source, polygons })
    }

    /// reorders the polygons by increasing cutoff time. routers do not agree on the
    /// order they return cumulative isochrones in.
    pub fn into_time_order(mut self) -> RawCumulativeSequence {
        self.polygons.sort_by(|a, b| a.time.total_cmp(&b.time));
        self
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }

    pub fn polygons(&self) -> &[CumulativePolygon] {
        &self.polygons
    }

    pub fn into_parts(self) -> (SourceId, Vec<CumulativePolygon>) {
        (self.source, self.polygons)
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

fn geometry_type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// numeric time values arrive either as JSON numbers or as numeric strings
fn parse_time(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|t| t.is_finite())
}

#[cfg(test)]
mod tests {
    use super::RawCumulativeSequence;
    use crate::error::HeatmapError;
    use crate::model::{SourceId, TimeUnit, TravelDirection};
    use approx::assert_relative_eq;
    use geojson::{FeatureCollection, GeoJson};

    fn source() -> SourceId {
        SourceId::new("Rautatientori, Helsinki", TravelDirection::From)
    }

    fn collection(json: &str) -> FeatureCollection {
        let geojson = json.parse::<GeoJson>().unwrap();
        FeatureCollection::try_from(geojson).unwrap()
    }

    #[test]
    fn test_reads_string_times_in_seconds() {
        let fc = collection(
            r#"{
              "type": "FeatureCollection",
              "features": [
                {"type": "Feature", "properties": {"time": "600"},
                 "geometry": {"type": "MultiPolygon", "coordinates": [[[[0,0],[1,0],[1,1],[0,1],[0,0]]]]}},
                {"type": "Feature", "properties": {"time": 1200},
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[2,0],[2,2],[0,2],[0,0]]]}}
              ]
            }"#,
        );
        let seq =
            RawCumulativeSequence::try_from_feature_collection(source(), &fc, "time", TimeUnit::Seconds)
                .unwrap();
        assert_eq!(seq.len(), 2);
        assert_relative_eq!(seq.polygons()[0].time, 10.0);
        assert_relative_eq!(seq.polygons()[1].time, 20.0);
        assert_eq!(seq.polygons()[1].geometry.0.len(), 1);
    }

    #[test]
    fn test_into_time_order() {
        let fc = collection(
            r#"{
              "type": "FeatureCollection",
              "features": [
                {"type": "Feature", "properties": {"time": "1200"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[2,0],[2,2],[0,2],[0,0]]]}},
                {"type": "Feature", "properties": {"time": "600"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}}
              ]
            }"#,
        );
        let seq =
            RawCumulativeSequence::try_from_feature_collection(source(), &fc, "time", TimeUnit::Seconds)
                .unwrap()
                .into_time_order();
        let times = seq.polygons().iter().map(|p| p.time).collect::<Vec<_>>();
        assert_eq!(times, vec![10.0, 20.0]);
    }

    #[test]
    fn test_missing_geometry_is_malformed() {
        let fc = collection(
            r#"{
              "type": "FeatureCollection",
              "features": [
                {"type": "Feature", "properties": {"time": "600"}, "geometry": null}
              ]
            }"#,
        );
        let result =
            RawCumulativeSequence::try_from_feature_collection(source(), &fc, "time", TimeUnit::Seconds);
        assert!(matches!(
            result,
            Err(HeatmapError::MalformedIsochrone { .. })
        ));
    }

    #[test]
    fn test_non_numeric_time_is_malformed() {
        let fc = collection(
            r#"{
              "type": "FeatureCollection",
              "features": [
                {"type": "Feature", "properties": {"time": "ten minutes"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[2,0],[2,2],[0,2],[0,0]]]}}
              ]
            }"#,
        );
        let result =
            RawCumulativeSequence::try_from_feature_collection(source(), &fc, "time", TimeUnit::Minutes);
        match result {
            Err(HeatmapError::MalformedIsochrone { source_id, message }) => {
                assert_eq!(source_id, source());
                assert!(message.contains("non-numeric"));
            }
            other => panic!("expected malformed isochrone error, found {other:?}"),
        }
    }

    #[test]
    fn test_point_geometry_is_malformed() {
        let fc = collection(
            r#"{
              "type": "FeatureCollection",
              "features": [
                {"type": "Feature", "properties": {"time": 60},
                 "geometry": {"type": "Point", "coordinates": [24.9, 60.1]}}
              ]
            }"#,
        );
        let result =
            RawCumulativeSequence::try_from_feature_collection(source(), &fc, "time", TimeUnit::Seconds);
        assert!(matches!(
            result,
            Err(HeatmapError::MalformedIsochrone { .. })
        ));
    }

    #[test]
    fn test_empty_collection_is_malformed() {
        let fc = collection(r#"{"type": "FeatureCollection", "features": []}"#);
        let result =
            RawCumulativeSequence::try_from_feature_collection(source(), &fc, "time", TimeUnit::Seconds);
        assert!(result.is_err());
    }
}
