use geo::{Area, MultiPolygon};

/// a region of the plane paired with the travel time (in minutes) needed to reach it.
///
/// the divider counts how many source isochrones contributed to `time`, so that a band
/// can be averaged with another band as a running weighted mean.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeBand {
    pub geometry: MultiPolygon<f64>,
    pub time: f64,
    pub divider: u64,
}

impl TimeBand {
    /// a band fresh from ring differencing, weighted as a single source.
    pub fn new(geometry: MultiPolygon<f64>, time: f64) -> TimeBand {
        TimeBand {
            geometry,
            time,
            divider: 1,
        }
    }

    /// creates the band covering the overlap of two bands, with a time that is the
    /// weighted average of both band times.
    ///
    /// # Arguments
    ///
    /// * `geometry` - intersection of the two band geometries
    /// * `a` - band from the first isochrone
    /// * `b` - band from the second isochrone
    pub fn averaged(geometry: MultiPolygon<f64>, a: &TimeBand, b: &TimeBand) -> TimeBand {
        let divider = a.divider + b.divider;
        let weighted = a.time * a.divider as f64 + b.time * b.divider as f64;
        TimeBand {
            geometry,
            time: weighted / divider as f64,
            divider,
        }
    }

    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }
}

#[cfg(test)]
mod tests {
    use super::TimeBand;
    use approx::assert_relative_eq;
    use geo::{polygon, MultiPolygon};

    fn unit_square() -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ]])
    }

    #[test]
    fn test_averaged_uses_dividers_as_weights() {
        let a = TimeBand {
            geometry: unit_square(),
            time: 10.0,
            divider: 3,
        };
        let b = TimeBand::new(unit_square(), 30.0);
        let merged = TimeBand::averaged(unit_square(), &a, &b);
        assert_eq!(merged.divider, 4);
        assert_relative_eq!(merged.time, 15.0);
    }

    #[test]
    fn test_area() {
        let band = TimeBand::new(unit_square(), 5.0);
        assert_relative_eq!(band.area(), 1.0);
    }
}
