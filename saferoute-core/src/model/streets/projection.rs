//! Local planar projection used for proximity queries
//!
//! Street networks covered here span a few tens of kilometers at most, so an
//! equirectangular plane tangent at the network center keeps distance error
//! well below the proximity radius.

use std::f64::consts::PI;

use geo::{Coord, LineString, Point};

/// Mean earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Length of one degree of latitude in meters
pub const METERS_PER_DEGREE: f64 = EARTH_RADIUS_M * PI / 180.0;

/// Above this latitude the tangent plane distorts too much to be useful
const MAX_PROJECTABLE_LAT: f64 = 85.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Meters east/north of `(lon0, lat0)`
    LocalPlane { lon0: f64, lat0: f64, cos_lat0: f64 },
    /// No usable projection: coordinates stay in degrees
    Unprojected,
}

impl Projection {
    /// Projection tangent at the mean of `points` (lon/lat)
    ///
    /// Falls back to [`Projection::Unprojected`] when there is no finite
    /// center or the center is too close to a pole.
    pub fn centered_on<'a>(points: impl IntoIterator<Item = &'a Point<f64>>) -> Self {
        let (count, sum_lon, sum_lat) = points
            .into_iter()
            .filter(|p| p.x().is_finite() && p.y().is_finite())
            .fold((0usize, 0.0, 0.0), |(n, x, y), p| (n + 1, x + p.x(), y + p.y()));

        if count == 0 {
            return Projection::Unprojected;
        }

        #[allow(clippy::cast_precision_loss)]
        let (lon0, lat0) = (sum_lon / count as f64, sum_lat / count as f64);
        if !lat0.is_finite() || !lon0.is_finite() || lat0.abs() >= MAX_PROJECTABLE_LAT {
            return Projection::Unprojected;
        }

        Projection::LocalPlane {
            lon0,
            lat0,
            cos_lat0: lat0.to_radians().cos(),
        }
    }

    pub fn is_projected(&self) -> bool {
        matches!(self, Projection::LocalPlane { .. })
    }

    pub fn project(&self, lon: f64, lat: f64) -> Coord<f64> {
        match *self {
            Projection::LocalPlane {
                lon0,
                lat0,
                cos_lat0,
            } => Coord {
                x: (lon - lon0) * METERS_PER_DEGREE * cos_lat0,
                y: (lat - lat0) * METERS_PER_DEGREE,
            },
            Projection::Unprojected => Coord { x: lon, y: lat },
        }
    }

    pub fn project_line(&self, line: &LineString<f64>) -> LineString<f64> {
        line.coords().map(|c| self.project(c.x, c.y)).collect()
    }

    /// Expresses a distance in meters in the units of this projection
    pub fn distance_units(&self, meters: f64) -> f64 {
        match self {
            Projection::LocalPlane { .. } => meters,
            Projection::Unprojected => meters / METERS_PER_DEGREE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_center_maps_to_origin() {
        let points = [Point::new(-82.47, 35.35), Point::new(-82.45, 35.37)];
        let projection = Projection::centered_on(&points);
        assert!(projection.is_projected());

        let center = projection.project(-82.46, 35.36);
        assert!(center.x.abs() < 1e-6);
        assert!(center.y.abs() < 1e-6);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let projection = Projection::centered_on(&[Point::new(0.0, 0.0)]);
        let north = projection.project(0.0, 1.0);
        assert!((north.y - 111_195.0).abs() < 10.0);
    }

    #[test]
    fn empty_or_polar_input_is_unprojected() {
        assert_eq!(Projection::centered_on(&[]), Projection::Unprojected);
        assert_eq!(
            Projection::centered_on(&[Point::new(10.0, 89.0)]),
            Projection::Unprojected
        );
        let radius = Projection::Unprojected.distance_units(15.0);
        assert!((radius - 15.0 / METERS_PER_DEGREE).abs() < 1e-15);
    }
}
