//! Lambert Conformal Conic projection (ellipsoidal, two standard parallels).
//!
//! Used by many US State Plane zones, including NAD83 / Massachusetts
//! Mainland (EPSG:26986), the native CRS of the state's feature services.
//!
//! The projection parameters include:
//! - Latitude of false origin (lat0) and central meridian (lon0)
//! - Standard parallels lat1 and lat2 (equal for a tangent cone)
//! - False easting / northing in meters
//! - The ellipsoid the coordinates are referenced to
//!
//! Formulas follow Snyder, "Map Projections: A Working Manual", ch. 15.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use map_common::Point;

use crate::ellipsoid::Ellipsoid;

/// Defining parameters, in degrees and meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertParams {
    pub lat0: f64,
    pub lon0: f64,
    pub lat1: f64,
    pub lat2: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    pub ellipsoid: Ellipsoid,
}

/// Lambert Conformal Conic projection with precomputed cone constants.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    params: LambertParams,
    /// First eccentricity
    e: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the false origin latitude
    rho0: f64,
}

impl PartialEq for LambertConformal {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params
    }
}

impl LambertConformal {
    pub fn new(params: LambertParams) -> Self {
        let a = params.ellipsoid.semi_major_axis;
        let e = params.ellipsoid.eccentricity();

        let phi0 = params.lat0.to_radians();
        let phi1 = params.lat1.to_radians();
        let phi2 = params.lat2.to_radians();

        let m1 = m(phi1, e);
        let t0 = t(phi0, e);
        let t1 = t(phi1, e);

        let n = if (phi1 - phi2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            phi1.sin()
        } else {
            let m2 = m(phi2, e);
            let t2 = t(phi2, e);
            (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
        };

        let f = m1 / (n * t1.powf(n));
        let rho0 = a * f * t0.powf(n);

        Self {
            params,
            e,
            n,
            f,
            rho0,
        }
    }

    /// NAD83 / Massachusetts Mainland (EPSG:26986).
    pub fn massachusetts_mainland() -> Self {
        Self::new(LambertParams {
            lat0: 41.0,
            lon0: -71.5,
            lat1: 42.0 + 41.0 / 60.0,
            lat2: 41.0 + 43.0 / 60.0,
            false_easting: 200_000.0,
            false_northing: 750_000.0,
            ellipsoid: Ellipsoid::GRS80,
        })
    }

    pub fn params(&self) -> &LambertParams {
        &self.params
    }

    /// Geographic (lon/lat degrees) to projected easting/northing.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> Point {
        let a = self.params.ellipsoid.semi_major_axis;
        let phi = lat_deg.to_radians();

        // Normalize longitude difference to [-π, π]
        let mut dlon = (lon_deg - self.params.lon0).to_radians();
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let rho = a * self.f * t(phi, self.e).powf(self.n);
        let theta = self.n * dlon;

        Point::new(
            self.params.false_easting + rho * theta.sin(),
            self.params.false_northing + self.rho0 - rho * theta.cos(),
        )
    }

    /// Projected easting/northing to geographic (lon/lat degrees).
    pub fn inverse(&self, x: f64, y: f64) -> Point {
        let a = self.params.ellipsoid.semi_major_axis;
        let sign = self.n.signum();

        let dx = x - self.params.false_easting;
        let dy = self.rho0 - (y - self.params.false_northing);

        let rho = sign * (dx * dx + dy * dy).sqrt();
        if rho == 0.0 {
            return Point::new(self.params.lon0, sign * 90.0);
        }

        let theta = (sign * dx).atan2(sign * dy);
        let t_prime = (rho / (a * self.f)).powf(1.0 / self.n);

        // Latitude by fixed-point iteration; converges in a handful of steps.
        let half_e = self.e / 2.0;
        let mut phi = FRAC_PI_2 - 2.0 * t_prime.atan();
        for _ in 0..15 {
            let es = self.e * phi.sin();
            let next = FRAC_PI_2 - 2.0 * (t_prime * ((1.0 - es) / (1.0 + es)).powf(half_e)).atan();
            let done = (next - phi).abs() < 1e-12;
            phi = next;
            if done {
                break;
            }
        }

        let lon = theta / self.n + self.params.lon0.to_radians();
        Point::new(lon.to_degrees(), phi.to_degrees())
    }
}

fn m(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    phi.cos() / (1.0 - es * es).sqrt()
}

fn t(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
}
