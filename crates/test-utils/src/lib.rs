//! Shared test utilities for the basemap workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Canned map service and feature service documents
//! - A recording, replaying HTTP transport
//! - Floating-point assertion macros
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, MockTransport};
//! ```

pub mod fixtures;
pub mod mock;

pub use mock::MockTransport;

/// Assert two numbers differ by at most `epsilon`.
///
/// All three arguments are widened to `f64`, so integer and `f32` values
/// can be compared directly against projected coordinates.
///
/// ```ignore
/// assert_approx_eq!(point.x, 236337.4, 1.0);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $epsilon:expr) => {{
        let actual = $actual as f64;
        let expected = $expected as f64;
        let epsilon = $epsilon as f64;
        let delta = (actual - expected).abs();
        assert!(
            delta <= epsilon,
            "assertion failed: {} is not within {} of {} (off by {})",
            actual,
            epsilon,
            expected,
            delta
        );
    }};
}

/// Assert two `(x, y)` pairs agree per axis within `epsilon`.
///
/// ```ignore
/// assert_coords_approx_eq!((p.x, p.y), (200000.0, 750000.0), 1e-6);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($ax:expr, $ay:expr), ($ex:expr, $ey:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($ax, $ex, $epsilon);
        $crate::assert_approx_eq!($ay, $ey, $epsilon);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use map_common::{HttpRequest, HttpTransport};

    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_fixtures_are_valid_json() {
        for doc in [
            fixtures::capabilities::WEB_MERCATOR,
            fixtures::capabilities::GEOGRAPHIC,
            fixtures::features::ARLINGTON_GEOJSON,
            fixtures::features::ARLINGTON_ESRI_JSON,
            fixtures::features::TAZ_LAYER_INFO,
        ] {
            serde_json::from_str::<serde_json::Value>(doc).unwrap();
        }
    }

    #[tokio::test]
    async fn test_mock_transport_replays_in_order() {
        let transport = MockTransport::new().respond_ok("first").respond(500, "second");

        let a = transport.send(&HttpRequest::get("https://a")).await.unwrap();
        let b = transport.send(&HttpRequest::get("https://b")).await.unwrap();
        let c = transport.send(&HttpRequest::get("https://c")).await;

        assert_eq!(&a.body[..], b"first");
        assert_eq!(b.status, 500);
        assert!(c.is_err());
        assert_eq!(transport.request_count(), 3);
        assert_eq!(transport.last_request().unwrap().url, "https://c");
    }
}
