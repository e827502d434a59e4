//! Coordinate reference system registry and transformations.
//!
//! Implements the handful of map projections the basemap client needs from
//! scratch: geographic lon/lat, spherical Web Mercator and ellipsoidal
//! Lambert Conformal Conic. Anything else can still be registered by unit
//! system so identifiers compare correctly, but cannot be transformed.

pub mod definition;
pub mod ellipsoid;
pub mod error;
pub mod lambert;
pub mod mercator;
pub mod registry;

pub use definition::Projection;
pub use ellipsoid::Ellipsoid;
pub use error::ProjectionError;
pub use lambert::{LambertConformal, LambertParams};
pub use registry::{CrsRegistry, Registration};
