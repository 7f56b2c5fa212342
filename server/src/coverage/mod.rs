//! Coverage engine.
//! Loads coverage polygons and works out which ones are near the user.

#[macro_use]
pub mod macros;

/// Value types shared by the engine.
pub mod coverage_types {
    pub mod feature;
    pub mod point;
}

/// Algorithms operating on [`coverage_types`].
pub mod coverage_utils {
    pub mod haversine;
    pub mod loader;
    pub mod proximity;
    pub mod reconciler;
    pub mod view_model;
}

pub use coverage_types::*;
pub use coverage_utils::*;
