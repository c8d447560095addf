//! Globe geometry and view state
//!
//! Pure projection math lives in `projection` and `curves`; `GlobeView`
//! ties rotation, accumulator lines and markers into one redrawable model.

pub mod curves;
pub mod lookup;
pub mod outlines;
pub mod projection;
pub mod rotation;
pub mod view;

pub use lookup::{CatalogLookup, LookupError, Place, PlaceLookup};
pub use outlines::{CountryOutlines, OutlineError};
pub use projection::{ProjectedPoint, RotationState, Viewport, project, project_in};
pub use rotation::RotationController;
pub use view::GlobeView;
