//! Low-level building blocks for custom pipelines.
//!
//! Most users should prefer [`GapFinder`](crate::GapFinder); these items expose
//! the individual stages for tests, benchmarks and experiments.

pub use crate::candidate::argmax::{ArgMax, Peak};
pub use crate::kernel::scalar::ZnccScalar;
pub use crate::kernel::{Kernel, ScanParams, WindowSums};
pub use crate::shape::contour::{piece_contour, trace_outer_contours, Contour};
pub use crate::shape::edges::edge_map;
pub use crate::shape::moments::{shape_distance, HuMoments, Moments};
pub use crate::template::TemplatePlan;

#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::ZnccRayon;
