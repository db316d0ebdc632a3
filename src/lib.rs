//! gapfind locates the gap of a horizontal slide-puzzle challenge.
//!
//! Given the encoded scene (background with a gap) and the encoded puzzle
//! piece, the crate returns the horizontal pixel offset at which the piece
//! belongs. Two independent strategies are available:
//!
//! - [`Strategy::Correlation`] trims the piece to its foreground and finds the
//!   best zero-mean normalized cross-correlation placement in the scene.
//! - [`Strategy::Shape`] traces the piece silhouette, extracts Canny edge
//!   contours from the scene and picks the contour with the closest Hu moment
//!   invariants, corrected by a configurable calibration constant.
//!
//! ```no_run
//! use gapfind::{GapConfig, GapFinder, Strategy};
//!
//! # fn run(scene: &[u8], piece: &[u8]) -> gapfind::GapResult<()> {
//! let finder = GapFinder::new(GapConfig {
//!     strategy: Strategy::Shape,
//!     ..GapConfig::default()
//! });
//! let found = finder.locate(scene, piece)?;
//! println!("drag by {} px", found.offset());
//! # Ok(())
//! # }
//! ```
//!
//! Every call is synchronous and self-contained. The `rayon` feature enables
//! a row-parallel correlation scan with the same deterministic result, and
//! the `tracing` feature instruments the pipeline stages.

mod candidate;
pub mod geometry;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod search;
pub mod shape;
pub mod template;
mod trace;
pub mod trim;
pub mod util;

pub use candidate::argmax::Peak;
pub use geometry::{Point, Rect};
pub use crate::image::decode::{decode, decode_base64};
pub use crate::image::gray::{alpha_plane, to_gray};
pub use crate::image::{ChannelLayout, ImageView, OwnedImage, RasterImage};
pub use search::{
    locate_gap, match_correlation, CorrelationConfig, CorrelationMatch, GapConfig, GapFinder,
    GapMatch, MatchCandidate, Strategy, DEFAULT_CALIBRATION,
};
pub use shape::{match_shape, ShapeConfig, ShapeMatch, ShapeMetric};
pub use template::{Template, TemplatePlan};
pub use trim::{trim_border, ForegroundMask, TrimmedPiece};
pub use util::{GapError, GapResult};
