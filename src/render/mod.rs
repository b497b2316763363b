//! Panelized heatmap rendering.
//!
//! A network × year matrix is split along the network axis into contiguous
//! panels drawn side by side with one shared colour legend.

pub mod colors;
pub mod heatmap;
pub mod partition;

pub use colors::{ColorScale, default_ticks};
pub use heatmap::{Figure, HeatmapSpec, RenderConfig, render_heatmap};
pub use partition::partition;
