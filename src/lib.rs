//! Error-driven quadtree decomposition of raster images.
//!
//! An image is split into quadrants, recursively, until each region's
//! color is flat enough (its luma-weighted standard deviation drops to a
//! threshold), the region is too small, or a maximum depth is reached.
//! Every node keeps its region's average color, so the picture can be
//! rebuilt at any depth, from one flat rectangle up to full detail.
//!
//! ```no_run
//! use quadtree_compress::{BuildConfig, GifSink, QuadTree};
//!
//! let tree = QuadTree::open("photo.png", BuildConfig::default())?;
//! let mut gif = GifSink::new("photo.gif");
//! for depth in 0..=tree.max_depth() {
//!     gif.append_frame(tree.to_image(depth, true)?);
//! }
//! gif.flush()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod gif;
pub mod node;
pub mod tree;

pub use config::BuildConfig;
pub use gif::GifSink;
pub use node::error;
pub use node::{NodeId, NodeState, Point, Quadrant, QuadtreeNode, Region};
pub use tree::{LeafView, QuadTree};
