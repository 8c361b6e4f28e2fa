use super::{Point, Region};

/// Reason why an image couldn't be turned into a quadtree.
///
/// Any of these aborts the whole build; no partial tree is kept.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
	/// The source image could not be read or decoded.
	#[error("could not load source image: {0}")]
	Decode(#[from] image::ImageError),
	/// The source image has no pixels.
	#[error("source image is empty")]
	EmptyImage,
	/// A node asked for pixels outside of the source image.
	#[error("region {region:?} lies outside the {width}x{height} source image")]
	RegionOutOfBounds {
		region: Region,
		width: u32,
		height: u32,
	},
}

/// Leaves were requested at a depth the tree never reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("depth {requested} is deeper than the tree ({max})")]
pub struct DepthError {
	pub requested: u32,
	pub max: u32,
}

/// Reason why a point or region query couldn't be answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
	/// The point does not lie within the image.
	#[error("point {point:?} lies outside the {width}x{height} image")]
	PointOutOfBounds {
		point: Point,
		width: u32,
		height: u32,
	},
}

/// A region one pixel wide or tall (or less) has no quadrants.
///
/// Never leaves the builder: such nodes become leaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("region {0:?} is too small to split")]
pub struct DegenerateRegion(pub Region);

/// Reason why a rendered image or animation couldn't be written.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
	#[error("could not encode image: {0}")]
	Encode(#[from] image::ImageError),
	#[error("file I/O failed: {0}")]
	Io(#[from] std::io::Error),
}
