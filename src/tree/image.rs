use crate::node::error::DepthError;
use crate::node::image::{fill_region, outline_region};

/// Color of leaf outlines and of any area no leaf covers.
pub const BACKGROUND: image::Rgb<u8> = image::Rgb([0, 0, 0]);

impl super::QuadTree {
	/// Paints the picture the tree gives at `depth`: every leaf region
	/// filled with its average color.
	///
	/// With `outline`, each region's edge is drawn in black so the
	/// decomposition itself is visible.
	pub fn to_image(&self, depth: u32, outline: bool) -> Result<image::RgbImage, DepthError> {
		let mut img = image::RgbImage::from_pixel(self.width(), self.height(), BACKGROUND);
		for leaf in self.leaf_views(depth)? {
			fill_region(&mut img, leaf.region, leaf.color);
			if outline {
				outline_region(&mut img, leaf.region, BACKGROUND);
			}
		}
		Ok(img)
	}
}
