use super::error::BuildError;
use super::stats::{Color, Histogram};
use super::Region;

/// Read-only access to the pixels a quadtree is built from.
///
/// Shared by every worker during a build, hence `Sync`.
pub trait PixelSource: Sync {
	/// Width and height in pixels.
	fn dimensions(&self) -> (u32, u32);
	/// Counts the red, green and blue intensities inside `region`.
	///
	/// Must fail if `region` reaches outside of the source.
	fn histogram(&self, region: Region) -> Result<Histogram, BuildError>;
}

fn check_bounds(region: Region, (width, height): (u32, u32)) -> Result<(), BuildError> {
	if region.left > region.right || region.top > region.bottom ||
		region.right > width || region.bottom > height {
		return Err(BuildError::RegionOutOfBounds { region, width, height });
	}
	Ok(())
}

impl PixelSource for image::RgbImage {
	fn dimensions(&self) -> (u32, u32) {
		(self.width(), self.height())
	}

	fn histogram(&self, region: Region) -> Result<Histogram, BuildError> {
		check_bounds(region, (self.width(), self.height()))?;
		let mut hist = [0; 768];
		for y in region.top..region.bottom {
			for x in region.left..region.right {
				let image::Rgb([r, g, b]) = *self.get_pixel(x, y);
				hist[r as usize] += 1;
				hist[256 + g as usize] += 1;
				hist[512 + b as usize] += 1;
			}
		}
		Ok(hist)
	}
}

/// Fills `region` of `img` with a solid color.
///
/// The region is clipped to the image.
pub fn fill_region(img: &mut image::RgbImage, region: Region, color: Color) {
	let right = region.right.min(img.width());
	let bottom = region.bottom.min(img.height());
	if region.left >= right || region.top >= bottom {
		return;
	}
	image::imageops::replace(
		img,
		&image::RgbImage::from_pixel(right - region.left, bottom - region.top, color),
		i64::from(region.left),
		i64::from(region.top),
	);
}

/// Draws a one pixel wide outline along the inside edge of `region`.
pub fn outline_region(img: &mut image::RgbImage, region: Region, color: Color) {
	let right = region.right.min(img.width());
	let bottom = region.bottom.min(img.height());
	if region.left >= right || region.top >= bottom {
		return;
	}
	for x in region.left..right {
		img.put_pixel(x, region.top, color);
		img.put_pixel(x, bottom - 1, color);
	}
	for y in region.top..bottom {
		img.put_pixel(region.left, y, color);
		img.put_pixel(right - 1, y, color);
	}
}
