/// Per-channel intensity counts: 256 bins of red, then green, then blue.
pub type Histogram = [u64; 768];

pub type Color = image::Rgb<u8>;

/// Luma weights for red, green and blue, in that order.
pub const LUMA_WEIGHTS: [f64; 3] = [0.2989, 0.5870, 0.1140];

/// Summary of a region's pixels: the average color and how far the
/// pixels stray from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStatistic {
	pub color: Color,
	/// Luma-weighted sum of the per-channel standard deviations.
	pub error: f64,
}

/// Count-weighted mean and population standard deviation of the
/// intensity index over one channel's bins.
///
/// An empty channel (no counts at all) yields `(0, 0)`.
pub fn weighted_average(channel: &[u64]) -> (f64, f64) {
	let total: u64 = channel.iter().sum();
	if total == 0 {
		return (0., 0.);
	}
	let total = total as f64;
	let value = channel.iter()
		.enumerate()
		.map(|(i, &n)| i as u64 * n)
		.sum::<u64>() as f64 / total;
	let variance = channel.iter()
		.enumerate()
		.map(|(i, &n)| n as f64 * (i as f64 - value).powi(2))
		.sum::<f64>() / total;
	(value, variance.sqrt())
}

/// Derives the average color and the error score from a full histogram.
///
/// Channel means are truncated, not rounded.
pub fn color_from_histogram(hist: &Histogram) -> ColorStatistic {
	let (red, red_error) = weighted_average(&hist[..256]);
	let (green, green_error) = weighted_average(&hist[256..512]);
	let (blue, blue_error) = weighted_average(&hist[512..]);
	let error = red_error * LUMA_WEIGHTS[0] +
		green_error * LUMA_WEIGHTS[1] +
		blue_error * LUMA_WEIGHTS[2];
	ColorStatistic {
		color: image::Rgb([red as u8, green as u8, blue as u8]),
		error,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_weighted_average_empty_channel() {
		assert_eq!(weighted_average(&[0; 256]), (0., 0.));
	}

	#[test]
	fn test_weighted_average_single_intensity() {
		let mut channel = [0; 256];
		channel[200] = 17;
		assert_eq!(weighted_average(&channel), (200., 0.));
	}

	#[test]
	fn test_weighted_average_two_intensities() {
		let mut channel = [0; 256];
		channel[0] = 1;
		channel[100] = 1;
		let (mean, stddev) = weighted_average(&channel);
		assert!((mean - 50.).abs() < 1e-9);
		assert!((stddev - 50.).abs() < 1e-9);
	}

	#[test]
	fn test_weighted_average_counts_past_u32() {
		let mut channel = [0; 256];
		channel[3] = 5_000_000_000;
		channel[5] = 5_000_000_000;
		let (mean, stddev) = weighted_average(&channel);
		assert!((mean - 4.).abs() < 1e-9);
		assert!((stddev - 1.).abs() < 1e-9);
	}

	#[test]
	fn test_color_truncates_means() {
		let mut hist = [0; 768];
		// Red: mean 0.5, green: mean 254.5, blue: mean 7
		hist[0] = 1;
		hist[1] = 1;
		hist[256 + 254] = 1;
		hist[256 + 255] = 1;
		hist[512 + 7] = 2;
		let stat = color_from_histogram(&hist);
		assert_eq!(stat.color, image::Rgb([0, 254, 7]));
		let expected = 0.5 * LUMA_WEIGHTS[0] + 0.5 * LUMA_WEIGHTS[1];
		assert!((stat.error - expected).abs() < 1e-9);
	}

	#[test]
	fn test_error_uses_luma_weights() {
		let mut hist = [0; 768];
		for base in [0, 256, 512] {
			hist[base] = 1;
			hist[base + 20] = 1;
		}
		// Every channel has a standard deviation of 10.
		let stat = color_from_histogram(&hist);
		assert_eq!(stat.color, image::Rgb([10, 10, 10]));
		assert!((stat.error - 10. * (0.2989 + 0.5870 + 0.1140)).abs() < 1e-9);
	}

	#[test]
	fn test_empty_histogram_is_black_and_flat() {
		let stat = color_from_histogram(&[0; 768]);
		assert_eq!(stat.color, image::Rgb([0, 0, 0]));
		assert_eq!(stat.error, 0.);
	}
}
