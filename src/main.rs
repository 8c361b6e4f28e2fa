use image::error::ImageError;
use tracing::{error, info, warn};

use quadtree_compress::config::{DEFAULT_ERROR_THRESHOLD, DEFAULT_MAX_DEPTH};
use quadtree_compress::error::{BuildError, OutputError};
use quadtree_compress::{BuildConfig, GifSink, QuadTree};

use std::path::{Path, PathBuf};

/// Directory animations are written into.
const GIF_DIR: &str = "gifs";

/// Default output path: `<stem>_compressed.png` next to the input.
fn compressed_path(input: &Path) -> PathBuf {
	let stem = input.file_stem()
		.map(|s| s.to_string_lossy().into_owned())
		.unwrap_or_else(|| "image".to_string());
	input.with_file_name(format!("{}_compressed.png", stem))
}

/// Whether `level` is a depth a tree built with `config` could reach.
fn level_in_range(level: u32, config: &BuildConfig) -> bool {
	level <= config.max_depth
}

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	error!("{}", msg);
	std::process::exit(code)
}

fn image_error_exit(e: &ImageError) -> ! {
	let (msg, code) = match e {
		ImageError::Decoding(_) | ImageError::Unsupported(_) => ("Invalid image data", 4),
		ImageError::Limits(_) => ("Computation limits exceeded", 5),
		ImageError::IoError(_) => ("File not found or could not be read", 3),
		_ => ("An error occurred", 10)
	};
	error_exit(msg, code)
}

fn output_error_exit(e: OutputError) -> ! {
	match e {
		OutputError::Encode(ref e) => image_error_exit(e),
		OutputError::Io(_) => error_exit("Could not write output file", 3),
	}
}

/// `clap`-based CLI for compressing an image through a quadtree.
///
/// May exit process with status code if there are errors:
///
/// 1: `clap` error
///
/// 2: invalid arguments
///
/// 3: file I/O issues
///
/// 4: invalid image data
///
/// 5: computation limits exceeded
///
/// 10: other, potentially unknown error
fn main() {
	tracing_subscriber::fmt().with_writer(std::io::stderr).init();

	let clap_matches = clap::App::new("quadtree_compress")
		.version("0.1.0")
		.author("vkcz")
		.about("Approximates an image with flat-colored quadtree regions.")
		.arg_from_usage("-c, --compress=<LEVEL> 'Depth of the quadtree to render, from 0 to the max depth'")
		.arg_from_usage("-s, --show 'Outline each region in black'")
		.arg_from_usage("-g, --gif 'Also save an animation going through every depth'")
		.arg_from_usage("-e, --error=[N] 'Error at or below which a region stops splitting; defaults to 13'")
		.arg_from_usage("-m, --max-depth=[N] 'Depth past which regions never split; defaults to 8'")
		.arg_from_usage("<INPUT> 'Path to input image'")
		.arg_from_usage("[OUTPUT] 'Path to output PNG; defaults to INPUT_compressed.png'")
		.get_matches();

	let input_path = clap_matches.value_of("INPUT").unwrap_or_default();
	if !Path::new(input_path).exists() {
		error_exit("File not found or could not be read", 3);
	}
	let level = match clap_matches.value_of("compress").unwrap_or_default().parse::<u32>() {
		Ok(n) => n,
		Err(_) => error_exit("Non-numeric value for compression level", 2)
	};
	let config = BuildConfig::default()
		.with_error_threshold(match clap_matches.value_of("error").map(str::parse::<f64>) {
			None => DEFAULT_ERROR_THRESHOLD,
			Some(Ok(n)) if n >= 0. => n,
			Some(_) => error_exit("Invalid value for error threshold", 2)
		})
		.with_max_depth(match clap_matches.value_of("max-depth").map(str::parse::<u32>) {
			None => DEFAULT_MAX_DEPTH,
			Some(Ok(n)) => n,
			Some(Err(_)) => error_exit("Non-numeric value for max depth", 2)
		});
	if !level_in_range(level, &config) {
		error_exit(&format!("Compression level must be between 0 and {}", config.max_depth), 2);
	}
	let outline = clap_matches.is_present("show");

	info!("compressing {} at level {}", input_path, level);
	let tree = match QuadTree::open(input_path, config) {
		Ok(t) => t,
		Err(BuildError::Decode(e)) => image_error_exit(&e),
		Err(BuildError::EmptyImage) => error_exit("Input image has no pixels", 4),
		Err(e) => error_exit(&e.to_string(), 10)
	};
	let level = if level > tree.max_depth() {
		warn!("tree is only {} levels deep, rendering that instead of {}", tree.max_depth(), level);
		tree.max_depth()
	} else {
		level
	};

	let output_path = clap_matches.value_of("OUTPUT")
		.map(PathBuf::from)
		.unwrap_or_else(|| compressed_path(Path::new(input_path)));
	// `level` was clamped to the tree's depth above, so rendering can't fail.
	let result = match tree.to_image(level, outline) {
		Ok(img) => img,
		Err(e) => error_exit(&e.to_string(), 10)
	};
	match result.save(&output_path) {
		Ok(_) => info!("compressed image saved to {}", output_path.display()),
		Err(e) => image_error_exit(&e)
	}

	if clap_matches.is_present("gif") {
		let mut gif = match GifSink::in_directory(GIF_DIR) {
			Ok(g) => g,
			Err(e) => output_error_exit(e)
		};
		for depth in 0..=tree.max_depth() {
			match tree.to_image(depth, outline) {
				Ok(frame) => gif.append_frame(frame),
				Err(e) => error_exit(&e.to_string(), 10)
			}
		}
		if let Err(e) = gif.flush() {
			output_error_exit(e)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_compressed_path_keeps_directory() {
		assert_eq!(compressed_path(Path::new("../shots/photo")), Path::new("../shots/photo_compressed.png"));
		assert_eq!(compressed_path(Path::new("my.dir/photo")), Path::new("my.dir/photo_compressed.png"));
		assert_eq!(compressed_path(Path::new("a/b.png")), Path::new("a/b_compressed.png"));
		assert_eq!(compressed_path(Path::new("./photo")), Path::new("./photo_compressed.png"));
		assert_eq!(compressed_path(Path::new("photo.tar.gz")), Path::new("photo.tar_compressed.png"));
	}

	#[test]
	fn test_level_follows_max_depth() {
		assert!(level_in_range(8, &BuildConfig::default()));
		assert!(!level_in_range(9, &BuildConfig::default()));
		assert!(level_in_range(10, &BuildConfig::default().with_max_depth(12)));
		assert!(!level_in_range(3, &BuildConfig::default().with_max_depth(2)));
	}
}
