use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use tracing::info;

use crate::node::error::OutputError;

/// How long each frame stays on screen.
pub const FRAME_DELAY_MS: u32 = 800;

/// First `<dir>/quadtree<N>.gif`, counting from 1, that doesn't exist yet.
fn next_free_path(dir: &Path) -> PathBuf {
	(1..)
		.map(|n| dir.join(format!("quadtree{}.gif", n)))
		.find(|p| !p.exists())
		.unwrap_or_else(|| dir.join("quadtree.gif"))
}

/// Collects frames and writes them out as one looping animation.
pub struct GifSink {
	frames: Vec<Frame>,
	path: PathBuf,
	/// Set when output names are picked automatically inside a directory.
	dir: Option<PathBuf>,
}

impl GifSink {
	/// A sink writing to exactly `path`.
	pub fn new<P: Into<PathBuf>>(path: P) -> Self {
		Self {
			frames: Vec::new(),
			path: path.into(),
			dir: None,
		}
	}

	/// A sink writing numbered animations into `dir`, which is created if
	/// missing. Each flush moves on to the next free number.
	pub fn in_directory<P: Into<PathBuf>>(dir: P) -> Result<Self, OutputError> {
		let dir = dir.into();
		fs::create_dir_all(&dir)?;
		Ok(Self {
			frames: Vec::new(),
			path: next_free_path(&dir),
			dir: Some(dir),
		})
	}

	/// Where the next flush will write.
	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn len(&self) -> usize {
		self.frames.len()
	}

	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	pub fn append_frame(&mut self, frame: image::RgbImage) {
		let rgba = image::DynamicImage::ImageRgb8(frame).into_rgba8();
		self.frames.push(Frame::from_parts(
			rgba,
			0,
			0,
			Delay::from_numer_denom_ms(FRAME_DELAY_MS, 1),
		));
	}

	/// Encodes all collected frames, then starts over with none.
	///
	/// Returns `false` without touching the file system if there were no
	/// frames to write.
	pub fn flush(&mut self) -> Result<bool, OutputError> {
		if self.frames.is_empty() {
			info!("no frames collected, skipping animation");
			return Ok(false);
		}
		{
			let mut encoder = GifEncoder::new(BufWriter::new(File::create(&self.path)?));
			encoder.set_repeat(Repeat::Infinite)?;
			encoder.encode_frames(self.frames.drain(..))?;
		}
		info!(path = %self.path.display(), "animation saved");
		if let Some(dir) = &self.dir {
			self.path = next_free_path(dir);
		}
		Ok(true)
	}
}
