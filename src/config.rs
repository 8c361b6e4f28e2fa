/// Depth past which no node is split.
pub const DEFAULT_MAX_DEPTH: u32 = 8;

/// Error at or below which a node is considered flat enough to stop.
pub const DEFAULT_ERROR_THRESHOLD: f64 = 13.;

/// Nodes shallower than this build their children on separate rayon tasks.
pub const DEFAULT_PARALLEL_DEPTH: u32 = 4;

/// Parameters of a quadtree build.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildConfig {
	pub max_depth: u32,
	pub error_threshold: f64,
	/// Fork-join cutoff; deeper subtrees are built synchronously by
	/// whichever worker reached them. 0 builds everything on one thread.
	pub parallel_depth: u32,
}

impl Default for BuildConfig {
	fn default() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
			error_threshold: DEFAULT_ERROR_THRESHOLD,
			parallel_depth: DEFAULT_PARALLEL_DEPTH,
		}
	}
}

impl BuildConfig {
	pub fn with_max_depth(mut self, max_depth: u32) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn with_error_threshold(mut self, error_threshold: f64) -> Self {
		self.error_threshold = error_threshold;
		self
	}

	pub fn with_parallel_depth(mut self, parallel_depth: u32) -> Self {
		self.parallel_depth = parallel_depth;
		self
	}

	/// Whether a node at `depth` with `error` should stop subdividing.
	pub fn should_stop(&self, depth: u32, error: f64) -> bool {
		depth >= self.max_depth || error <= self.error_threshold
	}
}
