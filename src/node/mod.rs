pub mod error;
pub mod image;
pub mod stats;

use self::image::PixelSource;
use stats::Color;

/// Index of a node in its tree's arena.
pub type NodeId = u32;

/// Axis-aligned rectangle in pixel coordinates.
///
/// Half-open: covers `left <= x < right` and `top <= y < bottom`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
	pub left: u32,
	pub top: u32,
	pub right: u32,
	pub bottom: u32,
}

impl Region {
	pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
		Self { left, top, right, bottom }
	}

	pub fn width(&self) -> u32 {
		self.right.saturating_sub(self.left)
	}

	pub fn height(&self) -> u32 {
		self.bottom.saturating_sub(self.top)
	}

	pub fn area(&self) -> u64 {
		self.width() as u64 * self.height() as u64
	}

	/// Floor of the center on each axis; the split line between quadrants.
	pub fn midpoint(&self) -> (u32, u32) {
		(
			self.left + (self.right - self.left) / 2,
			self.top + (self.bottom - self.top) / 2,
		)
	}

	pub fn contains_point(&self, point: Point) -> bool {
		(self.left..self.right).contains(&point.x) && (self.top..self.bottom).contains(&point.y)
	}

	/// Whether `other` is not fully disjoint from this region on both axes.
	///
	/// Edges are compared inclusively, so regions that merely share a
	/// border line count as touching.
	pub fn touches(&self, other: &Region) -> bool {
		!(other.right < self.left || other.left > self.right ||
			other.bottom < self.top || other.top > self.bottom)
	}

	/// The four quadrants around the midpoint, in `Quadrant` order.
	///
	/// They tile this region exactly. Regions one pixel wide or tall have
	/// no quadrants.
	pub fn quadrants(&self) -> Result<[Region; 4], error::DegenerateRegion> {
		if self.width() <= 1 || self.height() <= 1 {
			return Err(error::DegenerateRegion(*self));
		}
		let (mid_x, mid_y) = self.midpoint();
		Ok([
			Region::new(self.left, self.top, mid_x, mid_y),
			Region::new(mid_x, self.top, self.right, mid_y),
			Region::new(self.left, mid_y, mid_x, self.bottom),
			Region::new(mid_x, mid_y, self.right, self.bottom),
		])
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
	pub x: u32,
	pub y: u32,
}

impl Point {
	pub fn new(x: u32, y: u32) -> Self {
		Self { x, y }
	}
}

/// Position of a child relative to its parent's midpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
	TopLeft = 0,
	TopRight = 1,
	BottomLeft = 2,
	BottomRight = 3,
}

impl Quadrant {
	pub const ALL: [Quadrant; 4] = [
		Quadrant::TopLeft,
		Quadrant::TopRight,
		Quadrant::BottomLeft,
		Quadrant::BottomRight,
	];

	/// Quadrant of `region` that `point` falls into.
	pub fn of_point(region: &Region, point: Point) -> Self {
		let (mid_x, mid_y) = region.midpoint();
		match (point.x < mid_x, point.y < mid_y) {
			(true, true) => Quadrant::TopLeft,
			(false, true) => Quadrant::TopRight,
			(true, false) => Quadrant::BottomLeft,
			(false, false) => Quadrant::BottomRight,
		}
	}

	/// Quadrant of `region` that wholly holds `query`, if any.
	///
	/// A query straddling either split line resolves to no quadrant.
	pub fn of_region(region: &Region, query: &Region) -> Option<Self> {
		let (mid_x, mid_y) = region.midpoint();
		let left = if query.right < mid_x {
			true
		} else if query.left >= mid_x {
			false
		} else {
			return None;
		};
		if query.bottom < mid_y {
			Some(if left { Quadrant::TopLeft } else { Quadrant::TopRight })
		} else if query.top >= mid_y {
			Some(if left { Quadrant::BottomLeft } else { Quadrant::BottomRight })
		} else {
			None
		}
	}

	pub fn index(self) -> usize {
		self as usize
	}
}

/// What the builder decided for a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
	/// Not yet visited by the builder.
	Unresolved,
	Leaf,
	/// Children in `Quadrant` order.
	Internal([NodeId; 4]),
}

/// Node in a quadtree over an image.
///
/// Every node, leaf or not, carries the average color of its region, so
/// descent can stop at any depth and still give a meaningful picture.
#[derive(Clone, Debug)]
pub struct QuadtreeNode {
	border: Region,
	depth: u32,
	color: Color,
	error: f64,
	state: NodeState,
}

impl QuadtreeNode {
	/// Summarizes the pixels of `border` into a new, unresolved node.
	pub fn new<S: PixelSource + ?Sized>(
		source: &S,
		border: Region,
		depth: u32
	) -> Result<Self, error::BuildError> {
		let hist = source.histogram(border)?;
		let stat = stats::color_from_histogram(&hist);
		Ok(Self {
			border,
			depth,
			color: stat.color,
			error: stat.error,
			state: NodeState::Unresolved,
		})
	}

	/// Creates the four child nodes, one per quadrant, one level deeper.
	///
	/// Returns `Ok(None)` if the region is too small to split.
	pub fn split<S: PixelSource + ?Sized>(
		&self,
		source: &S
	) -> Result<Option<[QuadtreeNode; 4]>, error::BuildError> {
		let quads = match self.border.quadrants() {
			Ok(q) => q,
			Err(_) => return Ok(None),
		};
		let [tl, tr, bl, br] = quads;
		let depth = self.depth + 1;
		Ok(Some([
			QuadtreeNode::new(source, tl, depth)?,
			QuadtreeNode::new(source, tr, depth)?,
			QuadtreeNode::new(source, bl, depth)?,
			QuadtreeNode::new(source, br, depth)?,
		]))
	}

	pub fn border(&self) -> Region {
		self.border
	}

	pub fn depth(&self) -> u32 {
		self.depth
	}

	pub fn color(&self) -> Color {
		self.color
	}

	pub fn error(&self) -> f64 {
		self.error
	}

	pub fn state(&self) -> NodeState {
		self.state
	}

	pub fn is_leaf(&self) -> bool {
		self.state == NodeState::Leaf
	}

	pub fn children(&self) -> Option<&[NodeId; 4]> {
		match &self.state {
			NodeState::Internal(c) => Some(c),
			_ => None,
		}
	}

	pub(crate) fn resolve(&mut self, state: NodeState) {
		debug_assert_eq!(self.state, NodeState::Unresolved, "node resolved twice");
		self.state = state;
	}

	/// Shifts child indices when a subtree is moved within an arena.
	pub(crate) fn rebase(&mut self, offset: NodeId) {
		if let NodeState::Internal(ref mut children) = self.state {
			children.iter_mut().for_each(|c| *c += offset);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tiles_exactly(parent: &Region, parts: &[Region]) -> bool {
		let area: u64 = parts.iter().map(Region::area).sum();
		if area != parent.area() {
			return false;
		}
		(parent.top..parent.bottom).all(|y| (parent.left..parent.right).all(|x| {
			parts.iter().filter(|r| r.contains_point(Point::new(x, y))).count() == 1
		}))
	}

	#[test]
	fn test_quadrants_tile_parent() {
		for &(w, h) in &[(2, 2), (3, 3), (5, 2), (2, 7), (16, 9)] {
			let parent = Region::new(3, 4, 3 + w, 4 + h);
			let quads = parent.quadrants().unwrap();
			assert!(tiles_exactly(&parent, &quads), "{:?} not tiled by {:?}", parent, quads);
		}
	}

	#[test]
	fn test_quadrants_use_floor_midpoint() {
		let quads = Region::new(0, 0, 5, 3).quadrants().unwrap();
		assert_eq!(quads[0], Region::new(0, 0, 2, 1));
		assert_eq!(quads[3], Region::new(2, 1, 5, 3));
	}

	#[test]
	fn test_thin_regions_do_not_split() {
		for region in [Region::new(0, 0, 1, 10), Region::new(0, 0, 10, 1), Region::new(4, 4, 4, 4)] {
			assert_eq!(region.quadrants(), Err(error::DegenerateRegion(region)));
		}
	}

	#[test]
	fn test_quadrant_of_point() {
		let region = Region::new(0, 0, 4, 4);
		assert_eq!(Quadrant::of_point(&region, Point::new(1, 1)), Quadrant::TopLeft);
		assert_eq!(Quadrant::of_point(&region, Point::new(2, 1)), Quadrant::TopRight);
		assert_eq!(Quadrant::of_point(&region, Point::new(1, 2)), Quadrant::BottomLeft);
		assert_eq!(Quadrant::of_point(&region, Point::new(3, 3)), Quadrant::BottomRight);
	}

	#[test]
	fn test_quadrant_of_straddling_region() {
		let region = Region::new(0, 0, 8, 8);
		assert_eq!(Quadrant::of_region(&region, &Region::new(0, 0, 2, 2)), Some(Quadrant::TopLeft));
		assert_eq!(Quadrant::of_region(&region, &Region::new(5, 4, 7, 6)), Some(Quadrant::BottomRight));
		assert_eq!(Quadrant::of_region(&region, &Region::new(2, 0, 6, 2)), None);
		assert_eq!(Quadrant::of_region(&region, &Region::new(0, 2, 2, 6)), None);
	}

	#[test]
	fn test_touches_is_inclusive() {
		let region = Region::new(0, 0, 4, 4);
		assert!(region.touches(&Region::new(4, 4, 8, 8)));
		assert!(!region.touches(&Region::new(5, 0, 8, 4)));
	}

	#[test]
	fn test_split_builds_children_one_level_deeper() {
		let img = ::image::RgbImage::from_fn(4, 4, |x, _| if x < 2 {
			::image::Rgb([255, 0, 0])
		} else {
			::image::Rgb([0, 0, 255])
		});
		let node = QuadtreeNode::new(&img, Region::new(0, 0, 4, 4), 0).unwrap();
		assert_eq!(node.state(), NodeState::Unresolved);
		assert_eq!(node.color(), ::image::Rgb([127, 0, 127]));
		assert!(node.error() > 0.);
		let children = node.split(&img).unwrap().unwrap();
		for child in children.iter() {
			assert_eq!(child.depth(), 1);
			assert_eq!(child.error(), 0.);
		}
		assert_eq!(children[0].color(), ::image::Rgb([255, 0, 0]));
		assert_eq!(children[1].color(), ::image::Rgb([0, 0, 255]));
	}

	#[test]
	fn test_split_single_pixel_column() {
		let img = ::image::RgbImage::new(1, 8);
		let node = QuadtreeNode::new(&img, Region::new(0, 0, 1, 8), 0).unwrap();
		assert!(node.split(&img).unwrap().is_none());
	}

	#[test]
	fn test_rebase_shifts_children() {
		let img = ::image::RgbImage::new(2, 2);
		let mut node = QuadtreeNode::new(&img, Region::new(0, 0, 2, 2), 0).unwrap();
		node.resolve(NodeState::Internal([1, 2, 3, 4]));
		node.rebase(10);
		assert_eq!(node.children(), Some(&[11, 12, 13, 14]));
	}
}
