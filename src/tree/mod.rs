mod build;
pub mod image;

use std::path::Path;

use bitvec::order::Msb0;
use bitvec::vec::BitVec;
use tracing::debug;

use crate::config::BuildConfig;
use crate::node::error::{BuildError, DepthError, QueryError};
use crate::node::image::PixelSource;
use crate::node::stats::Color;
use crate::node::{NodeId, NodeState, Point, Quadrant, QuadtreeNode, Region};

/// Arena index of every tree's root.
pub const ROOT: NodeId = 0;

/// Occupancy bits, one per node, indexed by `NodeId`.
type OccupancyBitVec = BitVec<u8, Msb0>;

/// What a renderer needs to know about a leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeafView {
	pub region: Region,
	pub color: Color,
}

/// Quadtree decomposition of an image.
///
/// Nodes live in one arena in preorder, root first; children are
/// addressed by index. The structure is fixed once built, apart from the
/// per-leaf occupancy marks managed by `insert` and `delete`.
#[derive(Clone, Debug)]
pub struct QuadTree {
	nodes: Vec<QuadtreeNode>,
	width: u32,
	height: u32,
	max_depth: u32,
	config: BuildConfig,
	occupied: OccupancyBitVec,
}

impl QuadTree {
	/// Subdivides `source` until every region is flat enough, too deep,
	/// or too small to split.
	pub fn build<S: PixelSource + ?Sized>(source: &S, config: BuildConfig) -> Result<Self, BuildError> {
		let (width, height) = source.dimensions();
		if width == 0 || height == 0 {
			return Err(BuildError::EmptyImage);
		}
		let root = QuadtreeNode::new(source, Region::new(0, 0, width, height), 0)?;
		let builder = build::Builder::new(source, &config);
		let nodes = builder.build(root)?;
		let max_depth = builder.max_depth();
		debug!(
			width,
			height,
			nodes = nodes.len(),
			leaves = nodes.iter().filter(|n| n.is_leaf()).count(),
			max_depth,
			"built quadtree"
		);
		let mut occupied = OccupancyBitVec::new();
		occupied.resize(nodes.len(), false);
		Ok(Self { nodes, width, height, max_depth, config, occupied })
	}

	/// Decodes the image at `path` and builds a tree from it.
	pub fn open<P: AsRef<Path>>(path: P, config: BuildConfig) -> Result<Self, BuildError> {
		let source = ::image::open(path)?.into_rgb8();
		Self::build(&source, config)
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	/// Deepest depth at which a leaf exists.
	pub fn max_depth(&self) -> u32 {
		self.max_depth
	}

	pub fn config(&self) -> &BuildConfig {
		&self.config
	}

	pub fn root(&self) -> &QuadtreeNode {
		&self.nodes[ROOT as usize]
	}

	pub fn node(&self, id: NodeId) -> Option<&QuadtreeNode> {
		self.nodes.get(id as usize)
	}

	/// All nodes, in preorder.
	pub fn nodes(&self) -> &[QuadtreeNode] {
		&self.nodes
	}

	/// The nodes that make up the picture at `depth`: leaves above that
	/// depth and every node sitting exactly at it.
	///
	/// Returned in quadrant order, depth first. Their regions always tile
	/// the whole image.
	pub fn leaf_nodes(&self, depth: u32) -> Result<Vec<&QuadtreeNode>, DepthError> {
		if depth > self.max_depth {
			return Err(DepthError { requested: depth, max: self.max_depth });
		}
		let mut leaves = Vec::new();
		let mut stack = vec![ROOT];
		while let Some(id) = stack.pop() {
			let node = &self.nodes[id as usize];
			match node.state() {
				NodeState::Internal(children) if node.depth() < depth => {
					stack.extend(children.iter().rev());
				}
				_ => leaves.push(node),
			}
		}
		Ok(leaves)
	}

	/// Like `leaf_nodes`, reduced to what a renderer draws.
	pub fn leaf_views(&self, depth: u32) -> Result<Vec<LeafView>, DepthError> {
		Ok(self.leaf_nodes(depth)?
			.into_iter()
			.map(|n| LeafView { region: n.border(), color: n.color() })
			.collect())
	}

	/// Walks down from the root, always into the quadrant holding `point`,
	/// and returns the leaf reached.
	pub fn locate(&self, point: Point) -> Result<NodeId, QueryError> {
		if !self.root().border().contains_point(point) {
			return Err(QueryError::PointOutOfBounds {
				point,
				width: self.width,
				height: self.height,
			});
		}
		let mut id = ROOT;
		while let Some(children) = self.nodes[id as usize].children() {
			let quadrant = Quadrant::of_point(&self.nodes[id as usize].border(), point);
			id = children[quadrant.index()];
		}
		Ok(id)
	}

	/// Marks the leaf holding `point` as occupied.
	///
	/// Returns whether it was unoccupied before.
	pub fn insert(&mut self, point: Point) -> Result<bool, QueryError> {
		let id = self.locate(point)?;
		Ok(!self.occupied.replace(id as usize, true))
	}

	/// Clears the occupied mark of the leaf holding `point`.
	///
	/// Returns whether it was occupied before.
	pub fn delete(&mut self, point: Point) -> Result<bool, QueryError> {
		let id = self.locate(point)?;
		Ok(self.occupied.replace(id as usize, false))
	}

	pub fn is_occupied(&self, point: Point) -> Result<bool, QueryError> {
		let id = self.locate(point)?;
		Ok(self.occupied[id as usize])
	}

	/// Leaves currently marked as occupied, in arena order.
	pub fn occupied_leaves(&self) -> impl Iterator<Item = &QuadtreeNode> + '_ {
		self.occupied.iter_ones().map(move |id| &self.nodes[id])
	}

	/// Whether `region` touches an internal node found by following the
	/// one quadrant that wholly holds it.
	///
	/// Reaching a leaf, or a node where `region` straddles a split line,
	/// answers `false`: the query could not be pinned to a single branch.
	pub fn contains(&self, region: Region) -> bool {
		let mut id = ROOT;
		loop {
			let node = &self.nodes[id as usize];
			let children = match node.children() {
				Some(c) => c,
				None => return false,
			};
			if node.border().touches(&region) {
				return true;
			}
			match Quadrant::of_region(&node.border(), &region) {
				Some(q) => id = children[q.index()],
				None => return false,
			}
		}
	}
}
