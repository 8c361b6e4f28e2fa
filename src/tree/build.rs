use std::sync::atomic::{AtomicU32, Ordering};

use tracing::trace;

use crate::config::BuildConfig;
use crate::node::error::BuildError;
use crate::node::image::PixelSource;
use crate::node::{NodeId, NodeState, QuadtreeNode};

/// Nodes of one subtree in preorder, its root at index 0 and child
/// indices relative to that root.
type Fragment = Vec<QuadtreeNode>;

/// Recursive error-driven subdivision of a root node.
///
/// Siblings only share the source image and the deepest-leaf counter.
pub(crate) struct Builder<'a, S: PixelSource + ?Sized> {
	source: &'a S,
	config: &'a BuildConfig,
	max_depth: AtomicU32,
}

impl<'a, S: PixelSource + ?Sized> Builder<'a, S> {
	pub fn new(source: &'a S, config: &'a BuildConfig) -> Self {
		Self {
			source,
			config,
			max_depth: AtomicU32::new(0),
		}
	}

	/// Deepest depth at which a leaf has been created so far.
	pub fn max_depth(&self) -> u32 {
		self.max_depth.load(Ordering::Acquire)
	}

	/// Resolves `node` and everything below it.
	///
	/// Fails as soon as any descendant fails, once all running siblings
	/// have been joined.
	pub fn build(&self, mut node: QuadtreeNode) -> Result<Fragment, BuildError> {
		if self.config.should_stop(node.depth(), node.error()) {
			return Ok(self.leaf(node));
		}
		let children = match node.split(self.source)? {
			Some(c) => c,
			None => {
				trace!(region = ?node.border(), error = node.error(), "region too small to split");
				return Ok(self.leaf(node));
			}
		};
		let [tl, tr, bl, br] = children;
		let subtrees = if node.depth() < self.config.parallel_depth {
			let ((tl, tr), (bl, br)) = rayon::join(
				|| rayon::join(|| self.build(tl), || self.build(tr)),
				|| rayon::join(|| self.build(bl), || self.build(br)),
			);
			[tl?, tr?, bl?, br?]
		} else {
			[self.build(tl)?, self.build(tr)?, self.build(bl)?, self.build(br)?]
		};

		let mut ids = [0; 4];
		let mut len = 1;
		for (slot, subtree) in subtrees.iter().enumerate() {
			ids[slot] = len;
			len += subtree.len() as NodeId;
		}
		node.resolve(NodeState::Internal(ids));
		let mut fragment = Vec::with_capacity(len as usize);
		fragment.push(node);
		for (subtree, &offset) in subtrees.into_iter().zip(ids.iter()) {
			fragment.extend(subtree.into_iter().map(|mut n| {
				n.rebase(offset);
				n
			}));
		}
		Ok(fragment)
	}

	fn leaf(&self, mut node: QuadtreeNode) -> Fragment {
		self.max_depth.fetch_max(node.depth(), Ordering::AcqRel);
		node.resolve(NodeState::Leaf);
		vec![node]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::node::Region;

	#[test]
	fn test_uniform_root_is_single_leaf() {
		let img = image::RgbImage::from_pixel(8, 8, image::Rgb([10, 20, 30]));
		let config = BuildConfig::default();
		let builder = Builder::new(&img, &config);
		let root = QuadtreeNode::new(&img, Region::new(0, 0, 8, 8), 0).unwrap();
		let nodes = builder.build(root).unwrap();
		assert_eq!(nodes.len(), 1);
		assert!(nodes[0].is_leaf());
		assert_eq!(builder.max_depth(), 0);
	}

	#[test]
	fn test_fragment_indices_are_preorder() {
		// Only the top-left quadrant is mixed, so it alone splits again.
		let img = image::RgbImage::from_fn(8, 8, |x, y| {
			if x < 2 && y < 2 {
				image::Rgb([255, 255, 255])
			} else {
				image::Rgb([0, 0, 0])
			}
		});
		let config = BuildConfig::default().with_parallel_depth(0);
		let builder = Builder::new(&img, &config);
		let root = QuadtreeNode::new(&img, Region::new(0, 0, 8, 8), 0).unwrap();
		let nodes = builder.build(root).unwrap();
		// root, TL, TL's four children, TR, BL, BR
		assert_eq!(nodes.len(), 9);
		assert_eq!(nodes[0].children(), Some(&[1, 6, 7, 8]));
		assert_eq!(nodes[1].children(), Some(&[2, 3, 4, 5]));
		assert!(nodes[2..].iter().all(QuadtreeNode::is_leaf));
		assert_eq!(builder.max_depth(), 2);
	}
}
