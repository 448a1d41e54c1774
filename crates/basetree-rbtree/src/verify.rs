use core::{
  cmp::Ordering,
  ptr::NonNull,
};

use getset::CopyGetters;

use crate::{
  RbTree,
  balance::Rb,
  link::{
    Color,
    Dir,
  },
  node::RbNode,
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RbViolation {
  RedRoot,
  RedRed,
  BlackHeight,
  BrokenParent,
  OutOfOrder,
  SizeMismatch,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct RbStats {
  len: usize,
  height: usize,
  black_height: usize,
}

impl<T, C, D> RbTree<T, C, D>
where
  C: Fn(&T, &T) -> Ordering,
  D: FnMut(T),
{
  /// Walks the whole tree and checks every red-black and linkage invariant.
  pub fn verify(&self) -> Result<RbStats, RbViolation> {
    let Some(root) = self.root() else {
      if self.len() != 0 {
        return Err(RbViolation::SizeMismatch);
      }
      return Ok(RbStats::default());
    };

    if unsafe { Rb::color(Some(root)) } != Color::Black {
      return Err(RbViolation::RedRoot);
    }
    if unsafe { Rb::parent(root) }.is_some() {
      return Err(RbViolation::BrokenParent);
    }

    // Black-height excludes the node it is measured from.
    let mut stats = RbStats::default();
    let root_height = self.check(root, 1, &mut stats)?;
    stats.black_height = root_height - 1;

    let mut previous: Option<&T> = None;
    for element in self.iter() {
      if let Some(previous) = previous {
        if self.compare(previous, element) != Ordering::Less {
          return Err(RbViolation::OutOfOrder);
        }
      }
      previous = Some(element);
    }

    if stats.len != self.len() {
      return Err(RbViolation::SizeMismatch);
    }

    Ok(stats)
  }

  /// Returns the black-height below `node`, counting the null leaves.
  fn check(
    &self,
    node: NonNull<RbNode<T>>,
    depth: usize,
    stats: &mut RbStats,
  ) -> Result<usize, RbViolation> {
    stats.len += 1;
    stats.height = stats.height.max(depth);

    let color = unsafe { Rb::color(Some(node)) };
    let mut heights = [1usize; 2];

    for (slot, dir) in [Dir::Left, Dir::Right].into_iter().enumerate() {
      let Some(child) = (unsafe { Rb::child(node, dir) }) else {
        continue;
      };

      if unsafe { Rb::parent(child) } != Some(node) {
        return Err(RbViolation::BrokenParent);
      }
      if color == Color::Red && unsafe { Rb::color(Some(child)) } == Color::Red {
        return Err(RbViolation::RedRed);
      }

      heights[slot] = self.check(child, depth + 1, stats)?;
    }

    if heights[0] != heights[1] {
      return Err(RbViolation::BlackHeight);
    }

    Ok(heights[0] + usize::from(color == Color::Black))
  }
}
