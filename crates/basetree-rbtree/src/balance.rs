//! Link surgery for red-black trees.
//!
//! Everything here works on raw [`NonNull`] handles of any [`HasRb`] type and
//! a root slot owned by the caller. Nothing allocates, frees, or looks at
//! element contents.

use core::ptr::NonNull;

use log::trace;

use crate::link::{
  Color,
  Dir,
  HasRb,
  RbLink,
};

pub type Root<N> = Option<NonNull<N>>;

pub struct Rb {}

impl Rb {
  #[inline(always)]
  unsafe fn link<'a, N>(node: NonNull<N>) -> &'a RbLink<N>
  where
    N: HasRb + 'a,
  {
    unsafe { node.as_ref() }.rb_link()
  }

  #[inline(always)]
  unsafe fn link_mut<'a, N>(mut node: NonNull<N>) -> &'a mut RbLink<N>
  where
    N: HasRb + 'a,
  {
    unsafe { node.as_mut() }.rb_link_mut()
  }

  #[inline(always)]
  pub unsafe fn parent<N>(node: NonNull<N>) -> Option<NonNull<N>>
  where
    N: HasRb,
  {
    *unsafe { Self::link(node) }.parent()
  }

  #[inline(always)]
  pub unsafe fn child<N>(node: NonNull<N>, dir: Dir) -> Option<NonNull<N>>
  where
    N: HasRb,
  {
    unsafe { Self::link(node) }.child(dir)
  }

  /// Missing nodes are the black sentinel leaves.
  #[inline(always)]
  pub unsafe fn color<N>(node: Option<NonNull<N>>) -> Color
  where
    N: HasRb,
  {
    match node {
      Some(node) => unsafe { Self::link(node) }.color(),
      None => Color::Black,
    }
  }

  #[inline(always)]
  pub unsafe fn set_color<N>(node: NonNull<N>, color: Color)
  where
    N: HasRb,
  {
    *unsafe { Self::link_mut(node) }.color_mut() = color;
  }

  #[inline(always)]
  unsafe fn set_parent<N>(node: NonNull<N>, parent: Option<NonNull<N>>)
  where
    N: HasRb,
  {
    *unsafe { Self::link_mut(node) }.parent_mut() = parent;
  }

  #[inline(always)]
  unsafe fn set_child<N>(node: NonNull<N>, dir: Dir, child: Option<NonNull<N>>)
  where
    N: HasRb,
  {
    *unsafe { Self::link_mut(node) }.child_mut(dir) = child;
  }

  /// Which side of `parent` holds `node`.
  #[inline(always)]
  pub unsafe fn side<N>(parent: NonNull<N>, node: NonNull<N>) -> Dir
  where
    N: HasRb,
  {
    if unsafe { Self::child(parent, Dir::Left) } == Some(node) {
      Dir::Left
    } else {
      Dir::Right
    }
  }

  /// Puts `child` wherever `node` hangs: in its parent's slot, or in `root`.
  ///
  /// # Safety
  ///
  /// `node` must be linked into the tree rooted at `root`.
  pub unsafe fn replace<N>(root: &mut Root<N>, node: NonNull<N>, child: Option<NonNull<N>>)
  where
    N: HasRb,
  {
    let parent = unsafe { Self::parent(node) };
    match parent {
      None => *root = child,
      Some(parent) => unsafe {
        let dir = Self::side(parent, node);
        Self::set_child(parent, dir, child);
      },
    }

    if let Some(child) = child {
      unsafe { Self::set_parent(child, parent) };
    }
  }

  /// Single rotation moving `node` down towards `dir`. Colors are left alone.
  ///
  /// # Safety
  ///
  /// `node` must be linked into the tree rooted at `root` and must have a
  /// child on the `!dir` side.
  pub unsafe fn rotate<N>(root: &mut Root<N>, node: NonNull<N>, dir: Dir)
  where
    N: HasRb,
  {
    let Some(pivot) = (unsafe { Self::child(node, !dir) }) else {
      debug_assert!(false, "rotation without a pivot");
      return;
    };

    unsafe {
      Self::replace(root, node, Some(pivot));

      let inner = Self::child(pivot, dir);
      Self::set_child(node, !dir, inner);
      if let Some(inner) = inner {
        Self::set_parent(inner, Some(node));
      }

      Self::set_child(pivot, dir, Some(node));
      Self::set_parent(node, Some(pivot));
    }
  }

  pub unsafe fn extreme<N>(node: Option<NonNull<N>>, dir: Dir) -> Option<NonNull<N>>
  where
    N: HasRb,
  {
    let mut current = node?;
    while let Some(next) = unsafe { Self::child(current, dir) } {
      current = next;
    }
    Some(current)
  }

  pub unsafe fn min<N>(node: Option<NonNull<N>>) -> Option<NonNull<N>>
  where
    N: HasRb,
  {
    unsafe { Self::extreme(node, Dir::Left) }
  }

  pub unsafe fn max<N>(node: Option<NonNull<N>>) -> Option<NonNull<N>>
  where
    N: HasRb,
  {
    unsafe { Self::extreme(node, Dir::Right) }
  }

  /// In-order neighbour of `node` in direction `dir` (`Right` = successor).
  pub unsafe fn step<N>(node: NonNull<N>, dir: Dir) -> Option<NonNull<N>>
  where
    N: HasRb,
  {
    if let Some(sub) = unsafe { Self::child(node, dir) } {
      return unsafe { Self::extreme(Some(sub), !dir) };
    }

    let mut current = node;
    let mut parent = unsafe { Self::parent(current) };
    while let Some(up) = parent {
      if unsafe { Self::child(up, dir) } != Some(current) {
        break;
      }
      current = up;
      parent = unsafe { Self::parent(up) };
    }
    parent
  }

  pub unsafe fn successor<N>(node: NonNull<N>) -> Option<NonNull<N>>
  where
    N: HasRb,
  {
    unsafe { Self::step(node, Dir::Right) }
  }

  pub unsafe fn predecessor<N>(node: NonNull<N>) -> Option<NonNull<N>>
  where
    N: HasRb,
  {
    unsafe { Self::step(node, Dir::Left) }
  }

  pub unsafe fn root_of<N>(node: NonNull<N>) -> NonNull<N>
  where
    N: HasRb,
  {
    let mut current = node;
    while let Some(parent) = unsafe { Self::parent(current) } {
      current = parent;
    }
    current
  }

  /// Hangs a fresh red `node` under `parent` on side `dir`, or makes it the
  /// root when `parent` is `None`, then rebalances.
  ///
  /// # Safety
  ///
  /// `node` must be unlinked, the `dir` slot of `parent` must be empty, and
  /// placing `node` there must respect the tree's ordering.
  pub unsafe fn link_and_balance<N>(
    root: &mut Root<N>,
    parent: Option<NonNull<N>>,
    dir: Dir,
    node: NonNull<N>,
  ) where
    N: HasRb,
  {
    unsafe {
      let link = Self::link_mut(node);
      *link.parent_mut() = parent;
      *link.left_mut() = None;
      *link.right_mut() = None;
      *link.color_mut() = Color::Red;

      match parent {
        Some(parent) => Self::set_child(parent, dir, Some(node)),
        None => *root = Some(node),
      }

      Self::insert_fixup(root, node);
      *root = Some(Self::root_of(node));
    }
  }

  unsafe fn insert_fixup<N>(root: &mut Root<N>, node: NonNull<N>)
  where
    N: HasRb,
  {
    let mut node = node;

    loop {
      let Some(parent) = (unsafe { Self::parent(node) }) else {
        trace!("insert fixup: root");
        unsafe { Self::set_color(node, Color::Black) };
        return;
      };

      if unsafe { Self::color(Some(parent)) } == Color::Black {
        trace!("insert fixup: parent black");
        return;
      }

      // A red parent is never the root once the root has been blackened.
      let Some(grand) = (unsafe { Self::parent(parent) }) else {
        unsafe { Self::set_color(parent, Color::Black) };
        return;
      };

      let parent_side = unsafe { Self::side(grand, parent) };
      let uncle = unsafe { Self::child(grand, !parent_side) };

      if let Some(uncle) = uncle.filter(|u| unsafe { Self::color(Some(*u)) } == Color::Red) {
        trace!("insert fixup: red uncle");
        unsafe {
          Self::set_color(parent, Color::Black);
          Self::set_color(uncle, Color::Black);
          Self::set_color(grand, Color::Red);
        }
        node = grand;
        continue;
      }

      let mut parent = parent;
      if unsafe { Self::side(parent, node) } != parent_side {
        trace!("insert fixup: triangle");
        unsafe { Self::rotate(root, parent, parent_side) };
        parent = node;
      }

      trace!("insert fixup: line");
      unsafe {
        Self::rotate(root, grand, !parent_side);
        Self::set_color(parent, Color::Black);
        Self::set_color(grand, Color::Red);
      }
      return;
    }
  }

  /// Unlinks `node` from the tree and rebalances. The node's own storage is
  /// untouched and its link is cleared.
  ///
  /// # Safety
  ///
  /// `node` must be linked into the tree rooted at `root` and have at most
  /// one child.
  pub unsafe fn unlink_and_balance<N>(root: &mut Root<N>, node: NonNull<N>)
  where
    N: HasRb,
  {
    unsafe {
      let left = Self::child(node, Dir::Left);
      let right = Self::child(node, Dir::Right);
      debug_assert!(left.is_none() || right.is_none());
      let child = left.or(right);

      if Self::color(Some(node)) == Color::Black {
        match child {
          Some(child) if Self::color(Some(child)) == Color::Red => {
            Self::set_color(child, Color::Black);
          }
          _ => Self::delete_fixup(root, node),
        }
      }

      Self::replace(root, node, child);
      if let Some(top) = *root {
        Self::set_color(top, Color::Black);
      }

      let link = Self::link_mut(node);
      *link.parent_mut() = None;
      *link.left_mut() = None;
      *link.right_mut() = None;
    }
  }

  /// Repairs the missing black on the paths through `node`, which is still
  /// in place and about to be spliced out.
  unsafe fn delete_fixup<N>(root: &mut Root<N>, node: NonNull<N>)
  where
    N: HasRb,
  {
    let mut node = node;

    loop {
      let Some(parent) = (unsafe { Self::parent(node) }) else {
        trace!("delete fixup: root");
        return;
      };

      let side = unsafe { Self::side(parent, node) };
      let mut sibling = unsafe { Self::child(parent, !side) };

      if unsafe { Self::color(sibling) } == Color::Red {
        trace!("delete fixup: red sibling");
        unsafe {
          Self::set_color(parent, Color::Red);
          if let Some(sibling) = sibling {
            Self::set_color(sibling, Color::Black);
          }
          Self::rotate(root, parent, side);
          sibling = Self::child(parent, !side);
        }
      }

      // Black-height on the far side is at least one, so a sibling exists.
      let Some(mut sibling) = sibling else {
        debug_assert!(false, "black node without a sibling");
        return;
      };

      let near = unsafe { Self::child(sibling, side) };
      let far = unsafe { Self::child(sibling, !side) };

      if unsafe { Self::color(near) == Color::Black && Self::color(far) == Color::Black } {
        unsafe { Self::set_color(sibling, Color::Red) };
        if unsafe { Self::color(Some(parent)) } == Color::Black {
          trace!("delete fixup: black parent, black nephews");
          node = parent;
          continue;
        }

        trace!("delete fixup: red parent, black nephews");
        unsafe { Self::set_color(parent, Color::Black) };
        return;
      }

      if unsafe { Self::color(far) } == Color::Black {
        trace!("delete fixup: near nephew red");
        unsafe {
          if let Some(near) = near {
            Self::set_color(near, Color::Black);
          }
          Self::set_color(sibling, Color::Red);
          Self::rotate(root, sibling, !side);
        }
        let Some(rotated) = (unsafe { Self::child(parent, !side) }) else {
          return;
        };
        sibling = rotated;
      }

      trace!("delete fixup: far nephew red");
      unsafe {
        Self::set_color(sibling, Self::color(Some(parent)));
        Self::set_color(parent, Color::Black);
        if let Some(far) = Self::child(sibling, !side) {
          Self::set_color(far, Color::Black);
        }
        Self::rotate(root, parent, side);
      }
      return;
    }
  }
}
