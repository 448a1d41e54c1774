use core::{
  cmp::Ordering,
  marker::PhantomData,
  ops::ControlFlow,
  ptr::NonNull,
};

use alloc::boxed::Box;
use log::{
  debug,
  trace,
};

use crate::{
  RbError,
  RbResult,
  balance::{
    Rb,
    Root,
  },
  iter::RbIter,
  link::Dir,
  node::RbNode,
};

pub type CompareFn<T> = fn(&T, &T) -> Ordering;
pub type DestroyFn<T> = fn(T);

/// Ordered set of owned elements kept balanced as a red-black tree.
///
/// `compare` must be a total order over every element that ever enters the
/// tree. `destroy` receives each element exactly once, when it is deleted or
/// when the tree is cleared or dropped.
pub struct RbTree<T, C = CompareFn<T>, D = DestroyFn<T>>
where
  C: Fn(&T, &T) -> Ordering,
  D: FnMut(T),
{
  root: Root<RbNode<T>>,
  size: usize,
  compare: C,
  destroy: D,
  marker: PhantomData<Box<RbNode<T>>>,
}

impl<T> RbTree<T>
where
  T: Ord,
{
  pub fn ordered() -> Self {
    Self::new(T::cmp, drop::<T>)
  }
}

impl<T> Default for RbTree<T>
where
  T: Ord,
{
  fn default() -> Self {
    Self::ordered()
  }
}

impl<T, C> RbTree<T, C>
where
  C: Fn(&T, &T) -> Ordering,
{
  pub fn with_compare(compare: C) -> Self {
    Self::new(compare, drop::<T>)
  }
}

impl<T, C, D> RbTree<T, C, D>
where
  C: Fn(&T, &T) -> Ordering,
  D: FnMut(T),
{
  pub fn new(compare: C, destroy: D) -> Self {
    Self {
      root: None,
      size: 0,
      compare,
      destroy,
      marker: PhantomData,
    }
  }

  pub fn len(&self) -> usize {
    self.size
  }

  pub fn is_empty(&self) -> bool {
    self.size == 0
  }

  pub(crate) fn root(&self) -> Root<RbNode<T>> {
    self.root
  }

  pub(crate) fn compare(&self, one: &T, other: &T) -> Ordering {
    (self.compare)(one, other)
  }

  fn find(&self, key: &T) -> Option<NonNull<RbNode<T>>> {
    let mut current = self.root;

    while let Some(node) = current {
      let element = unsafe { node.as_ref() }.element();
      current = match (self.compare)(key, element) {
        Ordering::Equal => return Some(node),
        Ordering::Less => unsafe { Rb::child(node, Dir::Left) },
        Ordering::Greater => unsafe { Rb::child(node, Dir::Right) },
      };
    }

    None
  }

  pub fn contains(&self, key: &T) -> bool {
    self.find(key).is_some()
  }

  pub fn get(&self, key: &T) -> Option<&T> {
    let node = self.find(key)?;
    Some(unsafe { node.as_ref() }.element())
  }

  pub fn first(&self) -> Option<&T> {
    let node = unsafe { Rb::min(self.root) }?;
    Some(unsafe { node.as_ref() }.element())
  }

  pub fn last(&self) -> Option<&T> {
    let node = unsafe { Rb::max(self.root) }?;
    Some(unsafe { node.as_ref() }.element())
  }

  /// Empty slot the element belongs in: its would-be parent and side.
  fn slot_for(&self, element: &T) -> (Option<NonNull<RbNode<T>>>, Dir) {
    let mut parent = None;
    let mut dir = Dir::Left;
    let mut current = self.root;

    while let Some(node) = current {
      parent = Some(node);
      dir = match (self.compare)(element, unsafe { node.as_ref() }.element()) {
        Ordering::Less => Dir::Left,
        Ordering::Equal | Ordering::Greater => Dir::Right,
      };
      current = unsafe { Rb::child(node, dir) };
    }

    (parent, dir)
  }

  pub fn insert(&mut self, element: T) -> RbResult<(), T> {
    if self.contains(&element) {
      trace!("insert rejected: duplicate");
      return Err(RbError::Duplicate(element));
    }

    let (parent, dir) = self.slot_for(&element);
    let node = RbNode::create(element).map_err(RbError::OutOfMemory)?;

    unsafe { Rb::link_and_balance(&mut self.root, parent, dir, node) };
    self.size += 1;
    trace!("inserted, size {}", self.size);
    Ok(())
  }

  /// Removes the element equal to `key` and hands it to the destructor.
  pub fn delete(&mut self, key: &T) -> RbResult<(), T> {
    let Some(mut target) = self.find(key) else {
      trace!("delete rejected: not found");
      return Err(RbError::NotFound);
    };

    let has_both = unsafe {
      Rb::child(target, Dir::Left).is_some() && Rb::child(target, Dir::Right).is_some()
    };

    if has_both {
      let Some(successor) = (unsafe { Rb::successor(target) }) else {
        return Err(RbError::NotFound);
      };

      unsafe { Rb::unlink_and_balance(&mut self.root, successor) };
      let moved = unsafe { RbNode::release(successor) };
      let old = unsafe { target.as_mut() }.replace_element(moved);
      (self.destroy)(old);
    } else {
      unsafe { Rb::unlink_and_balance(&mut self.root, target) };
      let old = unsafe { RbNode::release(target) };
      (self.destroy)(old);
    }

    self.size -= 1;
    trace!("deleted, size {}", self.size);
    Ok(())
  }

  pub fn iter(&self) -> RbIter<'_, T> {
    RbIter::new(unsafe { Rb::min(self.root) })
  }

  /// Visits every element in ascending order until `visitor` breaks.
  pub fn for_each<B, F>(&self, visitor: F) -> ControlFlow<B>
  where
    F: FnMut(&T) -> ControlFlow<B>,
  {
    self.iter().try_for_each(visitor)
  }

  /// Destroys every element, children before parents. A no-op on an empty
  /// tree.
  pub fn clear(&mut self) {
    let Some(root) = self.root.take() else {
      return;
    };

    let released = self.size;
    self.release_subtree(root);
    self.size = 0;
    debug!("cleared {} elements", released);
  }

  fn release_subtree(&mut self, node: NonNull<RbNode<T>>) {
    let (left, right) = unsafe { (Rb::child(node, Dir::Left), Rb::child(node, Dir::Right)) };

    if let Some(left) = left {
      self.release_subtree(left);
    }
    if let Some(right) = right {
      self.release_subtree(right);
    }

    let element = unsafe { RbNode::release(node) };
    (self.destroy)(element);
  }
}

impl<'tree, T, C, D> IntoIterator for &'tree RbTree<T, C, D>
where
  C: Fn(&T, &T) -> Ordering,
  D: FnMut(T),
{
  type Item = &'tree T;
  type IntoIter = RbIter<'tree, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<T, C, D> Drop for RbTree<T, C, D>
where
  C: Fn(&T, &T) -> Ordering,
  D: FnMut(T),
{
  fn drop(&mut self) {
    self.clear();
  }
}

unsafe impl<T, C, D> Send for RbTree<T, C, D>
where
  T: Send,
  C: Send + Fn(&T, &T) -> Ordering,
  D: Send + FnMut(T),
{
}

unsafe impl<T, C, D> Sync for RbTree<T, C, D>
where
  T: Sync,
  C: Sync + Fn(&T, &T) -> Ordering,
  D: Sync + FnMut(T),
{
}
