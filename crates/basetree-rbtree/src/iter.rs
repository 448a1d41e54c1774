use core::{
  iter::FusedIterator,
  marker::PhantomData,
  ptr::NonNull,
};

use crate::{
  balance::Rb,
  node::RbNode,
};

/// Ascending walk that steps from node to in-order successor.
pub struct RbIter<'tree, T>
where
  T: 'tree,
{
  next: Option<NonNull<RbNode<T>>>,
  marker: PhantomData<&'tree T>,
}

impl<'tree, T> RbIter<'tree, T>
where
  T: 'tree,
{
  pub(crate) fn new(start: Option<NonNull<RbNode<T>>>) -> Self {
    Self {
      next: start,
      marker: PhantomData,
    }
  }
}

impl<'tree, T> Iterator for RbIter<'tree, T>
where
  T: 'tree,
{
  type Item = &'tree T;

  fn next(&mut self) -> Option<Self::Item> {
    let current = self.next?;
    self.next = unsafe { Rb::successor(current) };
    let current_ref: &'tree RbNode<T> = unsafe { current.as_ref() };
    Some(current_ref.element())
  }
}

impl<'tree, T> FusedIterator for RbIter<'tree, T> where T: 'tree {}
