use core::{
  ops::Not,
  ptr::NonNull,
};

use getset::{
  CopyGetters,
  Getters,
  MutGetters,
};

/// Implemented by anything that embeds an [`RbLink`] and can therefore be
/// threaded into a red-black tree by [`crate::Rb`].
pub trait HasRb {
  fn rb_link(&self) -> &RbLink<Self>
  where
    Self: Sized;
  fn rb_link_mut(&mut self) -> &mut RbLink<Self>
  where
    Self: Sized;
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Color {
  #[default]
  Red,
  Black,
}

/// Side of a node. Rotating in `Dir::Left` moves the node down to the left.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Dir {
  Left,
  Right,
}

impl Not for Dir {
  type Output = Dir;

  fn not(self) -> Self::Output {
    match self {
      Dir::Left => Dir::Right,
      Dir::Right => Dir::Left,
    }
  }
}

#[derive(Debug, Getters, MutGetters, CopyGetters)]
pub struct RbLink<T>
where
  T: HasRb,
{
  #[getset(get = "pub", get_mut = "pub")]
  parent: Option<NonNull<T>>,
  #[getset(get = "pub", get_mut = "pub")]
  left: Option<NonNull<T>>,
  #[getset(get = "pub", get_mut = "pub")]
  right: Option<NonNull<T>>,
  #[getset(get_copy = "pub", get_mut = "pub")]
  color: Color,
}

impl<T> RbLink<T>
where
  T: HasRb,
{
  #[inline(always)]
  pub fn child(&self, dir: Dir) -> Option<NonNull<T>> {
    match dir {
      Dir::Left => self.left,
      Dir::Right => self.right,
    }
  }

  #[inline(always)]
  pub fn child_mut(&mut self, dir: Dir) -> &mut Option<NonNull<T>> {
    match dir {
      Dir::Left => &mut self.left,
      Dir::Right => &mut self.right,
    }
  }

  pub fn is_linked(&self) -> bool {
    self.parent.is_some() || self.left.is_some() || self.right.is_some()
  }
}

impl<T> Default for RbLink<T>
where
  T: HasRb,
{
  fn default() -> Self {
    Self {
      parent: None,
      left: None,
      right: None,
      color: Color::default(),
    }
  }
}
