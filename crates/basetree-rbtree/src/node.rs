use alloc::alloc::{
  Layout,
  alloc,
  dealloc,
};
use core::ptr::NonNull;

use getset::{
  Getters,
  MutGetters,
};

use crate::link::{
  HasRb,
  RbLink,
};

#[derive(Debug, Getters, MutGetters)]
pub struct RbNode<T> {
  link: RbLink<Self>,
  #[getset(get = "pub", get_mut = "pub")]
  element: T,
}

impl<T> RbNode<T> {
  /// Moves `element` into a fresh heap node. Hands the element back when the
  /// allocator is out of memory.
  pub(crate) fn create(element: T) -> Result<NonNull<Self>, T> {
    let layout = Layout::new::<Self>();
    // SAFETY: `RbNode` always carries an `RbLink`, so the layout is non-zero.
    let raw = unsafe { alloc(layout) } as *mut Self;
    let Some(node) = NonNull::new(raw) else {
      return Err(element);
    };

    let tmp = Self {
      link: RbLink::default(),
      element,
    };
    unsafe { node.as_ptr().write(tmp) };
    Ok(node)
  }

  /// Frees the node and returns its element without running any destructor
  /// on it.
  ///
  /// # Safety
  ///
  /// `node` must come from [`RbNode::create`], be unlinked, and not be used
  /// again.
  pub(crate) unsafe fn release(node: NonNull<Self>) -> T {
    let RbNode { element, .. } = unsafe { node.as_ptr().read() };
    unsafe { dealloc(node.as_ptr() as *mut u8, Layout::new::<Self>()) };
    element
  }

  /// Swaps in a new element, returning the previous one.
  pub(crate) fn replace_element(&mut self, element: T) -> T {
    core::mem::replace(&mut self.element, element)
  }
}

impl<T> HasRb for RbNode<T> {
  fn rb_link(&self) -> &RbLink<Self> {
    &self.link
  }

  fn rb_link_mut(&mut self) -> &mut RbLink<Self> {
    &mut self.link
  }
}
