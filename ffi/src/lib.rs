//! C entry points over `void*` elements.
//!
//! Every function treats null arguments as invalid and reports failure
//! (`0` or null) without touching the tree.

use core::{
  cmp::Ordering,
  ffi::c_void,
  ops::ControlFlow,
  ptr::{
    self,
    NonNull,
  },
};

use basetree::prelude::*;
use libc::c_int;

pub type BtCompareFn = unsafe extern "C" fn(*const c_void, *const c_void) -> c_int;
pub type BtFreeFn = unsafe extern "C" fn(*mut c_void);
pub type BtForEachFn = unsafe extern "C" fn(*const c_void, *mut c_void) -> c_int;

struct Handle(NonNull<c_void>);

type Compare = Box<dyn Fn(&Handle, &Handle) -> Ordering>;
type Destroy = Box<dyn FnMut(Handle)>;

pub struct BtRbTree {
  inner: RbTree<Handle, Compare, Destroy>,
}

impl BtRbTree {
  fn new(compare: BtCompareFn, free: BtFreeFn) -> Self {
    let compare: Compare = Box::new(move |a: &Handle, b: &Handle| {
      unsafe { compare(a.0.as_ptr(), b.0.as_ptr()) }.cmp(&0)
    });
    let destroy: Destroy = Box::new(move |h: Handle| unsafe { free(h.0.as_ptr()) });

    Self {
      inner: RbTree::new(compare, destroy),
    }
  }
}

unsafe fn tree_ref<'a>(tree: *const BtRbTree) -> Option<&'a BtRbTree> {
  unsafe { tree.as_ref() }
}

unsafe fn tree_mut<'a>(tree: *mut BtRbTree) -> Option<&'a mut BtRbTree> {
  unsafe { tree.as_mut() }
}

fn handle(data: *const c_void) -> Option<Handle> {
  NonNull::new(data as *mut c_void).map(Handle)
}

#[unsafe(no_mangle)]
pub extern "C" fn bt_rbtree_new(
  compare: Option<BtCompareFn>,
  free: Option<BtFreeFn>,
) -> *mut BtRbTree {
  let (Some(compare), Some(free)) = (compare, free) else {
    return ptr::null_mut();
  };

  Box::into_raw(Box::new(BtRbTree::new(compare, free)))
}

/// Takes ownership of `data` on success. On failure the caller keeps it.
///
/// # Safety
///
/// `tree` must be null or come from [`bt_rbtree_new`]; `data` must be valid
/// for the tree's comparator.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bt_rbtree_insert(tree: *mut BtRbTree, data: *mut c_void) -> c_int {
  let (Some(tree), Some(data)) = (unsafe { tree_mut(tree) }, handle(data)) else {
    return 0;
  };

  c_int::from(tree.inner.insert(data).is_ok())
}

/// # Safety
///
/// Same as [`bt_rbtree_insert`]. `data` is only used as a lookup key.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bt_rbtree_delete(tree: *mut BtRbTree, data: *const c_void) -> c_int {
  let (Some(tree), Some(key)) = (unsafe { tree_mut(tree) }, handle(data)) else {
    return 0;
  };

  c_int::from(tree.inner.delete(&key).is_ok())
}

/// # Safety
///
/// Same as [`bt_rbtree_delete`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bt_rbtree_contains(tree: *const BtRbTree, data: *const c_void) -> c_int {
  let (Some(tree), Some(key)) = (unsafe { tree_ref(tree) }, handle(data)) else {
    return 0;
  };

  c_int::from(tree.inner.contains(&key))
}

/// Calls `func(element, args)` in ascending order, stopping at the first `0`.
///
/// # Safety
///
/// `tree` must be null or come from [`bt_rbtree_new`]. `func` must not
/// mutate the tree.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bt_rbtree_for_each(
  tree: *const BtRbTree,
  func: Option<BtForEachFn>,
  args: *mut c_void,
) -> c_int {
  let (Some(tree), Some(func)) = (unsafe { tree_ref(tree) }, func) else {
    return 0;
  };

  let flow = tree.inner.for_each(|h| {
    if unsafe { func(h.0.as_ptr(), args) } == 0 {
      ControlFlow::Break(())
    } else {
      ControlFlow::Continue(())
    }
  });

  c_int::from(flow.is_continue())
}

/// # Safety
///
/// `tree` must be null or come from [`bt_rbtree_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bt_rbtree_size(tree: *const BtRbTree) -> usize {
  unsafe { tree_ref(tree) }.map_or(0, |tree| tree.inner.len())
}

/// Frees every element and the tree, then nulls `*tree`.
///
/// # Safety
///
/// `tree` must be null or point to a pointer that is null or came from
/// [`bt_rbtree_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bt_rbtree_free(tree: *mut *mut BtRbTree) {
  let Some(slot) = (unsafe { tree.as_mut() }) else {
    return;
  };
  if slot.is_null() {
    return;
  }

  drop(unsafe { Box::from_raw(*slot) });
  *slot = ptr::null_mut();
}
