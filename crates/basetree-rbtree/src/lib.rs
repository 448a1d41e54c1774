#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod balance;
mod iter;
mod link;
mod node;
mod tree;
mod verify;

pub use balance::{
  Rb,
  Root,
};
pub use iter::RbIter;
pub use link::{
  Color,
  Dir,
  HasRb,
  RbLink,
};
pub use node::RbNode;
pub use tree::{
  CompareFn,
  DestroyFn,
  RbTree,
};
pub use verify::{
  RbStats,
  RbViolation,
};

pub mod prelude {
  pub use super::{
    Color,
    RbError,
    RbIter,
    RbResult,
    RbStats,
    RbTree,
    RbViolation,
  };
}

/// Failed tree mutation. Variants that carry `T` give the rejected element
/// back to the caller.
#[derive(Debug, PartialEq, Eq)]
pub enum RbError<T> {
  Duplicate(T),
  OutOfMemory(T),
  NotFound,
}

impl<T> RbError<T> {
  pub fn into_inner(self) -> Option<T> {
    match self {
      RbError::Duplicate(element) | RbError::OutOfMemory(element) => Some(element),
      RbError::NotFound => None,
    }
  }
}

pub type RbResult<R, T> = Result<R, RbError<T>>;
