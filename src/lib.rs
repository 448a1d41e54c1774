#![no_std]

pub use basetree_rbtree::*;

pub mod prelude {
  pub use basetree_rbtree::prelude::*;
}
