//! Concrete syntax tree to typed AST.
//!
//! The builder walks the CST the grammar produced and constructs the
//! typed tree the transpiler consumes. It trusts the grammar's shapes:
//! a node that does not match them is a lock-step defect between the two
//! layers and comes back as a [`crate::error::BuildError`], never a
//! silently skipped construct.

mod expressions;
mod literals;
mod operators;
mod statements;


pub use statements::build_source_file;
