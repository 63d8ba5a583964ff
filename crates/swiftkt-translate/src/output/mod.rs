//! Source emitters for the target AST.

pub mod kotlin;

pub use kotlin::KotlinWriter;
