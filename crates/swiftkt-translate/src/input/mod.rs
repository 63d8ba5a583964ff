//! Readers that turn dump text into the typed Swift AST.
//!
//! Parsing happens in two passes: [`dump`] produces a generic [`RawNode`]
//! tree, then [`builder`] maps every raw node onto a [`SourceNode`] variant.
//!
//! [`SourceNode`]: crate::swift::SourceNode

pub mod builder;
pub mod dump;

pub use builder::{AstBuilder, Constructor, build_ast, constructor_for, constructors};
pub use dump::{DumpParser, DumpSyntaxError, RawNode, parse_dump};
