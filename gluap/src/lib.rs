//! An error-tolerant parser for Lua 5.2 and the Garry's Mod dialect.
//!
//! ```
//! use gluap::parse_from_text;
//!
//! let (chunk, diags) = parse_from_text("local x = f(1,");
//! assert_eq!(chunk.block.stmts.len(), 1);
//! assert!(!diags.is_empty());
//! ```

pub mod config;
pub mod diag;
pub mod parse;
pub mod span;
pub mod syn;
pub mod tok;
pub mod util;

pub use config::{Dialect, ParseConfig};
pub use parse::{
    parse, parse_block, parse_expr, parse_from_text, parse_rule, parse_stmt, parse_with_config,
    split_comments, ParseDiag,
};
