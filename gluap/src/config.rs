//! Parser configuration.

/// The language dialect accepted by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Plain Lua 5.2.
    Lua52,

    /// Lua 5.2 plus the Garry's Mod extensions: `continue`, `&&`, `||`, `!=`, `!`, and C-style
    /// `//` and `/* */` comments.
    #[default]
    GLua,
}

impl Dialect {
    pub fn has_extensions(self) -> bool {
        matches!(self, Dialect::GLua)
    }
}

/// How many expressions and blocks may nest inside one another by default.
///
/// Every level takes a chain of parser stack frames. At this depth a parse fits in the default
/// stack of a spawned thread.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Options for [`parse_with_config`](crate::parse::parse_with_config).
#[derive(Debug, Clone)]
pub struct ParseConfig {
    pub dialect: Dialect,

    /// Refuse to parse token streams longer than this, comments excluded.
    pub token_limit: Option<usize>,

    /// Expressions and blocks nested deeper than this are skipped.
    pub max_depth: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            token_limit: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseConfig {
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_token_limit(mut self, limit: usize) -> Self {
        self.token_limit = Some(limit);
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
