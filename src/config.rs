// Configuration for parsing single files and building modules
//
// Plain structs with sensible defaults; nothing is read from disk except the
// optional ignore file handled in `utils::ignore`.

/// Options controlling how a single file is parsed
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Accept trees that contain error or missing nodes instead of failing
    /// with `ParseError::Syntax`
    pub allow_syntax_errors: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            allow_syntax_errors: false,
        }
    }
}

impl ParserConfig {
    /// Tolerant configuration: index whatever tree-sitter recovered
    pub fn lenient() -> Self {
        Self {
            allow_syntax_errors: true,
        }
    }
}

/// Options controlling file discovery for a `Module`
#[derive(Debug, Clone)]
pub struct ModuleConfig {
    /// Ignore patterns: `dir/`, `*.ext` or plain substrings
    pub exclude: Vec<String>,
    /// Descend into dot-directories and index dot-files
    pub include_hidden: bool,
    /// Parser options applied to every discovered file
    pub parser: ParserConfig,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            include_hidden: false,
            parser: ParserConfig::default(),
        }
    }
}
