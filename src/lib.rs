// SwiftDoc Core - documented symbol index extraction for Swift
//
// Parses Swift sources with tree-sitter, binds declarations to their leading
// documentation comments and records the types, extensions and compilation
// branches that enclose them.

pub mod config;
pub mod declarations;
pub mod documentation;
pub mod error;
pub mod language;
pub mod module;
pub mod source_file;
pub mod symbol;
pub mod syntax;
pub mod utils;

mod visitor;

// Re-export the public API
pub use config::{ModuleConfig, ParserConfig};
pub use declarations::{Declaration, DeclarationKind, Extension, Import};
pub use documentation::{Documentation, DocumentationError, DocumentationParser, MarkupParser};
pub use error::ParseError;
pub use module::Module;
pub use source_file::SourceFile;
pub use symbol::{CompilationCondition, ConditionalCompilationBlock, ContextFrame, Symbol};
pub use syntax::{Branch, SourceLocation};
