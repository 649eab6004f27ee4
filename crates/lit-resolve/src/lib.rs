//! Lit semantic analyzer.
//!
//! This crate resolves a parsed Lit source file: it checks that every name
//! refers to something in scope, every type used is known, every call
//! matches its callee's signature, and every class's inheritance and
//! overrides are consistent — then mutates the AST in place to fill in
//! elided types and synthesize implicit returns. It does not run programs;
//! there is no bytecode compiler, VM, or `extend`/`module_use` system here,
//! unlike the language this one is distilled from.
//!
//! # Architecture
//!
//! - [`parser`]: turns source text into a [`FileAst`] using `nom` combinators,
//!   grounded in the original language's recursive-descent grammar.
//! - [`ast`]: the AST node types the parser produces and the resolver walks.
//! - [`resolver`]: the semantic analyzer itself — scope stack, type and class
//!   registries, and one pass per syntactic category (statements, classes,
//!   expressions).
//! - [`error`]: `thiserror`/`miette` diagnostic types, one struct per error
//!   kind, aggregated into a [`Report`](error::Report).
//! - [`file`]: source file identity, used by spans and diagnostics.
//! - [`nom_tools`]: the span types and parser state threaded through parsing.
//! - [`map`]: an insertion-order-preserving map with "declare vs overwrite"
//!   semantics for scopes and class member tables.
//!
//! # Usage
//!
//! ```ignore
//! use lit_resolve::{parse, resolve, nom_tools::State, file::SourceFile, resolver::scope::Scope};
//!
//! let source = SourceFile::new(vec!["main".into()], "fun main() { }".to_string());
//! let state = State::new(source);
//! let mut ast = parse(&state)?;
//! let report = resolve(&mut ast, Scope::default());
//! if report.errors.is_empty() {
//!     // ast now has every elided type filled in.
//! }
//! ```

use ast::FileAst;
use error::{parse_error_to_report, Report};
use nom::Finish;
use nom_tools::State;
use resolver::scope::Scope;
use resolver::Resolver;

pub mod ast;
pub mod error;
pub mod file;
pub mod map;
pub mod nom_tools;
#[rustfmt::skip]
pub mod parser;
pub mod resolver;

/// Parses Lit source into a [`FileAst`], the first stage of the pipeline.
///
/// # Errors
///
/// Returns a [`Report`] carrying a [`SyntaxErrorItem`](error::SyntaxErrorItem)
/// per nom context frame on the first unrecoverable parse failure.
pub fn parse<'base>(state: &'base State) -> Result<FileAst<'base>, Report> {
    parser::parse(state).finish().map(|(_, file)| file).map_err(parse_error_to_report)
}

/// Resolves `ast` in place against `externals` (host-registered names visible
/// without any declaration in the file itself), returning every diagnostic
/// collected along the way. An empty [`Report`] means the file type-checks
/// cleanly and `ast` now has every elided type filled in and every implicit
/// `return` synthesized.
pub fn resolve<'base>(ast: &mut FileAst<'base>, externals: Scope<'base>) -> Report {
    match Resolver::new(externals).resolve_file(ast) {
        Ok(()) => Report { errors: Vec::new() },
        Err(report) => report,
    }
}
