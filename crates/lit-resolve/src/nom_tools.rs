//! Parser combinator utilities built on nom.
//!
//! Provides the span types that flow from the parser through the AST into
//! diagnostics, plus small helpers shared by every `parser` submodule.

use std::fmt::Display;
use std::hash::Hash;
use std::ops::Range;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use nom::character::complete::multispace0;
use nom::sequence::delimited;
use nom::Parser;
use nom_locate::LocatedSpan;

use crate::file::SourceFile;
use crate::parser::LitParserError;

/// Parser state threaded through every combinator: the file being parsed and
/// an atomic counter used to hand out unique AST node indices.
#[derive(Debug, Clone)]
pub struct State {
    pub file: SourceFile,
    pub indexer: Arc<AtomicUsize>,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.file.hash(state);
    }
}

impl State {
    pub fn new(file: SourceFile) -> Self {
        Self {
            file,
            indexer: Arc::new(AtomicUsize::new(0)),
        }
    }
}

/// nom_locate span carrying our parser [`State`] as extra data.
pub type NomSpan<'base, T = &'base str> = LocatedSpan<T, State>;

/// A span of source text, detached from the nom cursor but still borrowing
/// the original text for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span<'base> {
    pub text: &'base str,
    pub position: Range<usize>,
    pub state: State,
}

impl Display for Span<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text)
    }
}

impl<'base> From<NomSpan<'base>> for Span<'base> {
    fn from(value: NomSpan<'base>) -> Self {
        Span {
            text: value.fragment(),
            position: value.to_range(),
            state: value.extra.clone(),
        }
    }
}

/// Owned, lifetime-free span information: position plus the source file it
/// came from. Used anywhere a diagnostic needs to outlive the parse.
#[derive(Clone, Debug)]
pub struct SpanInfo {
    pub position: Range<usize>,
    pub file: SourceFile,
}

impl SpanInfo {
    pub fn new(position: Range<usize>, file: SourceFile) -> Self {
        Self { position, file }
    }
}

impl From<Span<'_>> for SpanInfo {
    fn from(span: Span<'_>) -> Self {
        SpanInfo::new(span.to_range(), span.state.file.clone())
    }
}

impl From<&Span<'_>> for SpanInfo {
    fn from(span: &Span<'_>) -> Self {
        SpanInfo::new(span.to_range(), span.state.file.clone())
    }
}

pub trait ToRange {
    fn to_range(&self) -> Range<usize>;
}

impl ToRange for NomSpan<'_> {
    fn to_range(&self) -> Range<usize> {
        let start = self.location_offset();
        let end = match nom::character::complete::alphanumeric1::<NomSpan, ()>(self.clone()) {
            Ok((_, data)) => start + data.fragment().len(),
            Err(_) => start + self.fragment().len(),
        };
        start..end
    }
}

impl ToRange for Span<'_> {
    fn to_range(&self) -> Range<usize> {
        self.position.clone()
    }
}

/// Parser combinator that strips surrounding whitespace around a token.
pub fn cleanup<'base, O, F>(f: F) -> impl Parser<NomSpan<'base>, Output = O, Error = LitParserError<'base>>
where
    F: Parser<NomSpan<'base>, Output = O, Error = LitParserError<'base>>,
{
    delimited(multispace0, f, multispace0)
}
