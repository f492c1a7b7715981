//! Declarations and classified entities.

use std::ops::Range;

use stilo_scan::LineTag;

/// Kind of top-level declaration a body belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Class,
    Mixin,
    Enum,
}

impl DeclKind {
    /// Source keyword introducing the declaration.
    pub fn keyword(self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Mixin => "mixin",
            DeclKind::Enum => "enum",
        }
    }
}

/// One top-level declaration with a braced body.
///
/// Produced by the declaration finder from the scanner's candidate header
/// lines; consumed by [`crate::classify`].
#[derive(Clone, Debug)]
pub struct Declaration {
    pub kind: DeclKind,
    pub name: String,
    /// Line index of the header.
    pub header_line: usize,
    /// Offset of the body-opening `{`.
    pub open_offset: u32,
    /// Offset of the matching `}`.
    pub close_offset: u32,
    /// Line indices strictly inside the body (between the braces).
    pub body_lines: Range<usize>,
}

/// One classified class member: a constructor, variable, or method,
/// together with the exact range of source lines it owns. Ranges of
/// distinct entities never overlap; leading comment lines pulled into an
/// entity are part of its range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub kind: LineTag,
    /// Sort key and diagnostic label: the member's name, for constructors
    /// including the trailing `(` (`A(`, `A.named(`).
    pub name: String,
    pub lines: Range<usize>,
}
