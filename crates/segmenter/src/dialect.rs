use std::path::Path;

/// Structural shape of a source file, selecting the boundary scan strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceDialect {
    /// Line-oriented, label-anchored sources (65816 disassembly banks)
    Assembly,
    /// Block-structured, brace-delimited sources (C++ editor/emulator code)
    CStyle,
    /// Heading-delimited documentation (markdown, plain-text guides)
    Markdown,
}

impl SourceDialect {
    /// Detect dialect from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "asm" | "s" | "inc" | "65816" => Some(Self::Assembly),
            "cc" | "cpp" | "cxx" | "c" | "h" | "hpp" | "hh" | "hxx" => Some(Self::CStyle),
            "md" | "mdx" | "markdown" | "txt" => Some(Self::Markdown),
            _ => None,
        }
    }

    /// Detect dialect from file path
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Line-comment marker for this dialect, if it has one
    pub const fn line_comment(self) -> Option<&'static str> {
        match self {
            Self::Assembly => Some(";"),
            Self::CStyle => Some("//"),
            Self::Markdown => None,
        }
    }

    /// Get dialect name as string
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assembly => "assembly",
            Self::CStyle => "cstyle",
            Self::Markdown => "markdown",
        }
    }
}
