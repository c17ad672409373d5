use core::fmt;
use std::{borrow::Cow, ops::Deref};

use ecow::EcoString;

/// An error that can occur during rendering.
///
/// Only caller-contract violations are reported this way. Defects in the
/// act content itself are absorbed by the renderers.
#[derive(Clone)]
pub struct Error(Box<Repr>);

#[derive(Clone)]
enum Repr {
    /// No item carries the requested hierarchical number.
    NotFound(EcoString),
    /// The act has no tree to render.
    MissingTree,
    /// The requested target format is unknown.
    UnknownFormat(EcoString),
    /// Just a message.
    Msg(Cow<'static, str>),
}

impl Error {
    /// Creates a lookup miss for the given item number.
    pub fn not_found(number: impl Into<EcoString>) -> Self {
        Error(Box::new(Repr::NotFound(number.into())))
    }

    /// Creates an error for an act without a tree.
    pub fn missing_tree() -> Self {
        Error(Box::new(Repr::MissingTree))
    }

    /// Creates an error for an unknown target format name.
    pub fn unknown_format(name: impl Into<EcoString>) -> Self {
        Error(Box::new(Repr::UnknownFormat(name.into())))
    }

    /// Whether the error is a subtree lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self.0.deref(), Repr::NotFound(_))
    }

    /// Whether the error reports an unknown target format.
    pub fn is_unknown_format(&self) -> bool {
        matches!(self.0.deref(), Repr::UnknownFormat(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.deref() {
            Repr::NotFound(number) => write!(f, "no item with number {number:?}"),
            Repr::MissingTree => write!(f, "the act has no tree"),
            Repr::UnknownFormat(name) => write!(f, "unknown target format {name:?}"),
            Repr::Msg(s) => write!(f, "{s}"),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error(Box::new(Repr::Msg(e.to_string().into())))
    }
}

impl From<fmt::Error> for Error {
    fn from(e: fmt::Error) -> Self {
        Error(Box::new(Repr::Msg(e.to_string().into())))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error(Box::new(Repr::Msg(format!("invalid act data: {e}").into())))
    }
}

impl From<&'static str> for Error {
    fn from(s: &'static str) -> Self {
        Error(Box::new(Repr::Msg(s.into())))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error(Box::new(Repr::Msg(s.into())))
    }
}

impl From<Cow<'static, str>> for Error {
    fn from(s: Cow<'static, str>) -> Self {
        Error(Box::new(Repr::Msg(s)))
    }
}
