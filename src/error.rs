use anyhow::Error as AnyhowError;
use std::{error::Error, fmt};

use crate::host::ScopePath;

/// Convenience type for a result that may contain an `IpxactTreeError`.
pub type Result<T> = std::result::Result<T, IpxactTreeError>;

/// The category of an `IpxactTreeError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// A cursor was queried before being scoped to the requested ancestor path.
  ScopeMismatch,

  /// A child entity of the wrong kind was attached to a parent.
  TypeMismatch,

  /// A value or bound expression could not be evaluated to an integer.
  NumericParseFailure,

  /// The host API is not reachable or has no component loaded.
  HostUnavailable,

  /// The XML document backing a host could not be read.
  Xml,
}
impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let s = match self {
      ErrorKind::ScopeMismatch => "scope mismatch",
      ErrorKind::TypeMismatch => "type mismatch",
      ErrorKind::NumericParseFailure => "numeric parse failure",
      ErrorKind::HostUnavailable => "host unavailable",
      ErrorKind::Xml => "xml error",
    };
    write!(f, "{}", s)
  }
}

/// Error struct for all errors returned by this crate or the crates on which it depends.
#[derive(Debug, Clone, PartialEq)]
pub struct IpxactTreeError {
  /// What went wrong.
  pub kind: ErrorKind,

  /// Description of the error that occurred.
  pub details: String,

  /// The map/block/register/field path being visited when the error occurred, if any.
  pub path: Option<ScopePath>,
}
impl IpxactTreeError {
  pub(crate) fn new(kind: ErrorKind, msg: &str) -> IpxactTreeError {
    Self {
      kind,
      details: msg.to_string(),
      path: None,
    }
  }

  pub(crate) fn scope_mismatch(expected: &ScopePath, actual: Option<&ScopePath>) -> Self {
    let actual = match actual {
      Some(p) => format!("'{}'", p),
      None => "no scope".to_owned(),
    };
    Self {
      kind: ErrorKind::ScopeMismatch,
      details: format!("cursor queried for '{}' while holding {}", expected, actual),
      path: Some(expected.clone()),
    }
  }

  pub(crate) fn with_path(mut self, path: &ScopePath) -> Self {
    if self.path.is_none() {
      self.path = Some(path.clone());
    }
    self
  }
}
impl fmt::Display for IpxactTreeError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self.path {
      Some(ref p) if !p.is_component() => write!(f, "{} at '{}': {}", self.kind, p, self.details),
      _ => write!(f, "{}: {}", self.kind, self.details),
    }
  }
}
impl Error for IpxactTreeError {}
impl From<AnyhowError> for IpxactTreeError {
  fn from(err: AnyhowError) -> Self {
    IpxactTreeError::new(ErrorKind::HostUnavailable, &format!("anyhow::Error {:?}", err))
  }
}
impl From<regex::Error> for IpxactTreeError {
  fn from(err: regex::Error) -> Self {
    IpxactTreeError::new(ErrorKind::NumericParseFailure, &format!("regex::Error {:?}", err))
  }
}
impl From<xmltree::ParseError> for IpxactTreeError {
  fn from(err: xmltree::ParseError) -> Self {
    IpxactTreeError::new(ErrorKind::Xml, &format!("xmltree::ParseError {}", err))
  }
}
