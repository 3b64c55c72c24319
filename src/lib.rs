use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

mod address_block;
mod component;
pub mod config;
mod error;
pub mod expression;
mod field;
pub mod host;
mod node;
mod parameter;
mod port;
mod printer;
mod projection;
mod register;
pub mod value;
mod xml_host;

pub use address_block::AddressBlock;
pub use component::Component;
pub use config::{PrintOptions, ProjectionOptions};
pub use error::{ErrorKind, IpxactTreeError, Result};
pub use field::{Field, Reset, DEFAULT_RESET_TYPE};
pub use node::{Node, NodeRef};
pub use parameter::Parameter;
pub use port::{Direction, Port};
pub use printer::{print_tree, print_tree_with};
pub use projection::{project, project_report, project_with, Projection};
pub use register::Register;
pub use xml_host::XmlHost;

/// The name and description every entity in the tree carries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Identity {
  name: String,
  description: String,
}
impl Identity {
  pub fn new(name: &str, description: &str) -> Self {
    Self {
      name: name.to_owned(),
      description: description.to_owned(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> &str {
    &self.description
  }
}

/// Access rights of a field, as named by IP-XACT.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Access {
  ReadOnly,
  ReadWrite,
  ReadWriteOnce,
  WriteOnce,
  WriteOnly,
  /// An access string the host reported that is not one of the standard values.
  Other(String),
}
impl Access {
  /// Reads a host access string. An empty string means the access is unspecified.
  pub fn new(access: &str) -> Option<Access> {
    let access = access.trim();
    match access {
      "" => None,
      "read-only" => Some(Access::ReadOnly),
      "read-write" => Some(Access::ReadWrite),
      "read-writeOnce" => Some(Access::ReadWriteOnce),
      "writeOnce" => Some(Access::WriteOnce),
      "write-only" => Some(Access::WriteOnly),
      other => Some(Access::Other(other.to_owned())),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Access::ReadOnly => "read-only",
      Access::ReadWrite => "read-write",
      Access::ReadWriteOnce => "read-writeOnce",
      Access::WriteOnce => "writeOnce",
      Access::WriteOnly => "write-only",
      Access::Other(s) => s,
    }
  }

  pub fn can_read(&self) -> bool {
    match self {
      Access::ReadOnly | Access::ReadWrite | Access::ReadWriteOnce => true,
      _ => false,
    }
  }

  pub fn can_write(&self) -> bool {
    match self {
      Access::ReadWrite | Access::ReadWriteOnce | Access::WriteOnce | Access::WriteOnly => true,
      _ => false,
    }
  }
}
impl fmt::Display for Access {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

static WHITESPACE: Lazy<std::result::Result<Regex, regex::Error>> =
  Lazy::new(|| Regex::new(r"\s+"));

/// Collapses runs of whitespace (including line breaks from XML text) into single spaces.
pub(crate) fn clean_whitespace(text: &str) -> Result<String> {
  let re = WHITESPACE.as_ref().map_err(Clone::clone)?;
  Ok(re.replace_all(text.trim(), " ").into_owned())
}
