use std::fmt;

use crate::Identity;

/// Direction of a wire port.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
  In,
  Out,
  InOut,
}
impl Direction {
  /// Reads a host direction string. Returns `None` for anything other than `in`, `out` or
  /// `inout`.
  pub fn new(direction: &str) -> Option<Direction> {
    match direction.trim().to_ascii_lowercase().as_str() {
      "in" => Some(Direction::In),
      "out" => Some(Direction::Out),
      "inout" => Some(Direction::InOut),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Direction::In => "in",
      Direction::Out => "out",
      Direction::InOut => "inout",
    }
  }
}
impl fmt::Display for Direction {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// A wire port on a component.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
  identity: Identity,
  data_type: String,
  bit_width: u32,
  direction: Option<Direction>,
}
impl Port {
  pub fn new(
    identity: Identity,
    data_type: &str,
    bit_width: u32,
    direction: Option<Direction>,
  ) -> Self {
    Self {
      identity,
      data_type: data_type.to_owned(),
      bit_width,
      direction,
    }
  }

  pub fn name(&self) -> &str {
    self.identity.name()
  }

  pub fn description(&self) -> &str {
    self.identity.description()
  }

  pub fn identity(&self) -> &Identity {
    &self.identity
  }

  /// Data type of the port. The component editor's port interface does not expose one, so
  /// projected ports always carry an empty string.
  pub fn data_type(&self) -> &str {
    &self.data_type
  }

  pub fn bit_width(&self) -> u32 {
    self.bit_width
  }

  /// `None` when the host reported a direction outside `in`/`out`/`inout`.
  pub fn direction(&self) -> Option<Direction> {
    self.direction
  }
}

#[cfg(test)]
mod tests {
  use super::Direction;

  #[test]
  fn reads_directions() {
    assert_eq!(Some(Direction::In), Direction::new("in"));
    assert_eq!(Some(Direction::InOut), Direction::new("INOUT"));
    assert_eq!(None, Direction::new("phantom"));
    assert_eq!(None, Direction::new(""));
    assert_eq!("out", Direction::Out.to_string());
  }
}
