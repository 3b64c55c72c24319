use crate::{
  error::{ErrorKind, IpxactTreeError, Result},
  node::Node,
  Access, Identity,
};

/// Reset type recorded for resets whose host type name is empty.
pub const DEFAULT_RESET_TYPE: &str = "HARD";

/// A reset value of a field. The host keys resets by their type, so resets carry no name or
/// description of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct Reset {
  identity: Identity,
  reset_type: String,
  value: u64,
  mask: u64,
}
impl Reset {
  /// An empty `reset_type` is recorded as `HARD`.
  pub fn new(reset_type: &str, value: u64, mask: u64) -> Self {
    Self::with_default_type(reset_type, DEFAULT_RESET_TYPE, value, mask)
  }

  /// An empty `reset_type` is recorded as `default_type`.
  pub fn with_default_type(reset_type: &str, default_type: &str, value: u64, mask: u64) -> Self {
    let reset_type = match reset_type.trim() {
      "" => default_type,
      t => t,
    };
    Self {
      identity: Identity::default(),
      reset_type: reset_type.to_owned(),
      value,
      mask,
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

  pub fn reset_type(&self) -> &str {
    &self.reset_type
  }

  /// The value of the field after a reset of this type.
  pub fn value(&self) -> u64 {
    self.value
  }

  /// The bits of the field that have a defined value after a reset of this type.
  pub fn mask(&self) -> u64 {
    self.mask
  }
}

/// Describes a field on a register.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
  identity: Identity,
  bit_offset: u32,
  bit_width: u32,
  access: Option<Access>,
  resets: Vec<Reset>,
}
impl Field {
  pub fn new(identity: Identity, bit_offset: u32, bit_width: u32, access: Option<Access>) -> Self {
    Self {
      identity,
      bit_offset,
      bit_width,
      access,
      resets: Vec::new(),
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

  /// The position of the least-significant bit of this field within its register.
  pub fn bit_offset(&self) -> u32 {
    self.bit_offset
  }

  /// The bit width of the field.
  pub fn bit_width(&self) -> u32 {
    self.bit_width
  }

  /// The access rights to the field, if the host specified any.
  pub fn access(&self) -> Option<&Access> {
    self.access.as_ref()
  }

  /// Resets in the order the host listed them.
  pub fn resets(&self) -> &[Reset] {
    &self.resets
  }

  /// Finds the reset whose type is exactly `reset_type`.
  pub fn reset_by_type(&self, reset_type: &str) -> Option<&Reset> {
    self.resets.iter().find(|r| r.reset_type == reset_type)
  }

  /// Whether this field is readable. Fields without access rights are read-write.
  pub fn can_read(&self) -> bool {
    match self.access {
      Some(ref a) => a.can_read(),
      None => true,
    }
  }

  /// Whether this field is writable. Fields without access rights are read-write.
  pub fn can_write(&self) -> bool {
    match self.access {
      Some(ref a) => a.can_write(),
      None => true,
    }
  }

  /// The bit mask for reading/writing this field on the parent register
  pub fn mask(&self) -> u64 {
    if self.bit_width == 0 || self.bit_offset >= 64 {
      return 0;
    }
    let width_mask = match self.bit_width {
      w if w >= 64 => u64::MAX,
      w => (1u64 << w) - 1,
    };
    width_mask << self.bit_offset
  }

  pub fn add_reset(&mut self, reset: Reset) {
    self.resets.push(reset);
  }

  /// Attaches a child node. Only resets can be attached to a field.
  pub fn attach(&mut self, node: Node) -> Result<()> {
    match node {
      Node::Reset(r) => {
        self.add_reset(r);
        Ok(())
      }
      other => Err(IpxactTreeError::new(
        ErrorKind::TypeMismatch,
        &format!(
          "cannot attach {} to field '{}'; expected Reset",
          other.kind(),
          self.name()
        ),
      )),
    }
  }
}
