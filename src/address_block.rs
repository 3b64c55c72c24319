use super::register::Register;
use crate::{
  error::{ErrorKind, IpxactTreeError, Result},
  node::Node,
  Field, Identity,
};

/// A contiguous region of register-addressable memory within a memory map.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressBlock {
  identity: Identity,
  base_address: u64,
  range: u64,
  width: u32,
  registers: Vec<Register>,
}
impl AddressBlock {
  pub fn new(identity: Identity, base_address: u64, range: u64, width: u32) -> Self {
    Self {
      identity,
      base_address,
      range,
      width,
      registers: Vec::new(),
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

  /// Start address of the block within its memory map.
  pub fn base_address(&self) -> u64 {
    self.base_address
  }

  /// Number of addressable units covered by the block.
  pub fn range(&self) -> u64 {
    self.range
  }

  /// Bit width of a row in the block.
  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn registers(&self) -> &[Register] {
    &self.registers
  }

  pub fn find_register(&self, name: &str) -> Option<&Register> {
    self.registers.iter().find(|r| r.name() == name)
  }

  /// Iterates the fields of every register in the block.
  pub fn iter_fields(&self) -> impl Iterator<Item = &Field> {
    self.registers.iter().flat_map(|r| r.fields().iter())
  }

  pub fn add_register(&mut self, register: Register) {
    self.registers.push(register);
  }

  /// Attaches a child node. Only registers can be attached to an address block.
  pub fn attach(&mut self, node: Node) -> Result<()> {
    match node {
      Node::Register(r) => {
        self.add_register(r);
        Ok(())
      }
      other => Err(IpxactTreeError::new(
        ErrorKind::TypeMismatch,
        &format!(
          "cannot attach {} to address block '{}'; expected Register",
          other.kind(),
          self.name()
        ),
      )),
    }
  }
}
