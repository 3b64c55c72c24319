use super::field::Field;
use crate::{
  error::{ErrorKind, IpxactTreeError, Result},
  node::Node,
  AddressBlock, Identity,
};

/// Describes a register within an address block.
#[derive(Debug, Clone, PartialEq)]
pub struct Register {
  identity: Identity,
  address_offset: u64,
  size: u32,
  fields: Vec<Field>,
}
impl Register {
  pub fn new(identity: Identity, address_offset: u64, size: u32) -> Self {
    Self {
      identity,
      address_offset,
      size,
      fields: Vec::new(),
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

  /// Register's starting address relative to its address block.
  pub fn address_offset(&self) -> u64 {
    self.address_offset
  }

  /// The bit width of the register.
  pub fn size(&self) -> u32 {
    self.size
  }

  /// The fields that exist on the register, in host order.
  pub fn fields(&self) -> &[Field] {
    &self.fields
  }

  pub fn find_field(&self, name: &str) -> Option<&Field> {
    self.fields.iter().find(|f| f.name() == name)
  }

  /// The memory address of this register when it sits in `block`.
  pub fn address(&self, block: &AddressBlock) -> u64 {
    block.base_address() + self.address_offset
  }

  pub fn add_field(&mut self, field: Field) {
    self.fields.push(field);
  }

  /// Attaches a child node. Only fields can be attached to a register.
  pub fn attach(&mut self, node: Node) -> Result<()> {
    match node {
      Node::Field(f) => {
        self.add_field(f);
        Ok(())
      }
      other => Err(IpxactTreeError::new(
        ErrorKind::TypeMismatch,
        &format!(
          "cannot attach {} to register '{}'; expected Field",
          other.kind(),
          self.name()
        ),
      )),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::Register;
  use crate::{error::ErrorKind, AddressBlock, Direction, Field, Identity, Node, Port};

  #[test]
  fn port_is_rejected_and_fields_unchanged() {
    let mut r = Register::new(Identity::new("REG", ""), 4, 32);
    r.add_field(Field::new(Identity::new("F", ""), 0, 1, None));

    let port = Port::new(Identity::new("clk", ""), "", 1, Some(Direction::In));
    let err = r.attach(Node::Port(port)).unwrap_err();

    assert_eq!(ErrorKind::TypeMismatch, err.kind);
    assert!(err.details.contains("Port"));
    assert_eq!(1, r.fields().len());
    assert_eq!("F", r.fields()[0].name());
  }

  #[test]
  fn attach_keeps_insertion_order() {
    let mut r = Register::new(Identity::new("REG", ""), 0, 32);
    for name in &["A", "B", "C"] {
      r.attach(Node::Field(Field::new(Identity::new(name, ""), 0, 1, None)))
        .unwrap();
    }

    let names: Vec<&str> = r.fields().iter().map(|f| f.name()).collect();
    assert_eq!(vec!["A", "B", "C"], names);
    assert_eq!("B", r.find_field("B").unwrap().name());
    assert!(r.find_field("D").is_none());
  }

  #[test]
  fn address_adds_block_base() {
    let block = AddressBlock::new(Identity::new("AB", ""), 0x4000_0000, 0x100, 32);
    let r = Register::new(Identity::new("REG", ""), 0x10, 32);
    assert_eq!(0x4000_0010, r.address(&block));
  }
}
