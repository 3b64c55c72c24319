use std::fmt;

use super::{address_block::AddressBlock, parameter::Parameter, port::Port, register::Register};
use crate::{
  error::{ErrorKind, IpxactTreeError, Result},
  node::Node,
  printer::print_tree,
  Field, Identity,
};

/// The root of a projected tree. Owns its ports, parameters and address blocks exclusively.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
  identity: Identity,
  ports: Vec<Port>,
  parameters: Vec<Parameter>,
  memory_maps: Vec<AddressBlock>,
}
impl Component {
  pub fn new(identity: Identity) -> Self {
    Self {
      identity,
      ports: Vec::new(),
      parameters: Vec::new(),
      memory_maps: Vec::new(),
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

  /// Wire ports, in host order.
  pub fn ports(&self) -> &[Port] {
    &self.ports
  }

  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  /// Address blocks of every memory map, flattened in map order and then block order.
  pub fn memory_maps(&self) -> &[AddressBlock] {
    &self.memory_maps
  }

  pub fn find_address_block(&self, name: &str) -> Option<&AddressBlock> {
    self.memory_maps.iter().find(|b| b.name() == name)
  }

  /// Iterates every register of every address block.
  pub fn iter_registers(&self) -> impl Iterator<Item = &Register> {
    self.memory_maps.iter().flat_map(|b| b.registers().iter())
  }

  /// Iterates every field of every register.
  pub fn iter_fields(&self) -> impl Iterator<Item = &Field> {
    self.memory_maps.iter().flat_map(|b| b.iter_fields())
  }

  pub fn add_port(&mut self, port: Port) {
    self.ports.push(port);
  }

  pub fn add_parameter(&mut self, parameter: Parameter) {
    self.parameters.push(parameter);
  }

  pub fn add_address_block(&mut self, block: AddressBlock) {
    self.memory_maps.push(block);
  }

  /// Attaches a port, parameter or address block.
  pub fn attach(&mut self, node: Node) -> Result<()> {
    match node {
      Node::Port(p) => self.add_port(p),
      Node::Parameter(p) => self.add_parameter(p),
      Node::AddressBlock(b) => self.add_address_block(b),
      other => {
        return Err(IpxactTreeError::new(
          ErrorKind::TypeMismatch,
          &format!(
            "cannot attach {} to component '{}'; expected Port, Parameter or AddressBlock",
            other.kind(),
            self.name()
          ),
        ))
      }
    }
    Ok(())
  }
}
impl fmt::Display for Component {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for line in print_tree(self) {
      writeln!(f, "{}", line)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::Component;
  use crate::{
    error::ErrorKind, AddressBlock, Direction, Field, Identity, Node, Parameter, Port, Register,
  };

  #[test]
  fn attaches_top_level_children() {
    let mut c = Component::new(Identity::new("timer", "A timer"));
    c.attach(Node::Port(Port::new(
      Identity::new("clk", ""),
      "",
      1,
      Some(Direction::In),
    )))
    .unwrap();
    c.attach(Node::Parameter(Parameter::new(
      Identity::new("W", ""),
      "int",
      0,
      0,
      "8",
    )))
    .unwrap();
    c.attach(Node::AddressBlock(AddressBlock::new(
      Identity::new("AB", ""),
      0,
      32,
      32,
    )))
    .unwrap();

    assert_eq!(1, c.ports().len());
    assert_eq!(1, c.parameters().len());
    assert_eq!(1, c.memory_maps().len());
  }

  #[test]
  fn rejects_fields() {
    let mut c = Component::new(Identity::new("timer", ""));
    let err = c
      .attach(Node::Field(Field::new(Identity::new("F", ""), 0, 1, None)))
      .unwrap_err();
    assert_eq!(ErrorKind::TypeMismatch, err.kind);
    assert!(c.memory_maps().is_empty());
  }

  #[test]
  fn iterates_registers_and_fields() {
    let mut c = Component::new(Identity::new("timer", ""));
    for (block, reg) in &[("A", "R0"), ("B", "R1")] {
      let mut ab = AddressBlock::new(Identity::new(block, ""), 0, 32, 32);
      let mut r = Register::new(Identity::new(reg, ""), 0, 32);
      r.add_field(Field::new(Identity::new("EN", ""), 0, 1, None));
      ab.add_register(r);
      c.add_address_block(ab);
    }

    let regs: Vec<&str> = c.iter_registers().map(|r| r.name()).collect();
    assert_eq!(vec!["R0", "R1"], regs);
    assert_eq!(2, c.iter_fields().count());
    assert!(c.find_address_block("B").is_some());
    assert!(c.find_address_block("C").is_none());
  }
}
