use crate::{
  AddressBlock, Component, Field, Identity, Parameter, Port, Register, Reset,
};

/// An owned entity of any kind, used where a child is attached without its type being known
/// statically. Parents reject variants they cannot own.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
  Component(Component),
  Port(Port),
  Parameter(Parameter),
  AddressBlock(AddressBlock),
  Register(Register),
  Field(Field),
  Reset(Reset),
}
impl Node {
  pub fn kind(&self) -> &'static str {
    self.as_node_ref().kind()
  }

  pub fn as_node_ref(&self) -> NodeRef {
    match self {
      Node::Component(c) => NodeRef::Component(c),
      Node::Port(p) => NodeRef::Port(p),
      Node::Parameter(p) => NodeRef::Parameter(p),
      Node::AddressBlock(b) => NodeRef::AddressBlock(b),
      Node::Register(r) => NodeRef::Register(r),
      Node::Field(f) => NodeRef::Field(f),
      Node::Reset(r) => NodeRef::Reset(r),
    }
  }
}

/// A borrowed entity of any kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
  Component(&'a Component),
  Port(&'a Port),
  Parameter(&'a Parameter),
  AddressBlock(&'a AddressBlock),
  Register(&'a Register),
  Field(&'a Field),
  Reset(&'a Reset),
}
impl<'a> NodeRef<'a> {
  pub fn kind(&self) -> &'static str {
    match self {
      NodeRef::Component(_) => "Component",
      NodeRef::Port(_) => "Port",
      NodeRef::Parameter(_) => "Parameter",
      NodeRef::AddressBlock(_) => "AddressBlock",
      NodeRef::Register(_) => "Register",
      NodeRef::Field(_) => "Field",
      NodeRef::Reset(_) => "Reset",
    }
  }

  pub fn identity(&self) -> &'a Identity {
    match *self {
      NodeRef::Component(c) => c.identity(),
      NodeRef::Port(p) => p.identity(),
      NodeRef::Parameter(p) => p.identity(),
      NodeRef::AddressBlock(b) => b.identity(),
      NodeRef::Register(r) => r.identity(),
      NodeRef::Field(f) => f.identity(),
      NodeRef::Reset(r) => r.identity(),
    }
  }

  /// Attributes beyond name and description, in a fixed order.
  pub fn attributes(&self) -> Vec<(&'static str, String)> {
    match *self {
      NodeRef::Component(_) => Vec::new(),
      NodeRef::Port(p) => vec![
        ("dataType", p.data_type().to_owned()),
        ("bitWidth", p.bit_width().to_string()),
        (
          "direction",
          p.direction().map_or(String::new(), |d| d.to_string()),
        ),
      ],
      NodeRef::Parameter(p) => vec![
        ("dataType", p.data_type().to_owned()),
        ("bitWidth", p.bit_width().to_string()),
        ("value", p.value().to_owned()),
      ],
      NodeRef::AddressBlock(b) => vec![
        ("baseAddress", b.base_address().to_string()),
        ("range", b.range().to_string()),
        ("width", b.width().to_string()),
      ],
      NodeRef::Register(r) => vec![
        ("addressOffset", r.address_offset().to_string()),
        ("size", r.size().to_string()),
      ],
      NodeRef::Field(f) => vec![
        ("bitOffset", f.bit_offset().to_string()),
        ("bitWidth", f.bit_width().to_string()),
        (
          "access",
          f.access().map_or(String::new(), |a| a.to_string()),
        ),
      ],
      NodeRef::Reset(r) => vec![
        ("resetType", r.reset_type().to_owned()),
        ("value", r.value().to_string()),
        ("mask", r.mask().to_string()),
      ],
    }
  }

  /// Direct children in insertion order.
  pub fn children(&self) -> Vec<NodeRef<'a>> {
    match *self {
      NodeRef::Component(c) => c
        .ports()
        .iter()
        .map(NodeRef::Port)
        .chain(c.parameters().iter().map(NodeRef::Parameter))
        .chain(c.memory_maps().iter().map(NodeRef::AddressBlock))
        .collect(),
      NodeRef::AddressBlock(b) => b.registers().iter().map(NodeRef::Register).collect(),
      NodeRef::Register(r) => r.fields().iter().map(NodeRef::Field).collect(),
      NodeRef::Field(f) => f.resets().iter().map(NodeRef::Reset).collect(),
      NodeRef::Port(_) | NodeRef::Parameter(_) | NodeRef::Reset(_) => Vec::new(),
    }
  }
}
impl<'a> From<&'a Component> for NodeRef<'a> {
  fn from(c: &'a Component) -> Self {
    NodeRef::Component(c)
  }
}

macro_rules! node_from {
  ($($variant:ident),*) => {
    $(
      impl From<$variant> for Node {
        fn from(v: $variant) -> Self {
          Node::$variant(v)
        }
      }
    )*
  };
}
node_from!(Component, Port, Parameter, AddressBlock, Register, Field, Reset);
