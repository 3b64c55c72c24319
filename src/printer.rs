use crate::{config::PrintOptions, node::NodeRef, Component};

/// Dumps the tree depth-first, pre-order: each entity line is followed by its attributes and
/// then its children in insertion order. The output depends only on the tree.
pub fn print_tree(component: &Component) -> Vec<String> {
  print_tree_with(component, &PrintOptions::default())
}

pub fn print_tree_with(component: &Component, options: &PrintOptions) -> Vec<String> {
  let mut lines = Vec::new();
  print_node(NodeRef::from(component), 0, options.indent, &mut lines);
  lines
}

fn print_node(node: NodeRef, depth: usize, indent: usize, lines: &mut Vec<String>) {
  let pad = " ".repeat(depth * indent);
  let attr_pad = " ".repeat((depth + 1) * indent);
  let identity = node.identity();

  lines.push(entry(&pad, node.kind(), identity.name()));
  lines.push(entry(&attr_pad, "description", identity.description()));
  for (key, value) in node.attributes() {
    lines.push(entry(&attr_pad, key, &value));
  }

  for child in node.children() {
    print_node(child, depth + 1, indent, lines);
  }
}

fn entry(pad: &str, key: &str, value: &str) -> String {
  if value.is_empty() {
    format!("{}{}:", pad, key)
  } else {
    format!("{}{}: {}", pad, key, value)
  }
}

#[cfg(test)]
mod tests {
  use super::{print_tree, print_tree_with};
  use crate::{
    AddressBlock, Component, Direction, Field, Identity, Access, PrintOptions, Port, Register,
    Reset,
  };

  fn sample() -> Component {
    let mut c = Component::new(Identity::new("timer", "Simple timer"));
    c.add_port(Port::new(Identity::new("clk", "Clock"), "", 1, Some(Direction::In)));

    let mut f = Field::new(Identity::new("EN", ""), 0, 1, Some(Access::ReadWrite));
    f.add_reset(Reset::new("", 0, 1));
    let mut r = Register::new(Identity::new("CTRL", ""), 0, 32);
    r.add_field(f);
    let mut ab = AddressBlock::new(Identity::new("regs", ""), 0, 16, 32);
    ab.add_register(r);
    c.add_address_block(ab);
    c
  }

  #[test]
  fn prints_pre_order() {
    let expected = vec![
      "Component: timer",
      "  description: Simple timer",
      "  Port: clk",
      "    description: Clock",
      "    dataType:",
      "    bitWidth: 1",
      "    direction: in",
      "  AddressBlock: regs",
      "    description:",
      "    baseAddress: 0",
      "    range: 16",
      "    width: 32",
      "    Register: CTRL",
      "      description:",
      "      addressOffset: 0",
      "      size: 32",
      "      Field: EN",
      "        description:",
      "        bitOffset: 0",
      "        bitWidth: 1",
      "        access: read-write",
      "        Reset:",
      "          description:",
      "          resetType: HARD",
      "          value: 0",
      "          mask: 1",
    ];

    assert_eq!(expected, print_tree(&sample()));
  }

  #[test]
  fn printing_is_reproducible() {
    let c = sample();
    assert_eq!(print_tree(&c).join("\n"), print_tree(&c).join("\n"));
    assert_eq!(c.to_string(), format!("{}\n", print_tree(&c).join("\n")));
  }

  #[test]
  fn custom_indent() {
    let lines = print_tree_with(&sample(), &PrintOptions { indent: 4 });
    assert_eq!("    description: Simple timer", lines[1]);
    assert_eq!("    Port: clk", lines[2]);
  }
}
