use std::rc::Rc;

use log::warn;
use xmltree::{Element, XMLNode};

use crate::{
  clean_whitespace,
  error::{ErrorKind, IpxactTreeError, Result},
  expression,
  host::{
    AddressBlockCursor, FieldCursor, HostApi, MemoryMapCursor, ParameterCursor, PortCursor,
    RegisterCursor, ResetCursor, ScopePath, Scoped,
  },
  value::format_in_base,
};

/// Parameter references are followed at most this many levels deep.
const MAX_REFERENCE_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq)]
struct PortData {
  name: String,
  description: String,
  is_wire: bool,
  direction: String,
  left: String,
  right: String,
}

#[derive(Debug, Clone, PartialEq)]
struct ParameterData {
  id: String,
  name: String,
  description: String,
  type_name: String,
  value: String,
  left: String,
  right: String,
}

#[derive(Debug, Clone, PartialEq)]
struct ResetData {
  reset_type: String,
  value: String,
  mask: String,
}

#[derive(Debug, Clone, PartialEq)]
struct FieldData {
  name: String,
  description: String,
  bit_offset: String,
  bit_width: String,
  access: String,
  resets: Vec<ResetData>,
}

#[derive(Debug, Clone, PartialEq)]
struct RegisterData {
  name: String,
  description: String,
  offset: String,
  size: String,
  fields: Vec<FieldData>,
}

#[derive(Debug, Clone, PartialEq)]
struct BlockData {
  name: String,
  description: String,
  base_address: String,
  range: String,
  width: String,
  registers: Vec<RegisterData>,
}

#[derive(Debug, Clone, PartialEq)]
struct MapData {
  name: String,
  blocks: Vec<BlockData>,
}

/// An IP-XACT component document, read once.
#[derive(Debug, Clone, PartialEq)]
struct Document {
  name: String,
  description: String,
  ports: Vec<PortData>,
  parameters: Vec<ParameterData>,
  maps: Vec<MapData>,
}
impl Document {
  fn new(root: &Element) -> Result<Self> {
    if root.name != "component" {
      return Err(IpxactTreeError::new(
        ErrorKind::Xml,
        &format!("expected a component element, found '{}'", root.name),
      ));
    }

    let ports = match root.get_child("model").and_then(|m| m.get_child("ports")) {
      Some(ports) => children(ports, "port").map(read_port).collect::<Result<Vec<_>>>()?,
      None => Vec::new(),
    };

    let parameters = match root.get_child("parameters") {
      Some(params) => children(params, "parameter")
        .map(read_parameter)
        .collect::<Result<Vec<_>>>()?,
      None => Vec::new(),
    };

    let maps = match root.get_child("memoryMaps") {
      Some(maps) => children(maps, "memoryMap")
        .map(read_memory_map)
        .collect::<Result<Vec<_>>>()?,
      None => Vec::new(),
    };

    Ok(Self {
      name: text(root, "name"),
      description: description(root)?,
      ports,
      parameters,
      maps,
    })
  }

  /// Evaluates an expression over literals and parameters referenced by id or name.
  fn evaluate(&self, expression: &str, depth: usize) -> Option<i64> {
    let resolve = |name: &str| {
      if depth >= MAX_REFERENCE_DEPTH {
        return None;
      }
      self
        .parameters
        .iter()
        .find(|p| p.id == name || p.name == name)
        .and_then(|p| self.evaluate(&p.value, depth + 1))
    };
    expression::evaluate(expression, &resolve).ok()
  }

  /// The expression evaluated in `base`; expressions that cannot be evaluated come back as
  /// written.
  fn value(&self, expression: &str, base: u32) -> String {
    if expression.trim().is_empty() {
      return String::new();
    }
    match self.evaluate(expression, 0) {
      Some(v) => format_in_base(v, base),
      None => expression.trim().to_owned(),
    }
  }

  fn map(&self, path: &ScopePath) -> Option<&MapData> {
    let name = path.map_name()?;
    self.maps.iter().find(|m| m.name == name)
  }

  fn block(&self, path: &ScopePath) -> Option<&BlockData> {
    let name = path.block_name()?;
    self.map(path)?.blocks.iter().find(|b| b.name == name)
  }

  fn register(&self, path: &ScopePath) -> Option<&RegisterData> {
    let name = path.register_name()?;
    self.block(path)?.registers.iter().find(|r| r.name == name)
  }

  fn field(&self, path: &ScopePath) -> Option<&FieldData> {
    let name = path.field_name()?;
    self.register(path)?.fields.iter().find(|f| f.name == name)
  }
}

fn children<'a>(el: &'a Element, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
  el.children.iter().filter_map(move |n| match n {
    XMLNode::Element(e) if e.name == name => Some(e),
    _ => None,
  })
}

fn text(el: &Element, name: &str) -> String {
  el.get_child(name)
    .and_then(|c| c.get_text())
    .map(|t| t.trim().to_owned())
    .unwrap_or_default()
}

fn description(el: &Element) -> Result<String> {
  clean_whitespace(&text(el, "description"))
}

/// The first vector of `el`, from `vectors/vector` (2014 and later) or `vector` (2009).
fn vector_bounds(el: &Element) -> (String, String) {
  let vector = el
    .get_child("vectors")
    .and_then(|v| v.get_child("vector"))
    .or_else(|| el.get_child("vector"));
  match vector {
    Some(v) => (text(v, "left"), text(v, "right")),
    None => (String::new(), String::new()),
  }
}

fn read_port(el: &Element) -> Result<PortData> {
  let (is_wire, direction, left, right) = match el.get_child("wire") {
    Some(wire) => {
      let (left, right) = vector_bounds(wire);
      (true, text(wire, "direction"), left, right)
    }
    None => (false, String::new(), String::new(), String::new()),
  };

  Ok(PortData {
    name: text(el, "name"),
    description: description(el)?,
    is_wire,
    direction,
    left,
    right,
  })
}

fn read_parameter(el: &Element) -> Result<ParameterData> {
  let (left, right) = vector_bounds(el);
  Ok(ParameterData {
    id: el.attributes.get("parameterId").cloned().unwrap_or_default(),
    name: text(el, "name"),
    description: description(el)?,
    type_name: el.attributes.get("type").cloned().unwrap_or_default(),
    value: text(el, "value"),
    left,
    right,
  })
}

fn read_memory_map(el: &Element) -> Result<MapData> {
  Ok(MapData {
    name: text(el, "name"),
    blocks: children(el, "addressBlock")
      .map(read_address_block)
      .collect::<Result<Vec<_>>>()?,
  })
}

fn read_address_block(el: &Element) -> Result<BlockData> {
  Ok(BlockData {
    name: text(el, "name"),
    description: description(el)?,
    base_address: text(el, "baseAddress"),
    range: text(el, "range"),
    width: text(el, "width"),
    registers: children(el, "register")
      .map(read_register)
      .collect::<Result<Vec<_>>>()?,
  })
}

fn read_register(el: &Element) -> Result<RegisterData> {
  Ok(RegisterData {
    name: text(el, "name"),
    description: description(el)?,
    offset: text(el, "addressOffset"),
    size: text(el, "size"),
    fields: children(el, "field")
      .map(read_field)
      .collect::<Result<Vec<_>>>()?,
  })
}

fn read_field(el: &Element) -> Result<FieldData> {
  // 2022 documents move access into the first field access policy.
  let access = match el.get_child("access") {
    Some(_) => text(el, "access"),
    None => el
      .get_child("fieldAccessPolicies")
      .and_then(|p| p.get_child("fieldAccessPolicy"))
      .map(|p| text(p, "access"))
      .unwrap_or_default(),
  };

  let name = text(el, "name");

  // Resets are keyed by type; a repeated type would shadow the first one's values.
  let mut resets: Vec<ResetData> = Vec::new();
  if let Some(list) = el.get_child("resets") {
    for r in children(list, "reset") {
      let reset_type = r.attributes.get("resetTypeRef").cloned().unwrap_or_default();
      if resets.iter().any(|seen| seen.reset_type == reset_type) {
        warn!("field '{}' repeats reset type '{}'; keeping the first", name, reset_type);
        continue;
      }
      resets.push(ResetData {
        reset_type,
        value: text(r, "value"),
        mask: text(r, "mask"),
      });
    }
  }

  Ok(FieldData {
    name,
    description: description(el)?,
    bit_offset: text(el, "bitOffset"),
    bit_width: text(el, "bitWidth"),
    access,
    resets,
  })
}

fn unscoped(cursor: &str, parent: &str) -> IpxactTreeError {
  IpxactTreeError::new(
    ErrorKind::ScopeMismatch,
    &format!("{} cursor queried before being scoped to a {}", cursor, parent),
  )
}

fn check_scope(path: &ScopePath, depth: usize, exists: bool) -> Result<()> {
  if path.depth() != depth || !exists {
    return Err(
      IpxactTreeError::new(
        ErrorKind::ScopeMismatch,
        &format!("cannot scope to '{}'", path),
      )
      .with_path(path),
    );
  }
  Ok(())
}

struct XmlPorts {
  doc: Rc<Document>,
}
impl XmlPorts {
  fn port(&self, name: &str) -> Option<&PortData> {
    self.doc.ports.iter().find(|p| p.name == name)
  }
}
impl PortCursor for XmlPorts {
  fn item_names(&self) -> Result<Vec<String>> {
    Ok(self.doc.ports.iter().map(|p| p.name.clone()).collect())
  }

  fn description(&self, port: &str) -> Result<String> {
    Ok(self.port(port).map(|p| p.description.clone()).unwrap_or_default())
  }

  fn port_is_wire(&self, port: &str) -> Result<bool> {
    Ok(self.port(port).map_or(false, |p| p.is_wire))
  }

  fn width(&self, port: &str) -> Result<String> {
    let p = match self.port(port) {
      Some(p) => p,
      None => return Ok(String::new()),
    };
    if p.left.is_empty() && p.right.is_empty() {
      return Ok("1".to_owned());
    }
    match (self.doc.evaluate(&p.left, 0), self.doc.evaluate(&p.right, 0)) {
      (Some(l), Some(r)) => Ok(((i128::from(l) - i128::from(r)).abs() + 1).to_string()),
      _ => Ok(String::new()),
    }
  }

  fn direction(&self, port: &str) -> Result<String> {
    Ok(self.port(port).map(|p| p.direction.clone()).unwrap_or_default())
  }
}

struct XmlParameters {
  doc: Rc<Document>,
}
impl XmlParameters {
  fn parameter(&self, name: &str) -> Option<&ParameterData> {
    self.doc.parameters.iter().find(|p| p.name == name)
  }
}
impl ParameterCursor for XmlParameters {
  fn item_names(&self) -> Result<Vec<String>> {
    Ok(self.doc.parameters.iter().map(|p| p.name.clone()).collect())
  }

  fn description(&self, parameter: &str) -> Result<String> {
    Ok(
      self
        .parameter(parameter)
        .map(|p| p.description.clone())
        .unwrap_or_default(),
    )
  }

  fn type_name(&self, parameter: &str) -> Result<String> {
    Ok(
      self
        .parameter(parameter)
        .map(|p| p.type_name.clone())
        .unwrap_or_default(),
    )
  }

  fn left_value(&self, parameter: &str, base: u32) -> Result<String> {
    Ok(
      self
        .parameter(parameter)
        .map(|p| self.doc.value(&p.left, base))
        .unwrap_or_default(),
    )
  }

  fn right_value(&self, parameter: &str, base: u32) -> Result<String> {
    Ok(
      self
        .parameter(parameter)
        .map(|p| self.doc.value(&p.right, base))
        .unwrap_or_default(),
    )
  }

  fn value_formatted_expression(&self, parameter: &str) -> Result<String> {
    Ok(
      self
        .parameter(parameter)
        .map(|p| self.doc.value(&p.value, 10))
        .unwrap_or_default(),
    )
  }
}

struct XmlMemoryMaps {
  doc: Rc<Document>,
}
impl MemoryMapCursor for XmlMemoryMaps {
  fn item_names(&self) -> Result<Vec<String>> {
    Ok(self.doc.maps.iter().map(|m| m.name.clone()).collect())
  }
}

struct XmlAddressBlocks {
  doc: Rc<Document>,
  scope: Option<ScopePath>,
}
impl XmlAddressBlocks {
  fn blocks(&self) -> Result<&[BlockData]> {
    self
      .scope
      .as_ref()
      .and_then(|s| self.doc.map(s))
      .map(|m| m.blocks.as_slice())
      .ok_or_else(|| unscoped("address block", "memory map"))
  }

  fn with_block<F: Fn(&BlockData) -> String>(&self, name: &str, f: F) -> Result<String> {
    Ok(self.blocks()?.iter().find(|b| b.name == name).map(f).unwrap_or_default())
  }
}
impl Scoped for XmlAddressBlocks {
  fn scope_to(&mut self, path: &ScopePath) -> Result<()> {
    check_scope(path, 1, self.doc.map(path).is_some())?;
    self.scope = Some(path.clone());
    Ok(())
  }

  fn current_scope(&self) -> Option<ScopePath> {
    self.scope.clone()
  }
}
impl AddressBlockCursor for XmlAddressBlocks {
  fn item_names(&self) -> Result<Vec<String>> {
    Ok(self.blocks()?.iter().map(|b| b.name.clone()).collect())
  }

  fn description(&self, block: &str) -> Result<String> {
    self.with_block(block, |b| b.description.clone())
  }

  fn base_address_value(&self, block: &str, base: u32) -> Result<String> {
    self.with_block(block, |b| self.doc.value(&b.base_address, base))
  }

  fn range_value(&self, block: &str, base: u32) -> Result<String> {
    self.with_block(block, |b| self.doc.value(&b.range, base))
  }

  fn width_value(&self, block: &str, base: u32) -> Result<String> {
    self.with_block(block, |b| self.doc.value(&b.width, base))
  }
}

struct XmlRegisters {
  doc: Rc<Document>,
  scope: Option<ScopePath>,
}
impl XmlRegisters {
  fn registers(&self) -> Result<&[RegisterData]> {
    self
      .scope
      .as_ref()
      .and_then(|s| self.doc.block(s))
      .map(|b| b.registers.as_slice())
      .ok_or_else(|| unscoped("register", "address block"))
  }

  fn with_register<F: Fn(&RegisterData) -> String>(&self, name: &str, f: F) -> Result<String> {
    Ok(self.registers()?.iter().find(|r| r.name == name).map(f).unwrap_or_default())
  }
}
impl Scoped for XmlRegisters {
  fn scope_to(&mut self, path: &ScopePath) -> Result<()> {
    check_scope(path, 2, self.doc.block(path).is_some())?;
    self.scope = Some(path.clone());
    Ok(())
  }

  fn current_scope(&self) -> Option<ScopePath> {
    self.scope.clone()
  }
}
impl RegisterCursor for XmlRegisters {
  fn item_names(&self) -> Result<Vec<String>> {
    Ok(self.registers()?.iter().map(|r| r.name.clone()).collect())
  }

  fn description(&self, register: &str) -> Result<String> {
    self.with_register(register, |r| r.description.clone())
  }

  fn offset_value(&self, register: &str, base: u32) -> Result<String> {
    self.with_register(register, |r| self.doc.value(&r.offset, base))
  }

  fn size_value(&self, register: &str, base: u32) -> Result<String> {
    self.with_register(register, |r| self.doc.value(&r.size, base))
  }
}

struct XmlFields {
  doc: Rc<Document>,
  scope: Option<ScopePath>,
}
impl XmlFields {
  fn fields(&self) -> Result<&[FieldData]> {
    self
      .scope
      .as_ref()
      .and_then(|s| self.doc.register(s))
      .map(|r| r.fields.as_slice())
      .ok_or_else(|| unscoped("field", "register"))
  }

  fn with_field<F: Fn(&FieldData) -> String>(&self, name: &str, f: F) -> Result<String> {
    Ok(self.fields()?.iter().find(|fd| fd.name == name).map(f).unwrap_or_default())
  }
}
impl Scoped for XmlFields {
  fn scope_to(&mut self, path: &ScopePath) -> Result<()> {
    check_scope(path, 3, self.doc.register(path).is_some())?;
    self.scope = Some(path.clone());
    Ok(())
  }

  fn current_scope(&self) -> Option<ScopePath> {
    self.scope.clone()
  }
}
impl FieldCursor for XmlFields {
  fn item_names(&self) -> Result<Vec<String>> {
    Ok(self.fields()?.iter().map(|f| f.name.clone()).collect())
  }

  fn description(&self, field: &str) -> Result<String> {
    self.with_field(field, |f| f.description.clone())
  }

  fn offset_value(&self, field: &str, base: u32) -> Result<String> {
    self.with_field(field, |f| self.doc.value(&f.bit_offset, base))
  }

  fn width_value(&self, field: &str, base: u32) -> Result<String> {
    self.with_field(field, |f| self.doc.value(&f.bit_width, base))
  }

  fn access_string(&self, field: &str) -> Result<String> {
    self.with_field(field, |f| f.access.clone())
  }
}

struct XmlResets {
  doc: Rc<Document>,
  scope: Option<ScopePath>,
}
impl XmlResets {
  fn resets(&self) -> Result<&[ResetData]> {
    self
      .scope
      .as_ref()
      .and_then(|s| self.doc.field(s))
      .map(|f| f.resets.as_slice())
      .ok_or_else(|| unscoped("reset", "field"))
  }

  fn with_reset<F: Fn(&ResetData) -> String>(&self, reset_type: &str, f: F) -> Result<String> {
    Ok(
      self
        .resets()?
        .iter()
        .find(|r| r.reset_type == reset_type)
        .map(f)
        .unwrap_or_default(),
    )
  }
}
impl Scoped for XmlResets {
  fn scope_to(&mut self, path: &ScopePath) -> Result<()> {
    check_scope(path, 4, self.doc.field(path).is_some())?;
    self.scope = Some(path.clone());
    Ok(())
  }

  fn current_scope(&self) -> Option<ScopePath> {
    self.scope.clone()
  }
}
impl ResetCursor for XmlResets {
  fn item_names(&self) -> Result<Vec<String>> {
    Ok(self.resets()?.iter().map(|r| r.reset_type.clone()).collect())
  }

  fn reset_value(&self, reset_type: &str, base: u32) -> Result<String> {
    self.with_reset(reset_type, |r| self.doc.value(&r.value, base))
  }

  fn reset_mask_value(&self, reset_type: &str, base: u32) -> Result<String> {
    self.with_reset(reset_type, |r| self.doc.value(&r.mask, base))
  }
}

struct Cursors {
  doc: Rc<Document>,
  ports: XmlPorts,
  parameters: XmlParameters,
  maps: XmlMemoryMaps,
  blocks: XmlAddressBlocks,
  registers: XmlRegisters,
  fields: XmlFields,
  resets: XmlResets,
}
impl Cursors {
  fn new(doc: Document) -> Self {
    let doc = Rc::new(doc);
    Self {
      ports: XmlPorts { doc: doc.clone() },
      parameters: XmlParameters { doc: doc.clone() },
      maps: XmlMemoryMaps { doc: doc.clone() },
      blocks: XmlAddressBlocks {
        doc: doc.clone(),
        scope: None,
      },
      registers: XmlRegisters {
        doc: doc.clone(),
        scope: None,
      },
      fields: XmlFields {
        doc: doc.clone(),
        scope: None,
      },
      resets: XmlResets {
        doc: doc.clone(),
        scope: None,
      },
      doc,
    }
  }
}

/// A host backed by an IP-XACT component document (2009, 2014 or 2022 element names).
///
/// Values are evaluated the way the component editor evaluates them: literals, parameter
/// references, arithmetic, shifts, `$clog2` and `$pow` resolve to numbers; anything else is
/// returned as written. Resets are read from fields only, so the register-level resets of 2009
/// documents are not reported.
pub struct XmlHost {
  cursors: Option<Cursors>,
}
impl XmlHost {
  /// A host with no component open. Projection against it fails with `HostUnavailable`.
  pub fn empty() -> Self {
    Self { cursors: None }
  }

  pub fn from_xml(xml: &str) -> Result<Self> {
    Self::from_element(&Element::parse(xml.as_bytes())?)
  }

  pub fn from_element(root: &Element) -> Result<Self> {
    Ok(Self {
      cursors: Some(Cursors::new(Document::new(root)?)),
    })
  }
}
impl HostApi for XmlHost {
  fn is_available(&self) -> bool {
    self.cursors.is_some()
  }

  fn component_name(&self) -> Result<String> {
    match self.cursors {
      Some(ref c) => Ok(c.doc.name.clone()),
      None => Err(IpxactTreeError::new(
        ErrorKind::HostUnavailable,
        "no component open",
      )),
    }
  }

  fn component_description(&self) -> Result<String> {
    match self.cursors {
      Some(ref c) => Ok(c.doc.description.clone()),
      None => Err(IpxactTreeError::new(
        ErrorKind::HostUnavailable,
        "no component open",
      )),
    }
  }

  fn ports(&mut self) -> Option<&mut dyn PortCursor> {
    self.cursors.as_mut().map(|c| &mut c.ports as &mut dyn PortCursor)
  }

  fn parameters(&mut self) -> Option<&mut dyn ParameterCursor> {
    self
      .cursors
      .as_mut()
      .map(|c| &mut c.parameters as &mut dyn ParameterCursor)
  }

  fn memory_maps(&mut self) -> Option<&mut dyn MemoryMapCursor> {
    self.cursors.as_mut().map(|c| &mut c.maps as &mut dyn MemoryMapCursor)
  }

  fn address_blocks(&mut self) -> Option<&mut dyn AddressBlockCursor> {
    self
      .cursors
      .as_mut()
      .map(|c| &mut c.blocks as &mut dyn AddressBlockCursor)
  }

  fn registers(&mut self) -> Option<&mut dyn RegisterCursor> {
    self
      .cursors
      .as_mut()
      .map(|c| &mut c.registers as &mut dyn RegisterCursor)
  }

  fn fields(&mut self) -> Option<&mut dyn FieldCursor> {
    self.cursors.as_mut().map(|c| &mut c.fields as &mut dyn FieldCursor)
  }

  fn resets(&mut self) -> Option<&mut dyn ResetCursor> {
    self.cursors.as_mut().map(|c| &mut c.resets as &mut dyn ResetCursor)
  }
}

#[cfg(test)]
mod tests {
  use super::XmlHost;
  use crate::error::ErrorKind;
  use crate::host::{
    AddressBlockCursor, FieldCursor, HostApi, ParameterCursor, PortCursor, RegisterCursor,
    ResetCursor, ScopePath, Scoped,
  };

  const TIMER: &str = r##"
    <ipxact:component xmlns:ipxact="http://www.accellera.org/XMLSchema/IPXACT/1685-2014">
      <ipxact:vendor>tut.fi</ipxact:vendor>
      <ipxact:library>ip</ipxact:library>
      <ipxact:name>timer</ipxact:name>
      <ipxact:version>1.0</ipxact:version>
      <ipxact:description>
        A simple
        timer
      </ipxact:description>
      <ipxact:memoryMaps>
        <ipxact:memoryMap>
          <ipxact:name>regs</ipxact:name>
          <ipxact:addressBlock>
            <ipxact:name>AB</ipxact:name>
            <ipxact:baseAddress>'h1000</ipxact:baseAddress>
            <ipxact:range>DEPTH</ipxact:range>
            <ipxact:width>32</ipxact:width>
            <ipxact:register>
              <ipxact:name>CTRL</ipxact:name>
              <ipxact:addressOffset>4</ipxact:addressOffset>
              <ipxact:size>32</ipxact:size>
              <ipxact:field>
                <ipxact:name>EN</ipxact:name>
                <ipxact:bitOffset>0</ipxact:bitOffset>
                <ipxact:bitWidth>1</ipxact:bitWidth>
                <ipxact:access>read-write</ipxact:access>
                <ipxact:resets>
                  <ipxact:reset>
                    <ipxact:value>1'b1</ipxact:value>
                    <ipxact:mask>1'b1</ipxact:mask>
                  </ipxact:reset>
                </ipxact:resets>
              </ipxact:field>
            </ipxact:register>
          </ipxact:addressBlock>
        </ipxact:memoryMap>
      </ipxact:memoryMaps>
      <ipxact:model>
        <ipxact:ports>
          <ipxact:port>
            <ipxact:name>data</ipxact:name>
            <ipxact:wire>
              <ipxact:direction>out</ipxact:direction>
              <ipxact:vectors>
                <ipxact:vector>
                  <ipxact:left>WIDTH</ipxact:left>
                  <ipxact:right>0</ipxact:right>
                </ipxact:vector>
              </ipxact:vectors>
            </ipxact:wire>
          </ipxact:port>
        </ipxact:ports>
      </ipxact:model>
      <ipxact:parameters>
        <ipxact:parameter parameterId="uuid_depth" type="longint">
          <ipxact:name>DEPTH</ipxact:name>
          <ipxact:value>64</ipxact:value>
        </ipxact:parameter>
        <ipxact:parameter parameterId="uuid_width" type="longint">
          <ipxact:name>WIDTH</ipxact:name>
          <ipxact:value>uuid_depth</ipxact:value>
        </ipxact:parameter>
      </ipxact:parameters>
    </ipxact:component>
  "##;

  #[test]
  fn reads_component_identity() {
    let host = XmlHost::from_xml(TIMER).unwrap();
    assert!(host.is_available());
    assert_eq!("timer", host.component_name().unwrap());
    assert_eq!("A simple timer", host.component_description().unwrap());
  }

  #[test]
  fn evaluates_values_and_references() {
    let mut host = XmlHost::from_xml(TIMER).unwrap();
    let map = ScopePath::component().map("regs");
    let blocks = host.address_blocks().unwrap();
    blocks.scope_to(&map).unwrap();

    assert_eq!("4096", blocks.base_address_value("AB", 10).unwrap());
    assert_eq!("1000", blocks.base_address_value("AB", 16).unwrap());
    assert_eq!("64", blocks.range_value("AB", 10).unwrap());

    let params = host.parameters().unwrap();
    assert_eq!("64", params.value_formatted_expression("WIDTH").unwrap());
    assert_eq!("longint", params.type_name("WIDTH").unwrap());

    let ports = host.ports().unwrap();
    assert_eq!("65", ports.width("data").unwrap());
    assert_eq!("out", ports.direction("data").unwrap());
  }

  #[test]
  fn unscoped_queries_fail() {
    let mut host = XmlHost::from_xml(TIMER).unwrap();
    let err = host.registers().unwrap().item_names().unwrap_err();
    assert_eq!(ErrorKind::ScopeMismatch, err.kind);
  }

  #[test]
  fn scoping_to_a_missing_path_fails() {
    let mut host = XmlHost::from_xml(TIMER).unwrap();
    let path = ScopePath::component().map("regs").block("nope");
    let err = host.registers().unwrap().scope_to(&path).unwrap_err();
    assert_eq!(ErrorKind::ScopeMismatch, err.kind);
    assert_eq!(Some(path), err.path);
  }

  #[test]
  fn scoping_narrows_queries() {
    let mut host = XmlHost::from_xml(TIMER).unwrap();
    let register = ScopePath::component().map("regs").block("AB").register("CTRL");
    let fields = host.fields().unwrap();
    fields.scope_to(&register).unwrap();

    assert_eq!(vec!["EN".to_owned()], fields.item_names().unwrap());
    assert_eq!("read-write", fields.access_string("EN").unwrap());

    let resets = host.resets().unwrap();
    resets.scope_to(&register.field("EN")).unwrap();
    assert_eq!(vec![String::new()], resets.item_names().unwrap());
    assert_eq!("1", resets.reset_value("", 10).unwrap());
  }

  #[test]
  fn empty_host_is_unavailable() {
    let mut host = XmlHost::empty();
    assert!(!host.is_available());
    assert!(host.ports().is_none());
    assert_eq!(
      ErrorKind::HostUnavailable,
      host.component_name().unwrap_err().kind
    );
  }

  #[test]
  fn rejects_non_component_documents() {
    let err = XmlHost::from_xml("<ipxact:design xmlns:ipxact=\"x\"/>")
      .err()
      .unwrap();
    assert_eq!(ErrorKind::Xml, err.kind);
  }

  #[test]
  fn rejects_malformed_xml() {
    let err = XmlHost::from_xml("<component>").err().unwrap();
    assert_eq!(ErrorKind::Xml, err.kind);
  }

  const EXPRESSIONS: &str = r##"
    <ipxact:component xmlns:ipxact="http://www.accellera.org/XMLSchema/IPXACT/1685-2014">
      <ipxact:name>fifo</ipxact:name>
      <ipxact:memoryMaps>
        <ipxact:memoryMap>
          <ipxact:name>regs</ipxact:name>
          <ipxact:addressBlock>
            <ipxact:name>AB</ipxact:name>
            <ipxact:baseAddress>0</ipxact:baseAddress>
            <ipxact:range>(1 &lt;&lt; uuid_aw) * 4</ipxact:range>
            <ipxact:width>32</ipxact:width>
            <ipxact:register>
              <ipxact:name>LEVEL</ipxact:name>
              <ipxact:addressOffset>0</ipxact:addressOffset>
              <ipxact:size>32</ipxact:size>
              <ipxact:field>
                <ipxact:name>COUNT</ipxact:name>
                <ipxact:bitOffset>0</ipxact:bitOffset>
                <ipxact:bitWidth>$clog2(DEPTH) + 1</ipxact:bitWidth>
                <ipxact:resets>
                  <ipxact:reset resetTypeRef="SOFT">
                    <ipxact:value>1</ipxact:value>
                  </ipxact:reset>
                  <ipxact:reset resetTypeRef="SOFT">
                    <ipxact:value>2</ipxact:value>
                  </ipxact:reset>
                </ipxact:resets>
              </ipxact:field>
            </ipxact:register>
          </ipxact:addressBlock>
        </ipxact:memoryMap>
      </ipxact:memoryMaps>
      <ipxact:model>
        <ipxact:ports>
          <ipxact:port>
            <ipxact:name>data</ipxact:name>
            <ipxact:wire>
              <ipxact:direction>in</ipxact:direction>
              <ipxact:vectors>
                <ipxact:vector>
                  <ipxact:left>uuid_w-1</ipxact:left>
                  <ipxact:right>0</ipxact:right>
                </ipxact:vector>
              </ipxact:vectors>
            </ipxact:wire>
          </ipxact:port>
        </ipxact:ports>
      </ipxact:model>
      <ipxact:parameters>
        <ipxact:parameter parameterId="uuid_w" type="int">
          <ipxact:name>WIDTH</ipxact:name>
          <ipxact:value>16</ipxact:value>
          <ipxact:vectors>
            <ipxact:vector>
              <ipxact:left>WIDTH-1</ipxact:left>
              <ipxact:right>0</ipxact:right>
            </ipxact:vector>
          </ipxact:vectors>
        </ipxact:parameter>
        <ipxact:parameter parameterId="uuid_depth" type="int">
          <ipxact:name>DEPTH</ipxact:name>
          <ipxact:value>uuid_w * 2</ipxact:value>
        </ipxact:parameter>
        <ipxact:parameter parameterId="uuid_aw" type="int">
          <ipxact:name>ADDR_BITS</ipxact:name>
          <ipxact:value>$clog2(uuid_depth)</ipxact:value>
        </ipxact:parameter>
      </ipxact:parameters>
    </ipxact:component>
  "##;

  #[test]
  fn evaluates_expressions_over_parameters() {
    let mut host = XmlHost::from_xml(EXPRESSIONS).unwrap();

    let ports = host.ports().unwrap();
    assert_eq!("16", ports.width("data").unwrap());

    let params = host.parameters().unwrap();
    assert_eq!("15", params.left_value("WIDTH", 10).unwrap());
    assert_eq!("32", params.value_formatted_expression("DEPTH").unwrap());
    assert_eq!("5", params.value_formatted_expression("ADDR_BITS").unwrap());

    let blocks = host.address_blocks().unwrap();
    blocks.scope_to(&ScopePath::component().map("regs")).unwrap();
    assert_eq!("128", blocks.range_value("AB", 10).unwrap());
    assert_eq!("80", blocks.range_value("AB", 16).unwrap());

    let fields = host.fields().unwrap();
    fields
      .scope_to(&ScopePath::component().map("regs").block("AB").register("LEVEL"))
      .unwrap();
    assert_eq!("6", fields.width_value("COUNT", 10).unwrap());
  }

  #[test]
  fn unevaluable_expressions_are_returned_as_written() {
    let xml = EXPRESSIONS.replace("$clog2(uuid_depth)", "$sqrt(uuid_depth)");
    let mut host = XmlHost::from_xml(&xml).unwrap();
    let params = host.parameters().unwrap();
    assert_eq!(
      "$sqrt(uuid_depth)",
      params.value_formatted_expression("ADDR_BITS").unwrap()
    );
  }

  #[test]
  fn repeated_reset_types_keep_the_first() {
    let mut host = XmlHost::from_xml(EXPRESSIONS).unwrap();
    let field = ScopePath::component()
      .map("regs")
      .block("AB")
      .register("LEVEL")
      .field("COUNT");
    let resets = host.resets().unwrap();
    resets.scope_to(&field).unwrap();

    assert_eq!(vec!["SOFT".to_owned()], resets.item_names().unwrap());
    assert_eq!("1", resets.reset_value("SOFT", 10).unwrap());
  }
}
