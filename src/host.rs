//! The cursor interfaces a component editor host exposes, and an adapter that scopes them
//! explicitly.
//!
//! Host cursors hold a "current scope": the address block cursor only answers for the blocks of
//! the memory map it was last scoped to, the register cursor for one block, and so on. Queries
//! against a cursor that was never scoped, or scoped elsewhere, are `ScopeMismatch` errors.
//! `ScopedHost` takes an explicit `ScopePath` for every read and performs the scoping call
//! itself right before querying, so scoping and querying never drift apart.

use std::fmt;

use crate::error::{ErrorKind, IpxactTreeError, Result};

/// A position in the memory map hierarchy. The empty path is the component itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct ScopePath {
  map: Option<String>,
  block: Option<String>,
  register: Option<String>,
  field: Option<String>,
}
impl ScopePath {
  pub fn component() -> Self {
    Self::default()
  }

  pub fn map(&self, name: &str) -> Self {
    Self {
      map: Some(name.to_owned()),
      ..Self::default()
    }
  }

  pub fn block(&self, name: &str) -> Self {
    Self {
      block: Some(name.to_owned()),
      register: None,
      field: None,
      ..self.clone()
    }
  }

  pub fn register(&self, name: &str) -> Self {
    Self {
      register: Some(name.to_owned()),
      field: None,
      ..self.clone()
    }
  }

  pub fn field(&self, name: &str) -> Self {
    Self {
      field: Some(name.to_owned()),
      ..self.clone()
    }
  }

  pub fn map_name(&self) -> Option<&str> {
    self.map.as_deref()
  }

  pub fn block_name(&self) -> Option<&str> {
    self.block.as_deref()
  }

  pub fn register_name(&self) -> Option<&str> {
    self.register.as_deref()
  }

  pub fn field_name(&self) -> Option<&str> {
    self.field.as_deref()
  }

  pub fn is_component(&self) -> bool {
    self.map.is_none()
  }

  /// Number of named levels below the component.
  pub fn depth(&self) -> usize {
    [&self.map, &self.block, &self.register, &self.field]
      .iter()
      .take_while(|p| p.is_some())
      .count()
  }
}
impl fmt::Display for ScopePath {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let parts: Vec<&str> = [&self.map, &self.block, &self.register, &self.field]
      .iter()
      .filter_map(|p| p.as_deref())
      .collect();
    write!(f, "{}", parts.join("."))
  }
}

/// Cursor state shared by every level below the memory map.
pub trait Scoped {
  /// Narrows subsequent queries to the children of `path`.
  fn scope_to(&mut self, path: &ScopePath) -> Result<()>;

  /// The path the cursor is currently scoped to, if any.
  fn current_scope(&self) -> Option<ScopePath>;
}

/// Ports of the component.
pub trait PortCursor {
  fn item_names(&self) -> Result<Vec<String>>;
  fn description(&self, port: &str) -> Result<String>;

  /// False for transactional and other non-wire ports.
  fn port_is_wire(&self, port: &str) -> Result<bool>;
  fn width(&self, port: &str) -> Result<String>;
  fn direction(&self, port: &str) -> Result<String>;
}

/// Parameters of the component.
pub trait ParameterCursor {
  fn item_names(&self) -> Result<Vec<String>>;
  fn description(&self, parameter: &str) -> Result<String>;
  fn type_name(&self, parameter: &str) -> Result<String>;

  /// Left vector bound evaluated in `base`. Empty when the parameter has no vector.
  fn left_value(&self, parameter: &str, base: u32) -> Result<String>;

  /// Right vector bound evaluated in `base`. Empty when the parameter has no vector.
  fn right_value(&self, parameter: &str, base: u32) -> Result<String>;

  /// The value with references resolved.
  fn value_formatted_expression(&self, parameter: &str) -> Result<String>;
}

/// Memory maps of the component.
pub trait MemoryMapCursor {
  fn item_names(&self) -> Result<Vec<String>>;
}

/// Address blocks, scoped to one memory map.
pub trait AddressBlockCursor: Scoped {
  fn item_names(&self) -> Result<Vec<String>>;
  fn description(&self, block: &str) -> Result<String>;
  fn base_address_value(&self, block: &str, base: u32) -> Result<String>;
  fn range_value(&self, block: &str, base: u32) -> Result<String>;
  fn width_value(&self, block: &str, base: u32) -> Result<String>;
}

/// Registers, scoped to one address block.
pub trait RegisterCursor: Scoped {
  fn item_names(&self) -> Result<Vec<String>>;
  fn description(&self, register: &str) -> Result<String>;
  fn offset_value(&self, register: &str, base: u32) -> Result<String>;
  fn size_value(&self, register: &str, base: u32) -> Result<String>;
}

/// Fields, scoped to one register.
pub trait FieldCursor: Scoped {
  fn item_names(&self) -> Result<Vec<String>>;
  fn description(&self, field: &str) -> Result<String>;
  fn offset_value(&self, field: &str, base: u32) -> Result<String>;
  fn width_value(&self, field: &str, base: u32) -> Result<String>;
  fn access_string(&self, field: &str) -> Result<String>;
}

/// Resets, scoped to one field. Resets are keyed by their reset type name, which may be empty.
pub trait ResetCursor: Scoped {
  fn item_names(&self) -> Result<Vec<String>>;
  fn reset_value(&self, reset_type: &str, base: u32) -> Result<String>;
  fn reset_mask_value(&self, reset_type: &str, base: u32) -> Result<String>;
}

/// Entry point to a host holding one open component. A cursor the host does not provide is
/// reported as `None` and its subtree is skipped.
pub trait HostApi {
  /// Whether the host is reachable and has a component open.
  fn is_available(&self) -> bool;
  fn component_name(&self) -> Result<String>;
  fn component_description(&self) -> Result<String>;

  fn ports(&mut self) -> Option<&mut dyn PortCursor>;
  fn parameters(&mut self) -> Option<&mut dyn ParameterCursor>;
  fn memory_maps(&mut self) -> Option<&mut dyn MemoryMapCursor>;
  fn address_blocks(&mut self) -> Option<&mut dyn AddressBlockCursor>;
  fn registers(&mut self) -> Option<&mut dyn RegisterCursor>;
  fn fields(&mut self) -> Option<&mut dyn FieldCursor>;
  fn resets(&mut self) -> Option<&mut dyn ResetCursor>;
}

/// Values of an address block as text, read under one scope.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockValues {
  pub description: String,
  pub base_address: String,
  pub range: String,
  pub width: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterValues {
  pub description: String,
  pub offset: String,
  pub size: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldValues {
  pub description: String,
  pub offset: String,
  pub width: String,
  pub access: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResetValues {
  pub value: String,
  pub mask: String,
}

/// Wraps a host so every hierarchical query names the path it applies to.
///
/// Methods return `Ok(None)` when the host lacks the cursor for that level.
pub struct ScopedHost<'h, H: ?Sized> {
  host: &'h mut H,
  base: u32,
}
impl<'h, H: HostApi + ?Sized> ScopedHost<'h, H> {
  pub fn new(host: &'h mut H, base: u32) -> Self {
    Self { host, base }
  }

  pub fn host(&mut self) -> &mut H {
    &mut *self.host
  }

  /// Names of the blocks in the memory map at `map`.
  pub fn block_names(&mut self, map: &ScopePath) -> Result<Option<Vec<String>>> {
    expect_depth(map, 1)?;
    match self.host.address_blocks() {
      Some(c) => scoped(c, map, |c| c.item_names()).map(Some),
      None => Ok(None),
    }
  }

  pub fn read_block(&mut self, map: &ScopePath, block: &str) -> Result<Option<BlockValues>> {
    expect_depth(map, 1)?;
    let base = self.base;
    match self.host.address_blocks() {
      Some(c) => scoped(c, map, |c| {
        Ok(BlockValues {
          description: c.description(block)?,
          base_address: c.base_address_value(block, base)?,
          range: c.range_value(block, base)?,
          width: c.width_value(block, base)?,
        })
      })
      .map(Some),
      None => Ok(None),
    }
  }

  /// Names of the registers in the block at `block`.
  pub fn register_names(&mut self, block: &ScopePath) -> Result<Option<Vec<String>>> {
    expect_depth(block, 2)?;
    match self.host.registers() {
      Some(c) => scoped(c, block, |c| c.item_names()).map(Some),
      None => Ok(None),
    }
  }

  pub fn read_register(
    &mut self,
    block: &ScopePath,
    register: &str,
  ) -> Result<Option<RegisterValues>> {
    expect_depth(block, 2)?;
    let base = self.base;
    match self.host.registers() {
      Some(c) => scoped(c, block, |c| {
        Ok(RegisterValues {
          description: c.description(register)?,
          offset: c.offset_value(register, base)?,
          size: c.size_value(register, base)?,
        })
      })
      .map(Some),
      None => Ok(None),
    }
  }

  /// Names of the fields in the register at `register`.
  pub fn field_names(&mut self, register: &ScopePath) -> Result<Option<Vec<String>>> {
    expect_depth(register, 3)?;
    match self.host.fields() {
      Some(c) => scoped(c, register, |c| c.item_names()).map(Some),
      None => Ok(None),
    }
  }

  pub fn read_field(&mut self, register: &ScopePath, field: &str) -> Result<Option<FieldValues>> {
    expect_depth(register, 3)?;
    let base = self.base;
    match self.host.fields() {
      Some(c) => scoped(c, register, |c| {
        Ok(FieldValues {
          description: c.description(field)?,
          offset: c.offset_value(field, base)?,
          width: c.width_value(field, base)?,
          access: c.access_string(field)?,
        })
      })
      .map(Some),
      None => Ok(None),
    }
  }

  /// Reset type names of the field at `field`.
  pub fn reset_types(&mut self, field: &ScopePath) -> Result<Option<Vec<String>>> {
    expect_depth(field, 4)?;
    match self.host.resets() {
      Some(c) => scoped(c, field, |c| c.item_names()).map(Some),
      None => Ok(None),
    }
  }

  pub fn read_reset(&mut self, field: &ScopePath, reset_type: &str) -> Result<Option<ResetValues>> {
    expect_depth(field, 4)?;
    let base = self.base;
    match self.host.resets() {
      Some(c) => scoped(c, field, |c| {
        Ok(ResetValues {
          value: c.reset_value(reset_type, base)?,
          mask: c.reset_mask_value(reset_type, base)?,
        })
      })
      .map(Some),
      None => Ok(None),
    }
  }
}

fn expect_depth(path: &ScopePath, depth: usize) -> Result<()> {
  if path.depth() == depth {
    Ok(())
  } else {
    Err(
      IpxactTreeError::new(
        ErrorKind::ScopeMismatch,
        &format!("expected a path {} levels deep, got '{}'", depth, path),
      )
      .with_path(path),
    )
  }
}

fn scoped<C, T, F>(cursor: &mut C, path: &ScopePath, query: F) -> Result<T>
where
  C: Scoped + ?Sized,
  F: FnOnce(&C) -> Result<T>,
{
  cursor.scope_to(path).map_err(|e| e.with_path(path))?;

  match cursor.current_scope() {
    Some(ref current) if current == path => {}
    other => return Err(IpxactTreeError::scope_mismatch(path, other.as_ref())),
  }

  query(cursor).map_err(|e| e.with_path(path))
}
