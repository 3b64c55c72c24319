use log::{debug, warn};

use crate::{
  config::ProjectionOptions,
  error::{ErrorKind, IpxactTreeError, Result},
  host::{HostApi, ParameterCursor, PortCursor, ScopePath, ScopedHost},
  value::{signed_or_zero, unsigned_or_zero},
  Access, AddressBlock, Component, Direction, Field, Identity, Parameter, Port, Register, Reset,
};

/// Base in which the host is asked to evaluate value expressions.
const VALUE_BASE: u32 = 10;

/// A projected tree together with the subtrees that could not be projected.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
  pub component: Component,

  /// Errors that aborted a port, parameter or memory map subtree, in visiting order. Each
  /// carries the path at which it happened.
  pub errors: Vec<IpxactTreeError>,
}

/// Walks the host's cursors and builds the component tree with default options.
pub fn project<H: HostApi + ?Sized>(host: &mut H) -> Result<Component> {
  project_with(host, &ProjectionOptions::default())
}

/// Like `project_report`, but only the tree is returned. Aborted subtrees are logged.
pub fn project_with<H: HostApi + ?Sized>(
  host: &mut H,
  options: &ProjectionOptions,
) -> Result<Component> {
  project_report(host, options).map(|p| p.component)
}

/// Walks the host's cursors depth-first and builds the component tree.
///
/// Ports and parameters are read first, then every memory map, address block, register, field
/// and reset in host order. Values that cannot be evaluated to integers are recorded as 0.
/// A host without a given cursor simply yields no entities of that kind. A scope mismatch or
/// host query error abandons the subtree being visited and the walk continues with its
/// siblings. Only an unavailable host fails the whole projection.
pub fn project_report<H: HostApi + ?Sized>(
  host: &mut H,
  options: &ProjectionOptions,
) -> Result<Projection> {
  if !host.is_available() {
    return Err(IpxactTreeError::new(
      ErrorKind::HostUnavailable,
      "the host has no component open",
    ));
  }

  let identity = Identity::new(&host.component_name()?, &host.component_description()?);
  let mut walk = Walk {
    component: Component::new(identity),
    options,
    errors: Vec::new(),
  };

  walk.project_ports(host)?;
  walk.project_parameters(host)?;

  let mut scoped = ScopedHost::new(host, VALUE_BASE);
  walk.project_memory_maps(&mut scoped)?;

  debug!(
    "projected component '{}': {} ports, {} parameters, {} address blocks, {} aborted subtrees",
    walk.component.name(),
    walk.component.ports().len(),
    walk.component.parameters().len(),
    walk.component.memory_maps().len(),
    walk.errors.len()
  );

  Ok(Projection {
    component: walk.component,
    errors: walk.errors,
  })
}

struct Walk<'o> {
  component: Component,
  options: &'o ProjectionOptions,
  errors: Vec<IpxactTreeError>,
}
impl<'o> Walk<'o> {
  /// Records a failed subtree at `path` and lets the walk go on. An unavailable host still
  /// ends the projection.
  fn absorb<T>(&mut self, path: &ScopePath, result: Result<Option<T>>) -> Result<Option<T>> {
    match result {
      Err(e) if e.kind != ErrorKind::HostUnavailable => {
        let e = e.with_path(path);
        warn!("skipping subtree: {}", e);
        self.errors.push(e);
        Ok(None)
      }
      other => other,
    }
  }

  fn project_ports<H: HostApi + ?Sized>(&mut self, host: &mut H) -> Result<()> {
    let cursor = match host.ports() {
      Some(c) => c,
      None => {
        debug!("host has no port interface; skipping ports");
        return Ok(());
      }
    };

    let names = self.absorb(&ScopePath::component(), cursor.item_names().map(Some))?;
    for name in names.unwrap_or_default() {
      if let Some(port) = self.absorb(&ScopePath::component(), project_port(&*cursor, &name))? {
        self.component.add_port(port);
      }
    }

    Ok(())
  }

  fn project_parameters<H: HostApi + ?Sized>(&mut self, host: &mut H) -> Result<()> {
    let cursor = match host.parameters() {
      Some(c) => c,
      None => {
        debug!("host has no parameter interface; skipping parameters");
        return Ok(());
      }
    };

    let names = self.absorb(&ScopePath::component(), cursor.item_names().map(Some))?;
    for name in names.unwrap_or_default() {
      let parameter = project_parameter(&*cursor, &name, VALUE_BASE).map(Some);
      if let Some(parameter) = self.absorb(&ScopePath::component(), parameter)? {
        self.component.add_parameter(parameter);
      }
    }

    Ok(())
  }

  fn project_memory_maps<H: HostApi + ?Sized>(&mut self, scoped: &mut ScopedHost<H>) -> Result<()> {
    let map_names = match scoped.host().memory_maps() {
      Some(c) => c.item_names(),
      None => {
        debug!("host has no memory map interface; skipping memory maps");
        return Ok(());
      }
    };
    let map_names = self.absorb(&ScopePath::component(), map_names.map(Some))?;

    for map_name in map_names.unwrap_or_default() {
      let map = ScopePath::component().map(&map_name);

      let block_names = match self.absorb(&map, scoped.block_names(&map))? {
        Some(names) => names,
        None => {
          debug!("no address blocks read for '{}'", map);
          continue;
        }
      };

      for block_name in block_names {
        let block = self.project_block(scoped, &map, &block_name);
        if let Some(block) = self.absorb(&map.block(&block_name), block)? {
          self.component.add_address_block(block);
        }
      }
    }

    Ok(())
  }

  fn project_block<H: HostApi + ?Sized>(
    &mut self,
    scoped: &mut ScopedHost<H>,
    map: &ScopePath,
    name: &str,
  ) -> Result<Option<AddressBlock>> {
    let values = match scoped.read_block(map, name)? {
      Some(v) => v,
      None => return Ok(None),
    };
    let path = map.block(name);

    let mut block = AddressBlock::new(
      Identity::new(name, &values.description),
      unsigned_or_zero(&values.base_address, &format!("base address of '{}'", path)),
      unsigned_or_zero(&values.range, &format!("range of '{}'", path)),
      unsigned_or_zero(&values.width, &format!("width of '{}'", path)),
    );

    let register_names = match scoped.register_names(&path)? {
      Some(names) => names,
      None => {
        debug!("host has no register interface; skipping '{}'", path);
        return Ok(Some(block));
      }
    };

    for register_name in register_names {
      let register = self.project_register(scoped, &path, &register_name);
      if let Some(register) = self.absorb(&path.register(&register_name), register)? {
        block.add_register(register);
      }
    }

    Ok(Some(block))
  }

  fn project_register<H: HostApi + ?Sized>(
    &mut self,
    scoped: &mut ScopedHost<H>,
    block: &ScopePath,
    name: &str,
  ) -> Result<Option<Register>> {
    let values = match scoped.read_register(block, name)? {
      Some(v) => v,
      None => return Ok(None),
    };
    let path = block.register(name);

    let mut register = Register::new(
      Identity::new(name, &values.description),
      unsigned_or_zero(&values.offset, &format!("offset of '{}'", path)),
      unsigned_or_zero(&values.size, &format!("size of '{}'", path)),
    );

    let field_names = match scoped.field_names(&path)? {
      Some(names) => names,
      None => {
        debug!("host has no field interface; skipping '{}'", path);
        return Ok(Some(register));
      }
    };

    for field_name in field_names {
      let field = self.project_field(scoped, &path, &field_name);
      if let Some(field) = self.absorb(&path.field(&field_name), field)? {
        register.add_field(field);
      }
    }

    Ok(Some(register))
  }

  fn project_field<H: HostApi + ?Sized>(
    &mut self,
    scoped: &mut ScopedHost<H>,
    register: &ScopePath,
    name: &str,
  ) -> Result<Option<Field>> {
    let values = match scoped.read_field(register, name)? {
      Some(v) => v,
      None => return Ok(None),
    };
    let path = register.field(name);

    let mut field = Field::new(
      Identity::new(name, &values.description),
      unsigned_or_zero(&values.offset, &format!("bit offset of '{}'", path)),
      unsigned_or_zero(&values.width, &format!("bit width of '{}'", path)),
      Access::new(&values.access),
    );

    let reset_types = match scoped.reset_types(&path)? {
      Some(types) => types,
      None => {
        debug!("host has no reset interface; skipping '{}'", path);
        return Ok(Some(field));
      }
    };

    for reset_type in reset_types {
      let values = match scoped.read_reset(&path, &reset_type)? {
        Some(v) => v,
        None => continue,
      };

      field.add_reset(Reset::with_default_type(
        &reset_type,
        &self.options.default_reset_type,
        unsigned_or_zero(&values.value, &format!("reset value of '{}'", path)),
        unsigned_or_zero(&values.mask, &format!("reset mask of '{}'", path)),
      ));
    }

    Ok(Some(field))
  }
}

fn project_port(cursor: &dyn PortCursor, name: &str) -> Result<Option<Port>> {
  if !cursor.port_is_wire(name)? {
    debug!("skipping non-wire port '{}'", name);
    return Ok(None);
  }

  let direction_text = cursor.direction(name)?;
  let direction = Direction::new(&direction_text);
  if direction.is_none() {
    warn!("port '{}' has unknown direction '{}'", name, direction_text);
  }

  let width: u32 = unsigned_or_zero(&cursor.width(name)?, &format!("width of port '{}'", name));

  Ok(Some(Port::new(
    Identity::new(name, &cursor.description(name)?),
    "",
    width,
    direction,
  )))
}

fn project_parameter(cursor: &dyn ParameterCursor, name: &str, base: u32) -> Result<Parameter> {
  let left = bound_or_zero(&cursor.left_value(name, base)?, name, "left");
  let right = bound_or_zero(&cursor.right_value(name, base)?, name, "right");

  Ok(Parameter::new(
    Identity::new(name, &cursor.description(name)?),
    &cursor.type_name(name)?,
    left,
    right,
    &cursor.value_formatted_expression(name)?,
  ))
}

fn bound_or_zero(text: &str, parameter: &str, side: &str) -> i64 {
  if text.trim().is_empty() {
    return 0;
  }
  signed_or_zero(text, &format!("{} bound of parameter '{}'", side, parameter))
}
