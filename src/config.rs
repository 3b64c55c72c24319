//! Knobs for the projection and the printer. Both default to the behaviour the component editor
//! scripts rely on.

use crate::field::DEFAULT_RESET_TYPE;

/// Options for `project_with`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionOptions {
  /// Reset type recorded for resets whose host type name is empty.
  pub default_reset_type: String,
}
impl Default for ProjectionOptions {
  fn default() -> Self {
    Self {
      default_reset_type: DEFAULT_RESET_TYPE.to_owned(),
    }
  }
}

/// Options for `print_tree_with`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintOptions {
  /// Spaces added per level of depth.
  pub indent: usize,
}
impl Default for PrintOptions {
  fn default() -> Self {
    Self { indent: 2 }
  }
}
