use crate::Identity;

/// A component parameter. The bit width is derived from the two vector bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
  identity: Identity,
  data_type: String,
  left_bound: i64,
  right_bound: i64,
  value: String,
}
impl Parameter {
  /// Bounds that could not be evaluated should be passed as 0.
  pub fn new(
    identity: Identity,
    data_type: &str,
    left_bound: i64,
    right_bound: i64,
    value: &str,
  ) -> Self {
    Self {
      identity,
      data_type: data_type.to_owned(),
      left_bound,
      right_bound,
      value: value.to_owned(),
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

  pub fn data_type(&self) -> &str {
    &self.data_type
  }

  pub fn left_bound(&self) -> i64 {
    self.left_bound
  }

  pub fn right_bound(&self) -> i64 {
    self.right_bound
  }

  /// `abs(left - right) + 1`. Wider than the bounds, since `i64::MAX` and `i64::MIN` span
  /// `2^64` bits.
  pub fn bit_width(&self) -> u128 {
    (i128::from(self.left_bound) - i128::from(self.right_bound)).unsigned_abs() + 1
  }

  /// The parameter value with expressions resolved, as formatted by the host.
  pub fn value(&self) -> &str {
    &self.value
  }
}
