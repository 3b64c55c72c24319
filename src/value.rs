use std::convert::TryFrom;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ErrorKind, IpxactTreeError, Result};

static LITERAL: Lazy<std::result::Result<Regex, regex::Error>> = Lazy::new(|| {
  Regex::new(
    r"^(?P<neg>-)?(?:0[xX](?P<hex>[0-9a-fA-F]+)|(?:\d+)?'[sS]?(?P<radix>[bBoOdDhH])(?P<digits>[0-9a-fA-F]+)|(?P<dec>\d+))$",
  )
});

/// Evaluates a constant integer expression as it appears in host values or IP-XACT documents.
///
/// Accepted forms are plain decimal (`42`, `-3`), C-style hex (`0x2A`) and SystemVerilog
/// literals, sized or not (`8'b0010_1010`, `'h2A`, `32'd42`). Underscores are ignored.
pub fn parse_integer(text: &str) -> Result<i64> {
  let cleaned: String = text.trim().chars().filter(|c| *c != '_').collect();

  if cleaned.is_empty() {
    return Err(IpxactTreeError::new(
      ErrorKind::NumericParseFailure,
      "empty expression",
    ));
  }

  let re = LITERAL.as_ref().map_err(Clone::clone)?;
  let caps = match re.captures(&cleaned) {
    Some(c) => c,
    None => {
      return Err(IpxactTreeError::new(
        ErrorKind::NumericParseFailure,
        &format!("'{}' is not an integer literal", text),
      ))
    }
  };

  let (digits, radix) = if let Some(hex) = caps.name("hex") {
    (hex.as_str(), 16)
  } else if let Some(dec) = caps.name("dec") {
    (dec.as_str(), 10)
  } else {
    let radix = match caps.name("radix").map(|r| r.as_str()) {
      Some("b") | Some("B") => 2,
      Some("o") | Some("O") => 8,
      Some("d") | Some("D") => 10,
      _ => 16,
    };
    (caps.name("digits").map_or("", |d| d.as_str()), radix)
  };

  let magnitude = i64::from_str_radix(digits, radix).map_err(|e| {
    IpxactTreeError::new(
      ErrorKind::NumericParseFailure,
      &format!("'{}' cannot be read in base {}: {}", text, radix, e),
    )
  })?;

  match caps.name("neg") {
    Some(_) => Ok(-magnitude),
    None => Ok(magnitude),
  }
}

/// Evaluates an expression that must be a non-negative integer fitting in `T`.
pub fn parse_unsigned<T: TryFrom<i64>>(text: &str) -> Result<T> {
  let value = parse_integer(text)?;
  T::try_from(value).map_err(|_| {
    IpxactTreeError::new(
      ErrorKind::NumericParseFailure,
      &format!("'{}' is out of range", text),
    )
  })
}

/// Like `parse_unsigned`, but a failure is logged and replaced with zero.
pub(crate) fn unsigned_or_zero<T: TryFrom<i64> + Default>(text: &str, what: &str) -> T {
  match parse_unsigned(text) {
    Ok(v) => v,
    Err(e) => {
      warn!("{}: {}; using 0", what, e);
      T::default()
    }
  }
}

/// Like `parse_integer`, but a failure is logged and replaced with zero.
pub(crate) fn signed_or_zero(text: &str, what: &str) -> i64 {
  match parse_integer(text) {
    Ok(v) => v,
    Err(e) => {
      warn!("{}: {}; using 0", what, e);
      0
    }
  }
}

/// Formats a value the way a host formats evaluated expressions for a requested base. Bases
/// other than 2, 8 and 16 format as decimal.
pub fn format_in_base(value: i64, base: u32) -> String {
  let sign = if value < 0 { "-" } else { "" };
  let magnitude = value.unsigned_abs();
  match base {
    2 => format!("{}{:b}", sign, magnitude),
    8 => format!("{}{:o}", sign, magnitude),
    16 => format!("{}{:X}", sign, magnitude),
    _ => format!("{}{}", sign, magnitude),
  }
}

#[cfg(test)]
mod tests {
  use super::{format_in_base, parse_integer, parse_unsigned, signed_or_zero, unsigned_or_zero};
  use crate::error::ErrorKind;

  #[test]
  fn parses_decimal_and_hex() {
    assert_eq!(42, parse_integer("42").unwrap());
    assert_eq!(-3, parse_integer(" -3 ").unwrap());
    assert_eq!(42, parse_integer("0x2A").unwrap());
    assert_eq!(1_000_000, parse_integer("1_000_000").unwrap());
  }

  #[test]
  fn parses_systemverilog_literals() {
    assert_eq!(0b0110_1101, parse_integer("8'b0110_1101").unwrap());
    assert_eq!(0xff, parse_integer("'hFF").unwrap());
    assert_eq!(10, parse_integer("32'd10").unwrap());
    assert_eq!(0o17, parse_integer("6'o17").unwrap());
    assert_eq!(5, parse_integer("4'sb0101").unwrap());
  }

  #[test]
  fn rejects_non_literals() {
    for text in &["", "abc", "WIDTH-1", "8'b012", "0x"] {
      let err = parse_integer(text).unwrap_err();
      assert_eq!(ErrorKind::NumericParseFailure, err.kind, "{}", text);
    }
  }

  #[test]
  fn unsigned_rejects_negative_and_overflow() {
    assert!(parse_unsigned::<u32>("-1").is_err());
    assert!(parse_unsigned::<u32>("0x1_0000_0000").is_err());
    assert_eq!(7u32, parse_unsigned::<u32>("7").unwrap());
  }

  #[test]
  fn fallbacks_are_zero() {
    assert_eq!(0, signed_or_zero("N/A", "bound"));
    assert_eq!(0u64, unsigned_or_zero::<u64>("", "range"));
    assert_eq!(12u64, unsigned_or_zero::<u64>("12", "range"));
  }

  #[test]
  fn formats_in_requested_base() {
    assert_eq!("42", format_in_base(42, 10));
    assert_eq!("2A", format_in_base(42, 16));
    assert_eq!("101010", format_in_base(42, 2));
    assert_eq!("52", format_in_base(42, 8));
    assert_eq!("-5", format_in_base(-5, 0));
  }
}
