//! Integer evaluation of the SystemVerilog-style expressions IP-XACT documents carry in their
//! values and vector bounds, e.g. `WIDTH-1`, `(1 << ADDR_BITS) - 1` or `$clog2(DEPTH)`.

use std::convert::TryFrom;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
  error::{ErrorKind, IpxactTreeError, Result},
  value::parse_integer,
};

static TOKEN: Lazy<std::result::Result<Regex, regex::Error>> = Lazy::new(|| {
  Regex::new(
    r"^\s*(?:(?P<num>(?:\d[\d_]*)?'[sS]?[bBoOdDhH][0-9a-fA-F_]+|0[xX][0-9a-fA-F_]+|\d[\d_]*)|(?P<name>\$?[A-Za-z_][A-Za-z0-9_]*)|(?P<sym>\*\*|<<|>>|[-+*/%(),]))",
  )
});

#[derive(Debug, Clone, PartialEq)]
enum Token {
  Number(i64),
  Name(String),
  Symbol(String),
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
  let re = TOKEN.as_ref().map_err(Clone::clone)?;
  let mut tokens = Vec::new();
  let mut rest = text;

  while !rest.trim().is_empty() {
    let caps = match re.captures(rest) {
      Some(c) => c,
      None => return Err(failure(text, &format!("unexpected input at '{}'", rest.trim()))),
    };

    if let Some(num) = caps.name("num") {
      tokens.push(Token::Number(parse_integer(num.as_str())?));
    } else if let Some(name) = caps.name("name") {
      tokens.push(Token::Name(name.as_str().to_owned()));
    } else if let Some(sym) = caps.name("sym") {
      tokens.push(Token::Symbol(sym.as_str().to_owned()));
    }

    rest = &rest[caps.get(0).map_or(rest.len(), |m| m.end())..];
  }

  Ok(tokens)
}

fn failure(text: &str, details: &str) -> IpxactTreeError {
  IpxactTreeError::new(
    ErrorKind::NumericParseFailure,
    &format!("cannot evaluate '{}': {}", text, details),
  )
}

/// Binding strength of the binary operators; higher binds tighter.
fn precedence(symbol: &str) -> Option<u8> {
  match symbol {
    "<<" | ">>" => Some(1),
    "+" | "-" => Some(2),
    "*" | "/" | "%" => Some(3),
    "**" => Some(4),
    _ => None,
  }
}

struct Parser<'a> {
  text: &'a str,
  tokens: Vec<Token>,
  pos: usize,
  resolve: &'a dyn Fn(&str) -> Option<i64>,
}
impl<'a> Parser<'a> {
  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  fn next(&mut self) -> Option<Token> {
    let token = self.tokens.get(self.pos).cloned();
    self.pos += 1;
    token
  }

  fn expect(&mut self, symbol: &str) -> Result<()> {
    match self.next() {
      Some(Token::Symbol(ref s)) if s == symbol => Ok(()),
      _ => Err(failure(self.text, &format!("expected '{}'", symbol))),
    }
  }

  fn binary_operator(&self) -> Option<(String, u8)> {
    match self.peek() {
      Some(Token::Symbol(s)) => precedence(s).map(|p| (s.clone(), p)),
      _ => None,
    }
  }

  /// Precedence climbing. `**` is right-associative, the other operators left-associative.
  fn expression(&mut self, min_precedence: u8) -> Result<i64> {
    let mut lhs = self.unary()?;

    while let Some((op, prec)) = self.binary_operator() {
      if prec < min_precedence {
        break;
      }
      self.pos += 1;
      let next = if op == "**" { prec } else { prec + 1 };
      let rhs = self.expression(next)?;
      lhs = self.apply(&op, lhs, rhs)?;
    }

    Ok(lhs)
  }

  fn unary(&mut self) -> Result<i64> {
    match self.peek() {
      Some(Token::Symbol(s)) if s == "-" => {
        self.pos += 1;
        let v = self.unary()?;
        v.checked_neg().ok_or_else(|| failure(self.text, "overflow"))
      }
      Some(Token::Symbol(s)) if s == "+" => {
        self.pos += 1;
        self.unary()
      }
      _ => self.primary(),
    }
  }

  fn primary(&mut self) -> Result<i64> {
    match self.next() {
      Some(Token::Number(v)) => Ok(v),
      Some(Token::Symbol(ref s)) if s == "(" => {
        let v = self.expression(1)?;
        self.expect(")")?;
        Ok(v)
      }
      Some(Token::Name(ref name)) if name.starts_with('$') => self.call(name),
      Some(Token::Name(name)) => {
        (self.resolve)(&name).ok_or_else(|| failure(self.text, &format!("unknown name '{}'", name)))
      }
      _ => Err(failure(self.text, "expected a value")),
    }
  }

  fn call(&mut self, function: &str) -> Result<i64> {
    self.expect("(")?;
    let mut args = vec![self.expression(1)?];
    while let Some(Token::Symbol(s)) = self.peek() {
      if s != "," {
        break;
      }
      self.pos += 1;
      args.push(self.expression(1)?);
    }
    self.expect(")")?;

    match (function, args.as_slice()) {
      ("$clog2", [v]) => Ok(clog2(*v)),
      ("$pow", [b, e]) => self.apply("**", *b, *e),
      _ => Err(failure(
        self.text,
        &format!("unsupported call {} with {} arguments", function, args.len()),
      )),
    }
  }

  fn apply(&self, op: &str, lhs: i64, rhs: i64) -> Result<i64> {
    let result = match op {
      "+" => lhs.checked_add(rhs),
      "-" => lhs.checked_sub(rhs),
      "*" => lhs.checked_mul(rhs),
      "/" => lhs.checked_div(rhs),
      "%" => lhs.checked_rem(rhs),
      "**" => u32::try_from(rhs).ok().and_then(|e| lhs.checked_pow(e)),
      "<<" => u32::try_from(rhs).ok().and_then(|s| lhs.checked_shl(s)),
      ">>" => u32::try_from(rhs).ok().and_then(|s| lhs.checked_shr(s)),
      _ => None,
    };
    result.ok_or_else(|| failure(self.text, &format!("{} {} {} is out of range", lhs, op, rhs)))
  }
}

/// Ceiling of log2; 0 for values up to 1.
fn clog2(value: i64) -> i64 {
  if value <= 1 {
    return 0;
  }
  i64::from(64 - (value - 1).leading_zeros())
}

/// Evaluates `text` to an integer. Names other than the `$clog2` and `$pow` functions are looked
/// up through `resolve`.
pub fn evaluate(text: &str, resolve: &dyn Fn(&str) -> Option<i64>) -> Result<i64> {
  let tokens = tokenize(text)?;
  if tokens.is_empty() {
    return Err(failure(text, "empty expression"));
  }

  let mut parser = Parser {
    text,
    tokens,
    pos: 0,
    resolve,
  };
  let value = parser.expression(1)?;
  if parser.pos != parser.tokens.len() {
    return Err(failure(text, "trailing input"));
  }
  Ok(value)
}

#[cfg(test)]
mod tests {
  use super::evaluate;
  use crate::error::ErrorKind;

  fn params(name: &str) -> Option<i64> {
    match name {
      "WIDTH" => Some(8),
      "uuid_depth" => Some(64),
      _ => None,
    }
  }

  fn eval(text: &str) -> i64 {
    evaluate(text, &params).unwrap()
  }

  #[test]
  fn literals() {
    assert_eq!(42, eval("42"));
    assert_eq!(0x2A, eval("0x2A"));
    assert_eq!(0b0110_1101, eval("8'b0110_1101"));
    assert_eq!(255, eval("'hFF"));
  }

  #[test]
  fn arithmetic_with_precedence() {
    assert_eq!(7, eval("WIDTH-1"));
    assert_eq!(14, eval("2 + 3 * 4"));
    assert_eq!(20, eval("(2 + 3) * 4"));
    assert_eq!(1, eval("7 % 3"));
    assert_eq!(2, eval("9 / 4"));
    assert_eq!(5, eval("10 - 3 - 2"));
    assert_eq!(-3, eval("-WIDTH + 5"));
  }

  #[test]
  fn powers_are_right_associative() {
    assert_eq!(512, eval("2 ** 3 ** 2"));
    assert_eq!(256, eval("$pow(2, WIDTH)"));
  }

  #[test]
  fn shifts_bind_loosest() {
    assert_eq!(255, eval("(1 << WIDTH) - 1"));
    assert_eq!(16, eval("1 << 2 + 2"));
    assert_eq!(4, eval("uuid_depth >> 4"));
  }

  #[test]
  fn clog2() {
    assert_eq!(6, eval("$clog2(uuid_depth)"));
    assert_eq!(7, eval("$clog2(65)"));
    assert_eq!(0, eval("$clog2(1)"));
    assert_eq!(0, eval("$clog2(0)"));
  }

  #[test]
  fn failures() {
    for text in &["", "N", "1 +", "(1", "1 / 0", "2 ** -1", "$sqrt(4)", "1 2", "9223372036854775807 + 1"] {
      let err = evaluate(text, &params).unwrap_err();
      assert_eq!(ErrorKind::NumericParseFailure, err.kind, "{}", text);
    }
  }
}
