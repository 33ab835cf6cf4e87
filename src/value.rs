use std::fmt;

use thiserror::Error;

/// A token could not be converted into the target type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse '{value}' as type '{type_name}': {reason}")]
pub struct ConversionError {
    pub value: String,
    pub type_name: &'static str,
    pub reason: String,
}

impl ConversionError {
    pub fn new(value: &str, type_name: &'static str, reason: impl fmt::Display) -> Self {
        ConversionError { value: value.to_string(), type_name, reason: reason.to_string() }
    }
}

/// Snapshot of a value in its native type, as returned by [`Value::get`].
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Bool(bool),
    String(String),
    Int(isize),
    Float(f64),
    BoolList(Vec<bool>),
    StringList(Vec<String>),
    IntList(Vec<isize>),
    FloatList(Vec<f64>),
    /// A user defined value, described by its type name and rendering.
    Custom { type_name: &'static str, rendered: String },
}

impl Data {
    pub fn type_name(&self) -> &'static str {
        match self {
            Data::Bool(_) => "bool",
            Data::String(_) => "String",
            Data::Int(_) => "isize",
            Data::Float(_) => "f64",
            Data::BoolList(_) => "Vec<bool>",
            Data::StringList(_) => "Vec<String>",
            Data::IntList(_) => "Vec<isize>",
            Data::FloatList(_) => "Vec<f64>",
            Data::Custom { type_name, .. } => *type_name,
        }
    }
}

/// Typed storage cell bound to a variable owned by the caller.
///
/// `set` receives the tokens a flag consumed: none for a switch, exactly `N`
/// for a fixed arity flag, one or more for an unlimited one. Scalars only look
/// at the first token; lists take all of them and replace their contents. On
/// error the underlying variable must be left untouched.
///
/// Implement this for `&mut YourType` to use your own types as flag values.
pub trait Value {
    fn set(&mut self, values: &[&str]) -> Result<(), ConversionError>;

    fn get(&self) -> Data;

    /// Human readable form of the current value, used to display defaults.
    fn render(&self) -> String;
}

impl<V: Value + ?Sized> Value for Box<V> {
    fn set(&mut self, values: &[&str]) -> Result<(), ConversionError> {
        (**self).set(values)
    }
    fn get(&self) -> Data {
        (**self).get()
    }
    fn render(&self) -> String {
        (**self).render()
    }
}

/// Parses a bool the way `true`/`false` switches are usually spelled.
pub(crate) fn parse_bool(s: &str) -> Result<bool, ConversionError> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(ConversionError::new(s, "bool", "invalid syntax")),
    }
}

/// Parses a native width integer. `0x`, `0o`, `0b` and a leading `0` select
/// hexadecimal, octal, binary and octal respectively.
pub(crate) fn parse_int(s: &str) -> Result<isize, ConversionError> {
    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.strip_prefix('+').unwrap_or(s)),
    };
    let lower = unsigned.get(..2).map(|it| it.to_ascii_lowercase());
    let (radix, digits) = match lower.as_deref() {
        Some("0x") => (16, &unsigned[2..]),
        Some("0o") => (8, &unsigned[2..]),
        Some("0b") => (2, &unsigned[2..]),
        _ if unsigned.len() > 1 && unsigned.starts_with('0') => (8, &unsigned[1..]),
        _ => (10, unsigned),
    };
    // from_str_radix would accept a second sign.
    if digits.starts_with(['+', '-']) {
        return Err(ConversionError::new(s, "isize", "invalid digit found in string"));
    }
    isize::from_str_radix(&format!("{sign}{digits}"), radix)
        .map_err(|err| ConversionError::new(s, "isize", err))
}

pub(crate) fn parse_float(s: &str) -> Result<f64, ConversionError> {
    s.parse::<f64>().map_err(|err| ConversionError::new(s, "f64", err))
}

fn parse_string(s: &str) -> Result<String, ConversionError> {
    Ok(s.to_string())
}

fn render_list<T: fmt::Display>(items: &[T]) -> String {
    let items = items.iter().map(|it| it.to_string()).collect::<Vec<_>>();
    format!("[{}]", items.join(" "))
}

macro_rules! scalar_value {
    ($ty:ty, $variant:ident, $parse:expr) => {
        impl Value for &mut $ty {
            fn set(&mut self, values: &[&str]) -> Result<(), ConversionError> {
                if let Some(first) = values.first() {
                    **self = $parse(first)?;
                }
                Ok(())
            }
            fn get(&self) -> Data {
                Data::$variant((**self).clone())
            }
            fn render(&self) -> String {
                self.to_string()
            }
        }
    };
}

macro_rules! list_value {
    ($ty:ty, $variant:ident, $parse:expr) => {
        impl Value for &mut Vec<$ty> {
            fn set(&mut self, values: &[&str]) -> Result<(), ConversionError> {
                let parsed = values.iter().map(|it| $parse(it)).collect::<Result<Vec<$ty>, _>>()?;
                **self = parsed;
                Ok(())
            }
            fn get(&self) -> Data {
                Data::$variant((**self).clone())
            }
            fn render(&self) -> String {
                render_list(self)
            }
        }
    };
}

// A switch sets a bool without any token, hence the hand written impl.
impl Value for &mut bool {
    fn set(&mut self, values: &[&str]) -> Result<(), ConversionError> {
        **self = match values.first() {
            Some(first) => parse_bool(first)?,
            None => true,
        };
        Ok(())
    }
    fn get(&self) -> Data {
        Data::Bool(**self)
    }
    fn render(&self) -> String {
        self.to_string()
    }
}

scalar_value!(String, String, parse_string);
scalar_value!(isize, Int, parse_int);
scalar_value!(f64, Float, parse_float);

list_value!(bool, BoolList, parse_bool);
list_value!(String, StringList, parse_string);
list_value!(isize, IntList, parse_int);
list_value!(f64, FloatList, parse_float);
