use std::fmt;

use crate::{value::Value, ArityError};

/// Number of tokens a flag consumes once matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Consumes nothing, presence alone sets the value.
    Switch,
    Fixed(usize),
    /// Consumes every remaining token, at least one.
    Unlimited,
}

impl From<isize> for Arity {
    fn from(n: isize) -> Arity {
        match n {
            0 => Arity::Switch,
            n if n < 0 => Arity::Unlimited,
            n => Arity::Fixed(n.unsigned_abs()),
        }
    }
}

impl From<usize> for Arity {
    fn from(n: usize) -> Arity {
        if n == 0 {
            Arity::Switch
        } else {
            Arity::Fixed(n)
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Switch => f.write_str("0"),
            Arity::Fixed(n) => write!(f, "{n}"),
            Arity::Unlimited => f.write_str("at least one"),
        }
    }
}

/// A flag: a value cell plus the metadata driving how it is matched.
///
/// Names are given when the flag is added to a [`FlagSet`](crate::FlagSet).
pub struct Flag<'a> {
    pub(crate) value: Box<dyn Value + 'a>,
    pub(crate) positional: bool,
    pub(crate) arity: Arity,
    pub(crate) usage: String,
    pub(crate) default: String,
}

impl<'a> Flag<'a> {
    fn new(value: impl Value + 'a, positional: bool, usage: &str) -> Flag<'a> {
        let default = value.render();
        Flag {
            value: Box::new(value),
            positional,
            arity: Arity::Fixed(1),
            usage: usage.to_string(),
            default,
        }
    }

    pub fn positional(value: impl Value + 'a, usage: &str) -> Flag<'a> {
        Flag::new(value, true, usage)
    }

    pub fn optional(value: impl Value + 'a, usage: &str) -> Flag<'a> {
        Flag::new(value, false, usage)
    }

    pub fn switch(value: impl Value + 'a, usage: &str) -> Flag<'a> {
        let mut flag = Flag::new(value, false, usage);
        flag.arity = Arity::Switch;
        flag.default.clear();
        flag
    }

    /// Changes the number of tokens the flag consumes. A positional flag can
    /// not become a switch.
    pub fn set_arity(&mut self, arity: impl Into<Arity>) -> Result<(), ArityError> {
        let arity = match arity.into() {
            Arity::Fixed(0) => Arity::Switch,
            it => it,
        };
        if arity == Arity::Switch && self.positional {
            return Err(ArityError::PositionalSwitch);
        }
        match (self.arity == Arity::Switch, arity == Arity::Switch) {
            (false, true) => self.default.clear(),
            (true, false) => self.default = self.value.render(),
            _ => (),
        }
        self.arity = arity;
        Ok(())
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn is_positional(&self) -> bool {
        self.positional
    }

    pub fn is_switch(&self) -> bool {
        !self.positional && self.arity == Arity::Switch
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Rendering of the value at construction time, empty for switches.
    pub fn default_rendering(&self) -> &str {
        &self.default
    }

    pub fn value(&self) -> &dyn Value {
        &*self.value
    }
}

impl fmt::Debug for Flag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("positional", &self.positional)
            .field("arity", &self.arity)
            .field("usage", &self.usage)
            .field("default", &self.default)
            .field("value", &self.value.render())
            .finish()
    }
}
