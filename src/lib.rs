//! Command line flags parser.
//!
//! A [`FlagSet`] holds positional flags, matched by the order they were
//! added in, and optional flags, matched by name anywhere on the command
//! line. Every flag writes into a variable owned by the caller through the
//! [`Value`] trait:
//!
//! ```
//! use flagparse::{Flag, FlagSet};
//!
//! let mut count = 0isize;
//! let mut name = String::from("anon");
//! let mut verbose = false;
//!
//! let mut fs = FlagSet::new("greet");
//! fs.add(Flag::positional(&mut count, "how many times"), "count", &[])?;
//! fs.add(Flag::optional(&mut name, "who to greet"), "--name", &["-n"])?;
//! fs.add(Flag::switch(&mut verbose, "talk more"), "--verbose", &[])?;
//! fs.parse_from(["42", "--name", "alice", "--verbose"])?;
//! drop(fs);
//!
//! assert_eq!((count, name.as_str(), verbose), (42, "alice", true));
//! # Ok::<(), flagparse::Error>(())
//! ```
//!
//! The same set can be declared on a struct with `#[derive(Flags)]`, see
//! [`Flags`].
use thiserror::Error;

mod flag;
mod flagset;
mod parser;
mod tag;
mod usage;
mod value;

pub use crate::{
    flag::{Arity, Flag},
    flagset::FlagSet,
    value::{ConversionError, Data, Value},
};
pub use flagparse_macros::Flags;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Builds a [`FlagSet`] bound to the fields of `self`.
///
/// Usually derived:
///
/// ```
/// use flagparse::Flags;
///
/// /// Manage the employee database.
/// #[derive(Flags, Default)]
/// struct Employee {
///     #[flagparse("positional,usage=Full name of the employee")]
///     full_name: String,
///     #[flagparse("name=emp-id:e,nargs=3,usage=Employee IDs")]
///     emp_id: Vec<isize>,
///     #[flagparse("switch,name=is-intern")]
///     is_intern: bool,
///     // Not a flag.
///     notes: String,
/// }
///
/// let mut emp = Employee::default();
/// emp.flag_set()?.parse_from(["Jane", "-e", "1", "2", "3", "--is-intern"])?;
/// assert_eq!(emp.emp_id, vec![1, 2, 3]);
/// assert!(emp.is_intern);
/// # Ok::<(), flagparse::Error>(())
/// ```
///
/// Every annotated field is handed to [`FlagSet::add_from_tag`] together with
/// the tag string, in declaration order.
pub trait Flags {
    fn flag_set(&mut self) -> Result<FlagSet<'_>>;
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("unknown optional flag: `{0}`")]
    UnknownFlag(String),
    #[error("flag `{0}` already given")]
    DuplicateFlag(String),
    #[error(transparent)]
    Arity(#[from] ArityError),
    #[error("error while setting flag `{flag}`: {source}")]
    Conversion { flag: String, source: ConversionError },
    #[error("unrecognized argument: `{0}`")]
    UnrecognizedArgument(String),
    #[error("value for positional flag(s) not given: {}", .0.join(", "))]
    MissingRequiredArgument(Vec<String>),
    #[error("help requested")]
    HelpRequested,
}

impl Error {
    pub fn is_help(&self) -> bool {
        matches!(self, Error::HelpRequested)
    }

    /// Exit code a command line tool should terminate with.
    pub fn exit_code(&self) -> i32 {
        if self.is_help() {
            1
        } else {
            2
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("{0:?} is not a valid positional flag name")]
    InvalidPositionalName(String),
    #[error("{0:?} is not a valid optional flag name")]
    InvalidOptionalName(String),
    #[error("positional flag with name {0:?} already exists")]
    DuplicatePositional(String),
    #[error("optional flag with name {0:?} already exists")]
    DuplicateOptional(String),
    #[error("{0:?} can not be used as the optional flag prefix")]
    InvalidPrefix(char),
    #[error("{0:?} is reserved for the help flag")]
    Reserved(String),
    #[error("positional flag {name:?} can not have aliases, got {alias:?}")]
    PositionalAlias { name: String, alias: String },
    #[error("flag {0:?} is positional, it can not be added as an optional flag")]
    ExpectedOptional(String),
    #[error("flag {0:?} is optional, it can not be added as a positional flag")]
    ExpectedPositional(String),
    #[error("positional flag {name:?} can never get a value, {after:?} takes all remaining arguments")]
    UnreachablePositional { name: String, after: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tag fragment `{fragment}`: {reason}")]
pub struct DecodeError {
    pub fragment: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArityError {
    #[error("nargs cannot be 0 for a positional flag")]
    PositionalSwitch,
    #[error("invalid no. of arguments for flag `{flag}`; required: {required}, given: {given}")]
    NotEnough { flag: String, required: Arity, given: usize },
}
