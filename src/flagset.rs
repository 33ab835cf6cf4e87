use std::{collections::HashMap, fmt, io, mem, process};

use crate::{
    flag::{Arity, Flag},
    parser, tag, usage,
    value::Value,
    RegistrationError, Result,
};

pub(crate) struct Entry<'a> {
    /// Primary name first, then aliases in the order they were given.
    pub(crate) names: Vec<String>,
    pub(crate) flag: Flag<'a>,
}

type UsageFn<'a> = Box<dyn Fn(&FlagSet<'_>) -> String + 'a>;

/// An ordered set of positional flags and a name indexed set of optional
/// flags, together with the tokens to parse.
pub struct FlagSet<'a> {
    program: String,
    description: Option<String>,
    args: Vec<String>,
    prefix: char,
    pub(crate) entries: Vec<Entry<'a>>,
    pub(crate) positionals: Vec<usize>,
    pub(crate) optionals: HashMap<String, usize>,
    output: Box<dyn io::Write + 'a>,
    usage: Option<UsageFn<'a>>,
}

impl<'a> FlagSet<'a> {
    /// Creates an empty set with no tokens to parse.
    pub fn new(program: impl Into<String>) -> FlagSet<'a> {
        FlagSet {
            program: program.into(),
            description: None,
            args: Vec::new(),
            prefix: '-',
            entries: Vec::new(),
            positionals: Vec::new(),
            optionals: HashMap::new(),
            output: Box::new(io::stderr()),
            usage: None,
        }
    }

    /// Creates an empty set which parses the arguments of the current process.
    pub fn from_env() -> FlagSet<'a> {
        let mut args = std::env::args_os().map(|it| it.to_string_lossy().into_owned());
        let program = args.next().unwrap_or_default();
        let mut res = FlagSet::new(program);
        res.args = args.collect();
        res
    }

    /// Uses `prefix` instead of `-` to tell optional flags apart. Must be an
    /// ASCII punctuation character and be set before any optional flag is
    /// added.
    pub fn with_prefix(mut self, prefix: char) -> Result<FlagSet<'a>, RegistrationError> {
        if !prefix.is_ascii_punctuation() || !self.optionals.is_empty() {
            return Err(RegistrationError::InvalidPrefix(prefix));
        }
        self.prefix = prefix;
        Ok(self)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Where [`parse_and_report`](FlagSet::parse_and_report) writes usage and
    /// errors. Defaults to stderr.
    pub fn set_output(&mut self, output: impl io::Write + 'a) {
        self.output = Box::new(output);
    }

    /// Replaces the default usage text.
    pub fn set_usage(&mut self, usage: impl Fn(&FlagSet<'_>) -> String + 'a) {
        self.usage = Some(Box::new(usage));
    }

    /// Spellings which request help, short one first.
    pub fn help_names(&self) -> [String; 2] {
        let p = self.prefix;
        [format!("{p}h"), format!("{p}{p}help")]
    }

    pub(crate) fn is_help(&self, token: &str) -> bool {
        self.help_names().iter().any(|it| it == token)
    }

    pub(crate) fn is_optional_name(&self, token: &str) -> bool {
        token.starts_with(self.prefix)
    }

    fn valid_positional_name(&self, name: &str) -> bool {
        let mut chars = name.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphanumeric())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
    }

    fn valid_optional_name(&self, name: &str) -> bool {
        match name.strip_prefix(self.prefix) {
            Some(rest) => {
                rest.chars().any(|c| c.is_ascii_alphanumeric())
                    && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == self.prefix)
            }
            None => false,
        }
    }

    /// Adds `flag` under `name`. Optional flags may also be reachable through
    /// `aliases`. Adding `None` does nothing.
    pub fn add(
        &mut self,
        flag: impl Into<Option<Flag<'a>>>,
        name: &str,
        aliases: &[&str],
    ) -> Result<(), RegistrationError> {
        let flag = match flag.into() {
            Some(it) => it,
            None => return Ok(()),
        };
        if flag.positional {
            if let Some(alias) = aliases.first() {
                return Err(RegistrationError::PositionalAlias {
                    name: name.to_string(),
                    alias: alias.to_string(),
                });
            }
            self.add_positional(name, flag)
        } else {
            self.add_optional(name, flag, aliases)
        }
    }

    pub fn add_positional(
        &mut self,
        name: &str,
        flag: impl Into<Option<Flag<'a>>>,
    ) -> Result<(), RegistrationError> {
        let flag = match flag.into() {
            Some(it) => it,
            None => return Ok(()),
        };
        if !flag.positional {
            return Err(RegistrationError::ExpectedPositional(name.to_string()));
        }
        if !self.valid_positional_name(name) {
            return Err(RegistrationError::InvalidPositionalName(name.to_string()));
        }
        if self.positionals().any(|(it, _)| it == name) {
            return Err(RegistrationError::DuplicatePositional(name.to_string()));
        }
        if let Some((last, _)) = self.positionals().find(|(_, it)| it.arity == Arity::Unlimited) {
            return Err(RegistrationError::UnreachablePositional {
                name: name.to_string(),
                after: last.to_string(),
            });
        }

        self.positionals.push(self.entries.len());
        self.entries.push(Entry { names: vec![name.to_string()], flag });
        Ok(())
    }

    pub fn add_optional(
        &mut self,
        name: &str,
        flag: impl Into<Option<Flag<'a>>>,
        aliases: &[&str],
    ) -> Result<(), RegistrationError> {
        let flag = match flag.into() {
            Some(it) => it,
            None => return Ok(()),
        };
        if flag.positional {
            return Err(RegistrationError::ExpectedOptional(name.to_string()));
        }

        let names = std::iter::once(name).chain(aliases.iter().copied()).collect::<Vec<_>>();
        for (i, &name) in names.iter().enumerate() {
            if !self.valid_optional_name(name) {
                return Err(RegistrationError::InvalidOptionalName(name.to_string()));
            }
            if self.is_help(name) {
                return Err(RegistrationError::Reserved(name.to_string()));
            }
            if self.optionals.contains_key(name) || names[..i].contains(&name) {
                return Err(RegistrationError::DuplicateOptional(name.to_string()));
            }
        }

        let idx = self.entries.len();
        for &name in &names {
            self.optionals.insert(name.to_string(), idx);
        }
        self.entries.push(Entry { names: names.into_iter().map(String::from).collect(), flag });
        Ok(())
    }

    /// Decodes a `key=value,...` tag into a flag bound to `value` and adds it.
    /// `field` provides the name when the tag has none.
    pub fn add_from_tag(&mut self, value: impl Value + 'a, tag: &str, field: &str) -> Result<()> {
        let tag = tag::Tag::decode(tag, self.prefix)?;
        let mut flag = if tag.positional {
            Flag::positional(value, &tag.usage)
        } else if tag.switch {
            Flag::switch(value, &tag.usage)
        } else {
            Flag::optional(value, &tag.usage)
        };
        if let Some(nargs) = tag.nargs {
            flag.set_arity(nargs)?;
        }

        let names = tag.names(field, self.prefix);
        let aliases = names[1..].iter().map(String::as_str).collect::<Vec<_>>();
        self.add(flag, &names[0], &aliases)?;
        Ok(())
    }

    /// Looks up a flag by any of its names.
    pub fn flag(&self, name: &str) -> Option<&Flag<'a>> {
        let idx = match self.optionals.get(name) {
            Some(&idx) => idx,
            None => *self.positionals.iter().find(|&&idx| self.entries[idx].names[0] == name)?,
        };
        Some(&self.entries[idx].flag)
    }

    /// Positional flags in matching order.
    pub fn positionals(&self) -> impl Iterator<Item = (&str, &Flag<'a>)> + '_ {
        self.positionals.iter().map(move |&idx| {
            let entry = &self.entries[idx];
            (entry.names[0].as_str(), &entry.flag)
        })
    }

    /// Optional flags in the order they were added, each with all its names.
    pub fn optionals(&self) -> impl Iterator<Item = (&[String], &Flag<'a>)> + '_ {
        self.entries
            .iter()
            .filter(|it| !it.flag.positional)
            .map(|it| (it.names.as_slice(), &it.flag))
    }

    /// Parses the stored tokens, writing into the bound variables.
    ///
    /// Stops at the first problem. Flags matched before it keep their new
    /// values.
    pub fn parse(&mut self) -> Result<()> {
        let args = mem::take(&mut self.args);
        let res = parser::Session::new(self, &args).run();
        self.args = args;
        res
    }

    pub fn parse_from<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_args(args);
        self.parse()
    }

    pub fn usage(&self) -> String {
        match &self.usage {
            Some(usage) => usage(self),
            None => usage::render(self),
        }
    }

    /// Like [`parse`](FlagSet::parse), but on failure writes the usage text,
    /// preceded by the error unless help was requested, to the output.
    pub fn parse_and_report(&mut self) -> Result<()> {
        tracing::trace!(program = %self.program, tokens = self.args.len(), "parsing flags");
        let err = match self.parse() {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };
        if err.is_help() {
            tracing::debug!(program = %self.program, "help requested");
        } else {
            tracing::debug!(program = %self.program, error = %err, "failed to parse flags");
        }

        let mut text = String::new();
        if !err.is_help() {
            text.push_str(&format!("{err}\n\n"));
        }
        text.push_str(&self.usage());
        if let Err(io_err) = self.output.write_all(text.as_bytes()).and_then(|()| self.output.flush()) {
            tracing::warn!(program = %self.program, error = %io_err, "failed to write usage");
        }
        Err(err)
    }

    /// Like [`parse_and_report`](FlagSet::parse_and_report), but terminates
    /// the process on failure.
    pub fn parse_or_exit(&mut self) {
        if let Err(err) = self.parse_and_report() {
            process::exit(err.exit_code())
        }
    }
}

impl fmt::Debug for FlagSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSet")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("positionals", &self.positionals().collect::<Vec<_>>())
            .field("optionals", &self.optionals().collect::<Vec<_>>())
            .finish()
    }
}
