use crate::{flag::Arity, flagset::FlagSet, ArityError, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    /// Index of the entry whose values start at the cursor.
    Positional(usize),
    /// Index of the entry whose name is at the cursor.
    Optional(usize),
}

/// A single walk over the tokens of a [`FlagSet`].
pub(crate) struct Session<'s, 'a> {
    fs: &'s mut FlagSet<'a>,
    args: &'s [String],
    cursor: usize,
    next_positional: usize,
    visited: Vec<bool>,
}

impl<'s, 'a> Session<'s, 'a> {
    pub(crate) fn new(fs: &'s mut FlagSet<'a>, args: &'s [String]) -> Self {
        let visited = vec![false; fs.entries.len()];
        Session { fs, args, cursor: 0, next_positional: 0, visited }
    }

    pub(crate) fn run(mut self) -> Result<()> {
        let mut state = State::Idle;
        while self.cursor < self.args.len() {
            state = match state {
                State::Idle => self.open()?,
                State::Positional(idx) => self.consume_positional(idx)?,
                State::Optional(idx) => self.consume_optional(idx)?,
            };
        }
        self.finish()
    }

    /// Decides what the token at the cursor starts, without consuming it.
    fn open(&self) -> Result<State> {
        let token = &self.args[self.cursor];
        if self.fs.is_help(token) {
            return Err(Error::HelpRequested);
        }

        if self.fs.is_optional_name(token) {
            let idx = match self.fs.optionals.get(token.as_str()) {
                Some(&idx) => idx,
                None => return Err(Error::UnknownFlag(token.clone())),
            };
            if self.visited[idx] {
                return Err(Error::DuplicateFlag(token.clone()));
            }
            return Ok(State::Optional(idx));
        }

        match self.fs.positionals.get(self.next_positional) {
            Some(&idx) => Ok(State::Positional(idx)),
            None => Err(Error::UnrecognizedArgument(token.clone())),
        }
    }

    fn consume_positional(&mut self, idx: usize) -> Result<State> {
        let args = self.args;
        let name = self.fs.entries[idx].names[0].clone();
        let given = &args[self.cursor..];
        let n = self.count(idx, &name, given.len())?;
        self.set(idx, &name, &given[..n])?;
        self.cursor += n;
        self.next_positional += 1;
        Ok(State::Idle)
    }

    fn consume_optional(&mut self, idx: usize) -> Result<State> {
        let args = self.args;
        let name = &args[self.cursor];
        let given = &args[self.cursor + 1..];
        let n = self.count(idx, name, given.len())?;
        self.set(idx, name, &given[..n])?;
        self.cursor += 1 + n;
        Ok(State::Idle)
    }

    /// How many of the `given` tokens the flag takes.
    fn count(&self, idx: usize, name: &str, given: usize) -> Result<usize, ArityError> {
        match self.fs.entries[idx].flag.arity {
            Arity::Switch => Ok(0),
            Arity::Fixed(n) if n <= given => Ok(n),
            Arity::Unlimited if given > 0 => Ok(given),
            required => Err(ArityError::NotEnough { flag: name.to_string(), required, given }),
        }
    }

    fn set(&mut self, idx: usize, name: &str, tokens: &[String]) -> Result<()> {
        let tokens = tokens.iter().map(String::as_str).collect::<Vec<_>>();
        self.fs.entries[idx]
            .flag
            .value
            .set(&tokens)
            .map_err(|source| Error::Conversion { flag: name.to_string(), source })?;
        self.visited[idx] = true;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        let missing = self
            .fs
            .positionals
            .iter()
            .filter(|&&idx| !self.visited[idx])
            .map(|&idx| self.fs.entries[idx].names[0].clone())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(Error::MissingRequiredArgument(missing));
        }
        Ok(())
    }
}
