use std::{fmt, mem};

#[cfg(not(test))]
use proc_macro::{Delimiter, Spacing, TokenStream, TokenTree};
#[cfg(test)]
use proc_macro2::{Delimiter, Spacing, TokenStream, TokenTree};

use crate::ast;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub(crate) struct Error {
    msg: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.msg, f)
    }
}

macro_rules! format_err {
    ($($tt:tt)*) => {
        Error { msg: format!($($tt)*) }
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err(format_err!($($tt)*))
    };
}

pub(crate) fn flags(ts: TokenStream) -> Result<ast::FlagsStruct> {
    let mut p = Parser::new(ts);

    let struct_attrs = attrs(&mut p)?;
    if struct_attrs.tag.is_some() {
        bail!("`#[flagparse]` belongs on fields, not on the struct")
    }
    visibility(&mut p);
    if !p.eat_keyword("struct") {
        bail!("`derive(Flags)` only supports structs")
    }
    let name = p.expect_ident()?;
    if p.at_punct('<') {
        bail!("generic structs are not supported: `{}`", name)
    }
    if !p.at_delim(Delimiter::Brace) {
        bail!("expected a struct with named fields: `{}`", name)
    }

    let mut res = ast::FlagsStruct { name, doc: struct_attrs.doc, fields: Vec::new() };
    p.enter_delim(Delimiter::Brace)?;
    while !p.end() {
        let field_attrs = attrs(&mut p)?;
        visibility(&mut p);
        let name = p.expect_ident()?;
        p.expect_punct(':')?;
        skip_ty(&mut p);
        if let Some(tag) = field_attrs.tag {
            res.fields.push(ast::Field { name, tag });
        }
    }
    p.exit_delim()?;
    Ok(res)
}

#[derive(Default)]
struct Attrs {
    doc: Vec<String>,
    tag: Option<String>,
}

fn attrs(p: &mut Parser) -> Result<Attrs> {
    let mut res = Attrs::default();
    while p.eat_punct('#') {
        p.enter_delim(Delimiter::Bracket)?;
        if p.eat_keyword("doc") {
            p.expect_punct('=')?;
            res.doc.push(p.expect_string()?);
        } else if p.eat_keyword("flagparse") {
            if res.tag.is_some() {
                bail!("`#[flagparse]` given more than once")
            }
            let tag = if p.at_delim(Delimiter::Parenthesis) {
                p.enter_delim(Delimiter::Parenthesis)?;
                let tag = p.expect_string()?;
                p.exit_delim()?;
                tag
            } else {
                "\"\"".to_string()
            };
            res.tag = Some(tag);
        } else {
            // Somebody else's attribute.
            p.ts.clear();
        }
        p.exit_delim()?;
    }
    Ok(res)
}

fn visibility(p: &mut Parser) {
    if p.eat_keyword("pub") && p.at_delim(Delimiter::Parenthesis) {
        p.ts.pop();
    }
}

/// Skips a field type together with the `,` after it.
fn skip_ty(p: &mut Parser) {
    let mut depth = 0usize;
    let mut after_minus = false;
    while let Some(tt) = p.ts.pop() {
        let mut minus = false;
        if let TokenTree::Punct(punct) = &tt {
            match punct.as_char() {
                ',' if depth == 0 => break,
                '<' => depth += 1,
                // `->` of a fn pointer type.
                '>' if !after_minus => depth = depth.saturating_sub(1),
                '-' => minus = punct.spacing() == Spacing::Joint,
                _ => (),
            }
        }
        after_minus = minus;
    }
}

struct Parser {
    stack: Vec<Vec<TokenTree>>,
    ts: Vec<TokenTree>,
}

impl Parser {
    fn new(ts: TokenStream) -> Self {
        let mut ts = ts.into_iter().collect::<Vec<_>>();
        ts.reverse();
        Self { stack: Vec::new(), ts }
    }

    fn at_delim(&mut self, delimiter: Delimiter) -> bool {
        match self.ts.last() {
            Some(TokenTree::Group(g)) => g.delimiter() == delimiter,
            _ => false,
        }
    }
    fn enter_delim(&mut self, delimiter: Delimiter) -> Result<()> {
        match self.ts.pop() {
            Some(TokenTree::Group(g)) if g.delimiter() == delimiter => {
                let mut ts = g.stream().into_iter().collect::<Vec<_>>();
                ts.reverse();
                let ts = mem::replace(&mut self.ts, ts);
                self.stack.push(ts);
            }
            _ => bail!("expected `{}`", open_char(delimiter)),
        }
        Ok(())
    }
    fn exit_delim(&mut self) -> Result<()> {
        if !self.end() {
            let next = self.ts.last().map(|it| it.to_string()).unwrap_or_default();
            bail!("unexpected `{}`", next)
        }
        match self.stack.pop() {
            Some(ts) => self.ts = ts,
            None => bail!("unbalanced delimiters"),
        }
        Ok(())
    }
    fn end(&mut self) -> bool {
        self.ts.last().is_none()
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        match self.ts.last() {
            Some(TokenTree::Ident(ident)) if ident.to_string() == kw => {
                self.ts.pop();
                true
            }
            _ => false,
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Ident(ident)) => Ok(ident.to_string()),
            Some(tt) => bail!("expected an identifier, got: `{}`", tt),
            None => bail!("expected an identifier"),
        }
    }

    fn expect_punct(&mut self, punct: char) -> Result<()> {
        if !self.eat_punct(punct) {
            bail!("expected `{}`", punct)
        }
        Ok(())
    }
    fn eat_punct(&mut self, punct: char) -> bool {
        if self.at_punct(punct) {
            self.ts.pop();
            true
        } else {
            false
        }
    }
    fn at_punct(&mut self, punct: char) -> bool {
        match self.ts.last() {
            Some(TokenTree::Punct(p)) => p.as_char() == punct,
            _ => false,
        }
    }

    /// A string literal in its source form, quotes included.
    fn expect_string(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Literal(lit)) => {
                let text = lit.to_string();
                if text.starts_with('"') || text.starts_with("r\"") || text.starts_with("r#") {
                    Ok(text)
                } else {
                    bail!("expected a string, got: `{}`", text)
                }
            }
            _ => bail!("expected a string"),
        }
    }
}

fn open_char(delimiter: Delimiter) -> &'static str {
    match delimiter {
        Delimiter::Brace => "{",
        Delimiter::Bracket => "[",
        Delimiter::Parenthesis => "(",
        Delimiter::None => "group",
    }
}
