//! Decoding of `key=value,...` flag tags, as used by `#[derive(Flags)]`.
//!
//! Recognized fragments:
//!
//! * `positional` creates a positional flag instead of an optional one,
//! * `switch` creates an optional flag which takes no values,
//! * `name=<name>[:<alias>...]` sets the name(s),
//! * `usage=<text>` sets the usage text,
//! * `nargs=<n>` sets the arity, see [`Arity`](crate::Arity).
//!
//! A backslash escapes the next character, so `usage=hello\, world` keeps
//! its comma.
use crate::{value, DecodeError};

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Tag {
    pub(crate) positional: bool,
    pub(crate) switch: bool,
    pub(crate) names: Vec<String>,
    pub(crate) usage: String,
    pub(crate) nargs: Option<isize>,
}

fn bad(fragment: &str, reason: &str) -> DecodeError {
    DecodeError { fragment: fragment.to_string(), reason: reason.to_string() }
}

/// Splits on every `sep` not preceded by a backslash and drops the escaping
/// backslashes. Empty parts are skipped.
pub(crate) fn split_escaped(src: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut chars = src.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => buf.extend(chars.next()),
            c if c == sep => {
                if !buf.is_empty() {
                    parts.push(std::mem::take(&mut buf));
                }
            }
            c => buf.push(c),
        }
    }
    if !buf.is_empty() {
        parts.push(buf);
    }
    parts
}

impl Tag {
    pub(crate) fn decode(src: &str, prefix: char) -> Result<Tag, DecodeError> {
        let mut res = Tag::default();
        let mut seen: Vec<String> = Vec::new();

        for fragment in split_escaped(src, ',') {
            let (key, val) = match fragment.split_once('=') {
                Some((key, val)) => (key, Some(val)),
                None => (fragment.as_str(), None),
            };
            if seen.iter().any(|it| it == key) {
                return Err(bad(&fragment, "key given more than once"));
            }

            match (key, val) {
                ("positional", None) => res.positional = true,
                ("switch", None) => res.switch = true,
                ("positional" | "switch", Some(_)) => {
                    return Err(bad(&fragment, "key does not take a value"))
                }
                ("name" | "usage" | "nargs", None | Some("")) => {
                    return Err(bad(&fragment, "missing value"))
                }
                ("name", Some(val)) => {
                    let names = val.split(':').map(str::to_string).collect::<Vec<_>>();
                    let valid = |name: &String| {
                        name.chars().any(|c| c.is_ascii_alphanumeric())
                            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == prefix)
                    };
                    if !names.iter().all(valid) {
                        return Err(bad(&fragment, "invalid name"));
                    }
                    res.names = names;
                }
                ("usage", Some(val)) => res.usage = val.to_string(),
                ("nargs", Some(val)) => {
                    let n = value::parse_int(val).map_err(|err| bad(&fragment, &err.to_string()))?;
                    res.nargs = Some(n);
                }
                _ => return Err(bad(&fragment, "unknown key")),
            }
            seen.push(key.to_string());
        }

        if res.switch && res.positional {
            return Err(bad("switch", "a positional flag can not be a switch"));
        }
        if let (true, Some(n)) = (res.switch, res.nargs) {
            if n != 0 {
                return Err(bad(&format!("nargs={n}"), "a switch takes no values"));
            }
        }
        if res.positional && res.names.len() > 1 {
            return Err(bad(&format!("name={}", res.names.join(":")), "positional flags have no aliases"));
        }
        Ok(res)
    }

    /// Flag names, primary first. Optional flag names get the prefix when they
    /// lack it: one for a single character, two otherwise.
    pub(crate) fn names(&self, field: &str, prefix: char) -> Vec<String> {
        let names = if self.names.is_empty() {
            let field = field.strip_prefix("r#").unwrap_or(field).trim_start_matches('_');
            vec![field.to_lowercase().replace('_', "-")]
        } else {
            self.names.clone()
        };
        if self.positional {
            return names;
        }
        names
            .into_iter()
            .map(|name| match name.chars().count() {
                _ if name.starts_with(prefix) => name,
                1 => format!("{prefix}{name}"),
                _ => format!("{prefix}{prefix}{name}"),
            })
            .collect()
    }
}
