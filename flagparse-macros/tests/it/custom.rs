use flagparse::{ConversionError, Data, Flags, Value};

#[derive(Debug, Default, Flags)]
pub struct BadNargs {
    #[flagparse("positional,nargs=0")]
    pub count: isize,
}

#[derive(Debug, Default, Flags)]
pub struct BadKey {
    #[flagparse("help=hi")]
    pub count: isize,
}

#[derive(Debug, Default, Flags)]
pub struct ReservedName {
    #[flagparse("switch")]
    pub help: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warn,
    #[default]
    Info,
}

impl Value for &mut Level {
    fn set(&mut self, values: &[&str]) -> Result<(), ConversionError> {
        let value = match values.first() {
            Some(it) => *it,
            None => return Ok(()),
        };
        **self = match value {
            "error" => Level::Error,
            "warn" => Level::Warn,
            "info" => Level::Info,
            _ => return Err(ConversionError::new(value, "Level", "expected one of error, warn, info")),
        };
        Ok(())
    }

    fn get(&self) -> Data {
        Data::Custom { type_name: "Level", rendered: self.render() }
    }

    fn render(&self) -> String {
        format!("{:?}", **self).to_lowercase()
    }
}

#[derive(Debug, Default, Flags)]
pub struct Logging {
    #[flagparse]
    pub level: Level,
}
