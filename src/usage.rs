use std::fmt::Write;

use crate::{flag::Arity, flagset::FlagSet};

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

pub(crate) fn render(fs: &FlagSet<'_>) -> String {
    let mut buf = String::new();

    w!(buf, "Usage: {} [OPTIONS]", fs.program());
    for (name, flag) in fs.positionals() {
        let dots = if flag.arity() == Arity::Unlimited { "..." } else { "" };
        w!(buf, " <{}>{}", name, dots);
    }
    w!(buf, "\n");

    if let Some(desc) = fs.description() {
        w!(buf, "\n{}\n", desc);
    }

    if fs.positionals().next().is_some() {
        w!(buf, "\nARGS:\n");
        let mut blank = "";
        for (name, flag) in fs.positionals() {
            w!(buf, "{}", blank);
            blank = "\n";

            w!(buf, "    <{}>  {}\n", name, flag.value().get().type_name());
            if !flag.usage().is_empty() {
                w!(buf, "      {}\n", flag.usage());
            }
        }
    }

    w!(buf, "\nOPTIONS:\n");
    for (names, flag) in fs.optionals() {
        w!(buf, "    {}", names.join(", "));
        if !flag.is_switch() {
            w!(buf, " <{}>", flag.value().get().type_name());
        }
        w!(buf, "\n");

        let default = match flag.default_rendering() {
            "" => String::new(),
            it => format!("(default: {it})"),
        };
        let line = [flag.usage(), default.as_str()]
            .into_iter()
            .filter(|it| !it.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !line.is_empty() {
            w!(buf, "      {}\n", line);
        }
        w!(buf, "\n");
    }
    let [short, long] = fs.help_names();
    w!(buf, "    {}, {}\n", short, long);
    w!(buf, "      Show this usage message and exit\n");

    buf
}
