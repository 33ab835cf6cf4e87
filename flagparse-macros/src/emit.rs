use std::fmt::Write;

use crate::ast;

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

pub(crate) fn emit(flags: &ast::FlagsStruct) -> String {
    let mut buf = String::new();

    w!(buf, "impl flagparse::Flags for {} {{\n", flags.name);
    w!(buf, "fn flag_set(&mut self) -> flagparse::Result<flagparse::FlagSet<'_>> {{\n");
    w!(buf, "#[allow(unused_mut)]\n");
    w!(buf, "let mut fs_ = flagparse::FlagSet::from_env();\n");
    if !flags.doc.is_empty() {
        w!(buf, "fs_.set_description([{}].map(str::trim).join(\"\\n\"));\n", flags.doc.join(", "));
    }
    for field in &flags.fields {
        w!(
            buf,
            "fs_.add_from_tag(&mut self.{}, {}, \"{}\")?;\n",
            field.name,
            field.tag,
            field.name
        );
    }
    w!(buf, "Ok(fs_)\n");
    w!(buf, "}}\n");
    w!(buf, "}}\n");

    buf
}
