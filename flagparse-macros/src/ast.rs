#[derive(Debug)]
pub(crate) struct FlagsStruct {
    pub(crate) name: String,
    /// Doc comment lines as string literals, exactly as written in the source.
    pub(crate) doc: Vec<String>,
    pub(crate) fields: Vec<Field>,
}

#[derive(Debug)]
pub(crate) struct Field {
    pub(crate) name: String,
    /// The `#[flagparse(...)]` string literal, exactly as written in the source.
    pub(crate) tag: String,
}
