mod ast;
mod parse;
mod emit;

#[proc_macro_derive(Flags, attributes(flagparse))]
pub fn derive_flags(_ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    // Stub out the code, but let rust-analyzer resolve the invocation
    #[cfg(not(test))]
    {
        let text = match parse::flags(_ts) {
            Ok(flags) => emit::emit(&flags),
            Err(err) => {
                let msg = format!("invalid `derive(Flags)` input, {err}");
                format!("compile_error!({msg:?});")
            }
        };
        text.parse().unwrap()
    }
    #[cfg(test)]
    unimplemented!()
}

#[cfg(test)]
pub fn compile(src: &str) -> String {
    use proc_macro2::TokenStream;

    let ts = src.parse::<TokenStream>().unwrap();
    let flags = parse::flags(ts).unwrap();
    emit::emit(&flags)
}
