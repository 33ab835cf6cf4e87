use flagparse::{Flag, FlagSet};

fn main() -> flagparse::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut name = String::new();
    let mut times = 1isize;
    let mut emoji = false;
    let mut others = Vec::<String>::new();

    let mut fs = FlagSet::from_env();
    fs.set_description("Says hello.");
    fs.add(Flag::positional(&mut name, "Who to greet"), "name", &[])?;
    fs.add(Flag::optional(&mut times, "How many times"), "--times", &["-t"])?;
    fs.add(Flag::switch(&mut emoji, "Use an emoji"), "--emoji", &["-e"])?;
    let mut and = Flag::optional(&mut others, "More people to greet");
    and.set_arity(-1isize)?;
    fs.add(and, "--and", &[])?;
    fs.parse_or_exit();
    drop(fs);

    let bang = if emoji { "❣️" } else { "!" };
    others.insert(0, name);
    for _ in 0..times {
        println!("Hello {}{}", others.join(", "), bang);
    }
    Ok(())
}
