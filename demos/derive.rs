use flagparse::Flags;

/// Adds a new employee to the database.
#[derive(Debug, Default, Flags)]
struct Employee {
    #[flagparse("positional,usage=Full name of the employee")]
    full_name: String,
    #[flagparse("positional,usage=Yearly salary")]
    salary: f64,
    #[flagparse("name=emp-id:i,nargs=3,usage=Employee IDs")]
    emp_id: Vec<isize>,
    #[flagparse("switch,usage=Is the new employee an intern")]
    is_intern: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut emp = Employee::default();
    match emp.flag_set() {
        Ok(mut fs) => fs.parse_or_exit(),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2)
        }
    }
    println!("{emp:#?}");
}
