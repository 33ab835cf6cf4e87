use expect_test::{expect, Expect};
use flagparse::{Arity, Flag, FlagSet, RegistrationError};

fn check(res: Result<(), RegistrationError>, expect: Expect) {
    expect.assert_eq(&res.unwrap_err().to_string());
}

#[test]
fn invalid_names() {
    let (mut a, mut b) = (0isize, 0isize);
    check(
        FlagSet::new("names").add(Flag::positional(&mut a, ""), "--pos", &[]),
        expect![[r#""--pos" is not a valid positional flag name"#]],
    );
    check(
        FlagSet::new("names").add(Flag::positional(&mut a, ""), "-x", &[]),
        expect![[r#""-x" is not a valid positional flag name"#]],
    );
    check(
        FlagSet::new("names").add(Flag::optional(&mut b, ""), "opt", &[]),
        expect![[r#""opt" is not a valid optional flag name"#]],
    );
    check(
        FlagSet::new("names").add(Flag::optional(&mut b, ""), "--", &[]),
        expect![[r#""--" is not a valid optional flag name"#]],
    );
    check(
        FlagSet::new("names").add(Flag::optional(&mut b, ""), "--with space", &[]),
        expect![[r#""--with space" is not a valid optional flag name"#]],
    );
}

#[test]
fn rejected_add_keeps_nothing() {
    let mut b = 0isize;
    let mut fs = FlagSet::new("names");
    check(
        fs.add(Flag::optional(&mut b, ""), "--ok", &["-o", "no-prefix"]),
        expect![[r#""no-prefix" is not a valid optional flag name"#]],
    );
    assert!(fs.flag("--ok").is_none());
    assert!(fs.flag("-o").is_none());
    assert_eq!(fs.optionals().count(), 0);
    assert_eq!(fs.positionals().count(), 0);
}

#[test]
fn reserved_and_duplicate_names() {
    let (mut a, mut c) = (0isize, false);
    let (mut d1, mut d2, mut d3, mut d4, mut d5) = (0isize, false, false, false, false);
    let mut fs = FlagSet::new("dups");
    fs.add(Flag::positional(&mut a, ""), "a", &[]).unwrap();
    fs.add(Flag::switch(&mut c, ""), "--c", &["-c"]).unwrap();

    check(
        fs.add(Flag::positional(&mut d1, ""), "a", &[]),
        expect![[r#"positional flag with name "a" already exists"#]],
    );
    check(
        fs.add(Flag::switch(&mut d2, ""), "--d", &["-c"]),
        expect![[r#"optional flag with name "-c" already exists"#]],
    );
    check(
        fs.add(Flag::switch(&mut d3, ""), "--d", &["-D", "-D"]),
        expect![[r#"optional flag with name "-D" already exists"#]],
    );
    check(
        fs.add(Flag::switch(&mut d4, ""), "--help", &[]),
        expect![[r#""--help" is reserved for the help flag"#]],
    );
    check(
        fs.add(Flag::switch(&mut d5, ""), "--d", &["-h"]),
        expect![[r#""-h" is reserved for the help flag"#]],
    );
    assert!(fs.flag("--d").is_none());
}

#[test]
fn kinds_are_checked() {
    let (mut a, mut b) = (0isize, 0isize);
    check(
        FlagSet::new("kinds").add_positional("a", Flag::optional(&mut a, "")),
        expect![[r#"flag "a" is optional, it can not be added as a positional flag"#]],
    );
    check(
        FlagSet::new("kinds").add_optional("--b", Flag::positional(&mut b, ""), &[]),
        expect![[r#"flag "--b" is positional, it can not be added as an optional flag"#]],
    );
    check(
        FlagSet::new("kinds").add(Flag::positional(&mut b, ""), "b", &["c"]),
        expect![[r#"positional flag "b" can not have aliases, got "c""#]],
    );
}

#[test]
fn leading_underscores_are_not_prefixes() {
    let (mut verbose, mut count) = (false, 0isize);
    let mut fs = FlagSet::new("underscores");
    fs.add_from_tag(&mut verbose, "switch", "_verbose").unwrap();
    fs.add_from_tag(&mut count, "positional", "_count").unwrap();
    assert!(fs.flag("--verbose").is_some());
    assert!(fs.flag("-verbose").is_none());
    assert!(fs.flag("count").is_some());
}

#[test]
fn nothing_to_add() {
    let mut fs = FlagSet::new("none");
    fs.add(None::<Flag<'_>>, "--whatever", &[]).unwrap();
    fs.add_positional("no syntax check either", None::<Flag<'_>>).unwrap();
    assert_eq!(fs.optionals().count() + fs.positionals().count(), 0);
}

#[test]
fn nothing_after_unlimited_positional() {
    let (mut files, mut last) = (Vec::<String>::new(), String::new());
    let mut fs = FlagSet::new("unreachable");
    let mut flag = Flag::positional(&mut files, "");
    flag.set_arity(Arity::Unlimited).unwrap();
    fs.add(flag, "files", &[]).unwrap();
    check(
        fs.add(Flag::positional(&mut last, ""), "last", &[]),
        expect![[r#"positional flag "last" can never get a value, "files" takes all remaining arguments"#]],
    );
}

#[test]
fn aliases_share_one_flag() {
    let mut verbose = false;
    let mut fs = FlagSet::new("alias");
    fs.add(Flag::switch(&mut verbose, "talk more"), "--verbose", &["-v", "--loud"]).unwrap();

    let names = fs.optionals().map(|(names, _)| names.join(",")).collect::<Vec<_>>();
    assert_eq!(names, ["--verbose,-v,--loud"]);
    assert!(std::ptr::eq(fs.flag("-v").unwrap(), fs.flag("--loud").unwrap()));
    assert_eq!(fs.flag("--loud").unwrap().usage(), "talk more");

    fs.parse_from(["--loud"]).unwrap();
    expect![[r#"flag `-v` already given"#]]
        .assert_eq(&fs.parse_from(["--loud", "-v"]).unwrap_err().to_string());
}

#[test]
fn prefix_must_be_punctuation() {
    assert_eq!(FlagSet::new("p").with_prefix('x').unwrap_err(), RegistrationError::InvalidPrefix('x'));
    assert_eq!(FlagSet::new("p").with_prefix('+').unwrap().prefix(), '+');

    let mut v = false;
    let mut fs = FlagSet::new("p");
    fs.add(Flag::switch(&mut v, ""), "--v", &[]).unwrap();
    assert!(fs.with_prefix('+').is_err());
}

#[test]
fn from_tag() {
    let (mut count, mut names, mut verbose) = (0isize, Vec::<String>::new(), false);
    let mut fs = FlagSet::new("tags");
    fs.add_from_tag(&mut count, "positional,usage=How many", "count").unwrap();
    fs.add_from_tag(&mut names, "name=name:n,nargs=-1", "names").unwrap();
    fs.add_from_tag(&mut verbose, "switch", "is_verbose").unwrap();

    expect![[r#"
        FlagSet {
            program: "tags",
            args: [],
            positionals: [
                (
                    "count",
                    Flag {
                        positional: true,
                        arity: Fixed(
                            1,
                        ),
                        usage: "How many",
                        default: "0",
                        value: "0",
                    },
                ),
            ],
            optionals: [
                (
                    [
                        "--name",
                        "-n",
                    ],
                    Flag {
                        positional: false,
                        arity: Unlimited,
                        usage: "",
                        default: "[]",
                        value: "[]",
                    },
                ),
                (
                    [
                        "--is-verbose",
                    ],
                    Flag {
                        positional: false,
                        arity: Switch,
                        usage: "",
                        default: "",
                        value: "false",
                    },
                ),
            ],
        }
    "#]]
    .assert_debug_eq(&fs);

    fs.parse_from(["3", "--is-verbose", "-n", "a", "b"]).unwrap();
    drop(fs);
    assert_eq!((count, names.len(), verbose), (3, 2, true));
}

#[test]
fn from_tag_errors() {
    let mut n = 0isize;
    let mut err = |tag: &str| FlagSet::new("tags").add_from_tag(&mut n, tag, "n").unwrap_err().to_string();

    expect![[r#"invalid tag fragment `hello=hi`: unknown key"#]].assert_eq(&err("hello=hi"));
    expect![[r#"nargs cannot be 0 for a positional flag"#]].assert_eq(&err("positional,nargs=0"));
    expect![[r#""--pos-name" is not a valid positional flag name"#]]
        .assert_eq(&err("positional,name=--pos-name"));
    expect![[r#""-h" is reserved for the help flag"#]].assert_eq(&err("name=h"));
    expect![[r#"invalid tag fragment `nargs=1`: a switch takes no values"#]].assert_eq(&err("switch,nargs=1"));
}
