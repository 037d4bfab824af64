use std::any::Any;
use std::fmt::Write;
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};

use gluap::diag::render;
use gluap::syn::SynEq;
use gluap::{Dialect, ParseConfig, ParseDiag};

const FILTER_VAR: &str = "PARSE_TEST_FILTER";

/// One test case: a whole file, or a section of one introduced by a `--CASE <name>` line.
///
/// Lines starting with `--EXPECT ` are not part of the source; each one names a fragment that
/// must appear in the rendered diagnostics. A `--DIALECT lua52` line parses the case as plain Lua.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub content: String,
    pub expect: Vec<String>,
    pub dialect: Dialect,
}

fn base_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("parse")
}

fn collect_files(base_path: &Path) -> impl Iterator<Item = PathBuf> {
    let filter = std::env::var(FILTER_VAR);

    let filter_fn = move |entry: DirEntry| {
        if !entry.file_type().ok()?.is_file() {
            return None;
        }

        let path = entry.path();
        if let Ok(filter) = &filter {
            if !path.to_string_lossy().contains(filter.as_str()) {
                return None;
            }
        }

        (path.extension()? == "lua").then_some(path)
    };

    let mut paths: Vec<_> = fs::read_dir(base_path)
        .unwrap()
        .filter_map(Result::ok)
        .filter_map(filter_fn)
        .collect();
    paths.sort();
    paths
        .into_iter()
        .inspect(|path| eprintln!("collected test {}", path.display()))
}

pub fn collect_cases_from_file(base_name: &str, file_content: &str) -> Vec<TestCase> {
    let mut cases = Vec::new();
    let mut case = TestCase {
        name: base_name.into(),
        ..Default::default()
    };

    for line in file_content.lines() {
        if let Some(name) = line.strip_prefix("--CASE ") {
            let next = TestCase {
                name: format!("{base_name}@{}", name.trim()),
                ..Default::default()
            };
            let done = std::mem::replace(&mut case, next);
            if !done.content.trim().is_empty() {
                cases.push(done);
            }
        } else if let Some(fragment) = line.strip_prefix("--EXPECT ") {
            case.expect.push(fragment.trim().into());
        } else if let Some(dialect) = line.strip_prefix("--DIALECT ") {
            case.dialect = match dialect.trim() {
                "lua52" => Dialect::Lua52,
                _ => Dialect::GLua,
            };
        } else {
            writeln!(case.content, "{line}").unwrap();
        }
    }

    if !case.content.trim().is_empty() {
        cases.push(case);
    }
    cases
}

fn rendered(case: &TestCase, diags: &[ParseDiag]) -> String {
    render(&case.name, &case.content, diags.iter().cloned()).unwrap()
}

fn success_test(case: TestCase) {
    let config = ParseConfig::default().with_dialect(case.dialect);
    let (first, diags) = gluap::parse_with_config(&case.content, &config);
    assert!(
        diags.is_empty(),
        "{} parsed with diagnostics:\n{}",
        case.name,
        rendered(&case, &diags)
    );

    let printed = first.to_string();
    let (reparse, diags) = gluap::parse_with_config(&printed, &config);
    assert!(
        diags.is_empty(),
        "{} failed to reparse after pretty-printing:\n{printed}",
        case.name
    );
    assert!(
        first.block.syn_eq(&reparse.block),
        "{} failed reparse check\n::First::\n{first}\n\n::Reparse::\n{reparse}",
        case.name
    );
}

fn err_test(case: TestCase) {
    let config = ParseConfig::default().with_dialect(case.dialect);
    let (chunk, diags) = gluap::parse_with_config(&case.content, &config);
    assert!(
        diags.iter().any(ParseDiag::is_error),
        "{} parsed without error:\n{chunk}",
        case.name
    );

    let output = rendered(&case, &diags);
    for fragment in &case.expect {
        assert!(
            output.contains(fragment.as_str()),
            "{}: diagnostics do not mention {fragment:?}:\n{output}",
            case.name
        );
    }

    // The recovered tree prints as something the parser accepts without getting stuck.
    let printed = chunk.to_string();
    let (reparse, _) = gluap::parse_with_config(&printed, &config);
    assert_eq!(
        reparse.block.stmts.len(),
        chunk.block.stmts.len(),
        "{}: recovered tree reparses differently:\n{printed}",
        case.name
    );
}

fn file_test(path: PathBuf) -> Option<Box<dyn Any + Send>> {
    eprintln!("file test for {}", path.display());
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    let content = fs::read_to_string(&path)
        .inspect_err(|_| eprintln!("error reading {}", path.display()))
        .unwrap();

    let mut panic_cause = None;
    for case in collect_cases_from_file(&name, &content) {
        let is_err = name.starts_with("err_");
        let res = std::panic::catch_unwind(|| {
            if is_err {
                eprintln!(" => err test {}", case.name);
                err_test(case);
            } else {
                eprintln!(" => success test {}", case.name);
                success_test(case);
            }
        });
        if let Err(cause) = res {
            panic_cause = Some(cause);
        }
    }
    panic_cause
}

#[test]
fn parse_tests() {
    let mut cause: Option<Box<dyn Any + Send>> = None;

    for path in collect_files(&base_path()) {
        if let Some(c) = file_test(path) {
            cause = Some(c);
        }
    }

    if let Some(cause) = cause {
        std::panic::resume_unwind(cause);
    }
}

#[test]
fn cases_are_split() {
    let content = indoc::indoc! {"
        x = 1
        --CASE second
        --EXPECT unexpected
        --DIALECT lua52
        y =
        --CASE empty
    "};
    let cases = collect_cases_from_file("f.lua", content);
    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0].name, "f.lua");
    assert_eq!(cases[0].content, "x = 1\n");
    assert_eq!(cases[1].name, "f.lua@second");
    assert_eq!(cases[1].content, "y =\n");
    assert_eq!(cases[1].expect, ["unexpected"]);
    assert_eq!(cases[1].dialect, Dialect::Lua52);
}
