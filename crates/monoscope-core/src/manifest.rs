//! `go.mod` reader
//!
//! Extracts the declared module path and the `require` entries. Everything
//! else a `go.mod` can say (`replace`, `exclude`, `retract`, ...) is accepted
//! and ignored.

use crate::error::ManifestError;
use crate::model::Requirement;
use std::path::Path;

/// Manifest file name looked up at the top level of every module directory.
pub const MANIFEST_FILE: &str = "go.mod";

/// Directives that are understood but carry nothing we use.
const IGNORED_DIRECTIVES: &[&str] = &[
    "toolchain", "godebug", "replace", "exclude", "retract", "tool", "ignore",
];

fn is_known_directive(verb: &str) -> bool {
    matches!(verb, "module" | "go" | "require") || IGNORED_DIRECTIVES.contains(&verb)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    /// Canonical module identifier.
    pub module: String,
    pub go_version: Option<String>,
    pub requires: Vec<Requirement>,
}

/// Read and parse the manifest at `path`.
pub fn read_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Manifest::parse(&content)
}

impl Manifest {
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let mut builder = Builder::default();
        let mut block: Option<(String, usize)> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = Line::lex(idx + 1, raw)?;
            if line.tokens.is_empty() {
                continue;
            }

            if let Some((verb, _)) = &block {
                if line.tokens.len() == 1 && line.tokens[0] == ")" {
                    block = None;
                    continue;
                }
                if line.tokens.iter().any(|t| t == "(" || t == ")") {
                    return Err(ManifestError::syntax(line.number, "unexpected parenthesis in block"));
                }
                builder.directive(verb, &line.tokens, &line)?;
                continue;
            }

            let verb = line.tokens[0].as_str();
            if verb == "(" || verb == ")" {
                return Err(ManifestError::syntax(line.number, format!("unexpected {verb}")));
            }
            let args = &line.tokens[1..];
            if args.first().is_some_and(|t| t == "(") {
                if !is_known_directive(verb) {
                    return Err(ManifestError::syntax(line.number, format!("unknown directive: {verb}")));
                }
                match &args[1..] {
                    // `require ()` opens and closes an empty block.
                    [close] if close == ")" => {}
                    [] => block = Some((verb.to_string(), line.number)),
                    _ => {
                        return Err(ManifestError::syntax(line.number, "unexpected tokens after ("));
                    }
                }
                continue;
            }
            if args.iter().any(|t| t == "(" || t == ")") {
                return Err(ManifestError::syntax(line.number, "unexpected parenthesis"));
            }
            builder.directive(verb, args, &line)?;
        }

        if let Some((verb, start)) = block {
            return Err(ManifestError::syntax(start, format!("unterminated {verb} block")));
        }
        builder.finish()
    }
}

#[derive(Default)]
struct Builder {
    module: Option<String>,
    go_version: Option<String>,
    requires: Vec<Requirement>,
}

impl Builder {
    fn directive(&mut self, verb: &str, args: &[String], line: &Line) -> Result<(), ManifestError> {
        match verb {
            "module" => {
                if self.module.is_some() {
                    return Err(ManifestError::syntax(line.number, "repeated module statement"));
                }
                match args {
                    [path] if !path.is_empty() => self.module = Some(path.clone()),
                    _ => return Err(ManifestError::syntax(line.number, "usage: module module/path")),
                }
            }
            "go" => {
                if self.go_version.is_some() {
                    return Err(ManifestError::syntax(line.number, "repeated go statement"));
                }
                match args {
                    [version] => self.go_version = Some(version.clone()),
                    _ => return Err(ManifestError::syntax(line.number, "usage: go 1.23")),
                }
            }
            "require" => match args {
                [path, version] => self.requires.push(Requirement {
                    path: path.clone(),
                    version: version.clone(),
                    indirect: line.is_indirect(),
                }),
                _ => {
                    return Err(ManifestError::syntax(
                        line.number,
                        "usage: require module/path v1.2.3",
                    ));
                }
            },
            other if IGNORED_DIRECTIVES.contains(&other) => {}
            other => {
                return Err(ManifestError::syntax(line.number, format!("unknown directive: {other}")));
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Manifest, ManifestError> {
        let module = self.module.ok_or(ManifestError::MissingModule)?;
        Ok(Manifest {
            module,
            go_version: self.go_version,
            requires: self.requires,
        })
    }
}

/// One lexed manifest line.
struct Line {
    number: usize,
    tokens: Vec<String>,
    comment: Option<String>,
}

impl Line {
    fn lex(number: usize, raw: &str) -> Result<Self, ManifestError> {
        let mut tokens = Vec::new();
        let mut comment = None;
        let mut chars = raw.char_indices().peekable();

        while let Some(&(start, c)) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
                continue;
            }
            if raw[start..].starts_with("//") {
                comment = Some(raw[start + 2..].trim().to_string());
                break;
            }
            match c {
                '(' | ')' => {
                    chars.next();
                    tokens.push(c.to_string());
                }
                '"' => {
                    chars.next();
                    let mut token = String::new();
                    let mut closed = false;
                    while let Some((_, c)) = chars.next() {
                        match c {
                            '"' => {
                                closed = true;
                                break;
                            }
                            '\\' => {
                                if let Some((_, escaped)) = chars.next() {
                                    token.push(escaped);
                                }
                            }
                            _ => token.push(c),
                        }
                    }
                    if !closed {
                        return Err(ManifestError::syntax(number, "unterminated quoted string"));
                    }
                    tokens.push(token);
                }
                '`' => {
                    chars.next();
                    let mut token = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '`' {
                            closed = true;
                            break;
                        }
                        token.push(c);
                    }
                    if !closed {
                        return Err(ManifestError::syntax(number, "unterminated raw string"));
                    }
                    tokens.push(token);
                }
                _ => {
                    let mut token = String::new();
                    while let Some(&(i, c)) = chars.peek() {
                        if c.is_whitespace()
                            || matches!(c, '(' | ')' | '"' | '`')
                            || raw[i..].starts_with("//")
                        {
                            break;
                        }
                        token.push(c);
                        chars.next();
                    }
                    tokens.push(token);
                }
            }
        }

        Ok(Line {
            number,
            tokens,
            comment,
        })
    }

    fn is_indirect(&self) -> bool {
        self.comment
            .as_deref()
            .is_some_and(|c| c == "indirect" || c.starts_with("indirect;"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block_and_single_requires() {
        let manifest = Manifest::parse(
            r#"
// shared helpers
module example.com/mono/api

go 1.22

require example.com/mono/core v0.0.0

require (
	example.com/mono/util v1.2.3
	github.com/pkg/errors v0.9.1 // indirect
	"example.com/mono/quoted" v0.1.0
)

replace example.com/mono/core => ../core
"#,
        )
        .unwrap();

        assert_eq!(manifest.module, "example.com/mono/api");
        assert_eq!(manifest.go_version.as_deref(), Some("1.22"));
        let paths: Vec<_> = manifest.requires.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "example.com/mono/core",
                "example.com/mono/util",
                "github.com/pkg/errors",
                "example.com/mono/quoted",
            ]
        );
        assert!(manifest.requires[2].indirect);
        assert!(!manifest.requires[1].indirect);
        assert_eq!(manifest.requires[1].version, "v1.2.3");
    }

    #[test]
    fn test_zero_requirements_is_valid() {
        let manifest = Manifest::parse("module example.com/solo\n\ngo 1.21\n").unwrap();
        assert_eq!(manifest.module, "example.com/solo");
        assert!(manifest.requires.is_empty());
    }

    #[test]
    fn test_ignored_directive_blocks() {
        let manifest = Manifest::parse(
            "module m\n\nreplace (\n\ta => ../a\n)\n\nretract [v1.0.0, v1.0.5]\nexclude x v1.0.0\ntoolchain go1.22.1\n",
        )
        .unwrap();
        assert_eq!(manifest.module, "m");
        assert!(manifest.requires.is_empty());
    }

    #[test]
    fn test_tool_and_ignore_directives() {
        let manifest = Manifest::parse(
            "module x\n\ngo 1.25\n\ntool golang.org/x/tools/cmd/stringer\nignore ./node_modules\n\ntool (\n\texample.com/gen\n)\n\nignore (\n\t./web/dist\n)\n\nrequire golang.org/x/tools v0.30.0\n",
        )
        .unwrap();
        assert_eq!(manifest.module, "x");
        assert_eq!(manifest.requires.len(), 1);
        assert_eq!(manifest.requires[0].path, "golang.org/x/tools");
    }

    #[test]
    fn test_block_form_for_any_directive() {
        let manifest = Manifest::parse("module (\n\texample.com/blocky\n)\n\ngo (\n\t1.22\n)\n").unwrap();
        assert_eq!(manifest.module, "example.com/blocky");
        assert_eq!(manifest.go_version.as_deref(), Some("1.22"));
    }

    #[test]
    fn test_empty_require_block() {
        let manifest = Manifest::parse("module x\n\nrequire ()\nrequire (\n)\n").unwrap();
        assert!(manifest.requires.is_empty());
    }

    #[test]
    fn test_comment_directly_after_version() {
        let manifest = Manifest::parse("module x\n\nrequire y v1.0.0// indirect\n").unwrap();
        assert_eq!(manifest.requires[0].version, "v1.0.0");
        assert!(manifest.requires[0].indirect);
    }

    #[test]
    fn test_missing_module_directive() {
        let err = Manifest::parse("go 1.22\n").unwrap_err();
        assert!(matches!(err, ManifestError::MissingModule));
    }

    #[test]
    fn test_syntax_errors_carry_line_numbers() {
        let cases = [
            ("module a\nmodule b\n", 2),
            ("module a\nrequire b\n", 2),
            ("module a\nfrobnicate b\n", 2),
            ("module a\n\nrequire (\n\tb v1.0.0\n", 3),
            ("module \"a\n", 1),
            ("module a\n)\n", 2),
            ("module (\n", 1),
            ("frobnicate (\n)\n", 1),
            ("module x\nrequire a ( b\n", 2),
        ];
        for (text, expected) in cases {
            match Manifest::parse(text) {
                Err(ManifestError::Syntax { line, .. }) => {
                    assert_eq!(line, expected, "wrong line for {text:?}")
                }
                other => panic!("expected syntax error for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_manifest(&dir.path().join(MANIFEST_FILE)).unwrap_err();
        assert!(matches!(err, ManifestError::Read { .. }));
    }
}
