//! Property tests for the Go parser and printer.

use proptest::prelude::*;

use scaffold::syntax::{is_keyword, tokenize, TokenKind};
use scaffold::{format_source, parse_file};

fn ident() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z]{0,7}"
}

/// A declaration with irregular spacing around its tokens
fn decl() -> impl Strategy<Value = String> {
    prop_oneof![
        (ident(), proptest::collection::vec((ident(), "(string|int64|\\*time\\.Time|\\[\\]byte)"), 0..4))
            .prop_map(|(name, fields)| {
                let body: String = fields
                    .iter()
                    .map(|(f, t)| format!("  {}   {}\n", f, t))
                    .collect();
                format!("type {} struct {{\n{}}}", name, body)
            }),
        (ident(), proptest::collection::vec(ident(), 0..4)).prop_map(|(name, args)| {
            format!("var {} = Register( {} )", name, args.join(" ,"))
        }),
        (ident(), ident()).prop_map(|(name, field)| {
            format!(
                "func New{n}(v int) *{n} {{\n if v>0 {{\n return &{n}{{ {f}:v }}\n }}\n return nil\n}}",
                n = name,
                f = field
            )
        }),
    ]
}

/// Go source together with the token texts it was assembled from
#[derive(Debug, Clone)]
struct Fragment {
    src: String,
    tokens: Vec<String>,
}

impl Fragment {
    fn token(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            src: text.clone(),
            tokens: vec![text],
        }
    }

    fn then(mut self, gap: &str, next: Fragment) -> Self {
        self.src.push_str(gap);
        self.src.push_str(&next.src);
        self.tokens.extend(next.tokens);
        self
    }
}

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,3}".prop_filter("not a keyword", |s| !is_keyword(s))
}

fn gap() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["", " ", "  "])
}

fn operand() -> impl Strategy<Value = Fragment> {
    let literal = prop::sample::select(vec![
        "1e+5", "1.5e-3", "0x1p-2", "0x1e", "6.02E+23", ".5", "42", "0b1010", "1_000", "'a'", "\"s\"",
    ]);
    prop_oneof![
        name().prop_map(Fragment::token),
        literal.prop_map(Fragment::token),
        (name(), name()).prop_map(|(f, a)| {
            Fragment::token(f)
                .then("", Fragment::token("("))
                .then("", Fragment::token(a))
                .then("", Fragment::token(")"))
        }),
        (name(), name(), name()).prop_map(|(f, a, b)| {
            Fragment::token(f)
                .then("", Fragment::token("("))
                .then("", Fragment::token(a))
                .then("", Fragment::token(","))
                .then(" ", Fragment::token(b))
                .then("", Fragment::token(")"))
        }),
    ]
}

fn expression() -> impl Strategy<Value = Fragment> {
    let op = prop::sample::select(vec![
        "+", "-", "*", "/", "%", "<<", ">>", "&", "|", "^", "&^", "==", "!=", "<", "<=", ">", ">=",
        "&&", "||",
    ]);
    (operand(), proptest::collection::vec((gap(), op, gap(), operand()), 0..6)).prop_map(
        |(first, rest)| {
            rest.into_iter().fold(first, |expr, (before, op, after, operand)| {
                expr.then(before, Fragment::token(op)).then(after, operand)
            })
        },
    )
}

/// A `var` or a func holding an expression, optionally with block comments
fn expression_decl() -> impl Strategy<Value = Fragment> {
    (name(), expression(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(name, expr, in_func, doc, trailing)| {
            let mut decl = if doc {
                Fragment::token("/* doc */").then("\n", Fragment::token(if in_func { "func" } else { "var" }))
            } else {
                Fragment::token(if in_func { "func" } else { "var" })
            };
            decl = decl.then(" ", Fragment::token(name));
            decl = if in_func {
                decl.then("", Fragment::token("("))
                    .then("", Fragment::token(")"))
                    .then(" ", Fragment::token("{"))
                    .then("\n\t", Fragment::token("x"))
                    .then(" ", Fragment::token(":="))
                    .then(" ", expr)
            } else {
                decl.then(" ", Fragment::token("=")).then(" ", expr)
            };
            if trailing {
                decl = decl.then(" ", Fragment::token("/* note */"));
            }
            if in_func {
                decl = decl.then("\n", Fragment::token("}"));
            }
            decl
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: printing is a fixed point after one pass.
    #[test]
    fn property_format_is_a_fixed_point(decls in proptest::collection::vec(decl(), 0..5)) {
        let src = format!("package p\n\n{}\n", decls.join("\n\n"));
        let once = format_source(&src).unwrap();
        let twice = format_source(&once).unwrap();
        prop_assert_eq!(twice, once);
    }

    /// PROPERTY: formatting changes layout only; the token texts survive.
    #[test]
    fn property_format_keeps_token_texts(decls in proptest::collection::vec(expression_decl(), 1..4)) {
        let file = decls
            .into_iter()
            .fold(Fragment::token("package").then(" ", Fragment::token("p")), |file, decl| {
                file.then("\n\n", decl)
            });
        let src = format!("{}\n", file.src);

        let formatted = format_source(&src).unwrap();
        let texts: Vec<String> = tokenize(&formatted)
            .unwrap()
            .into_iter()
            .filter(|t| t.kind != TokenKind::Terminator)
            .map(|t| t.text)
            .collect();

        prop_assert_eq!(texts, file.tokens);
        prop_assert_eq!(format_source(&formatted).unwrap(), formatted);
    }

    /// PROPERTY: the parser never panics on arbitrary input.
    #[test]
    fn property_parse_never_panics(src in "(?s).{0,256}") {
        let _ = parse_file(&src);
    }

    /// PROPERTY: the parser never panics on Go-looking token soup.
    #[test]
    fn property_parse_never_panics_on_token_soup(
        tokens in proptest::collection::vec(
            "(package|func|type|var|import|struct|interface|if|return|\\{|\\}|\\(|\\)|\\[|\\]|,|;|:=|=|\\.|x|\"s\"|`t`|// c|\n)",
            0..64,
        )
    ) {
        let _ = parse_file(&tokens.join(" "));
    }
}
