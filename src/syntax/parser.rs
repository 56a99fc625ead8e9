//! Declaration parser
//!
//! Builds a [`SourceFile`] from token trees. Only the declaration level is
//! structured; expressions and statements stay as token trees.

use super::error::ParseError;
use super::list::{split_items, split_lines};
use super::token::{Delim, Group, Token, TokenKind, TokenTree};
use super::tree::{
    Block, Decl, Field, FuncDecl, ImportDecl, ImportSpec, InterfaceElem, Item, Line, Member,
    Method, Param, ParamList, Receiver, SourceFile, TypeDecl, TypeExpr, ValueDecl, ValueKeyword,
    ValueSpec,
};

fn describe(tree: &TokenTree) -> String {
    match tree {
        TokenTree::Token(t) if t.kind == TokenKind::Terminator => "newline".to_string(),
        TokenTree::Token(t) => t.text.clone(),
        TokenTree::Group(g) => g.delim.open().to_string(),
    }
}

fn unexpected(tree: &TokenTree, expected: &str) -> ParseError {
    ParseError::Unexpected {
        line: tree.line(),
        expected: expected.to_string(),
        found: describe(tree),
    }
}

fn end(expected: &str) -> ParseError {
    ParseError::UnexpectedEnd {
        expected: expected.to_string(),
    }
}

fn into_token(tree: TokenTree) -> Option<Token> {
    match tree {
        TokenTree::Token(t) => Some(t),
        TokenTree::Group(_) => None,
    }
}

fn into_group(tree: TokenTree) -> Option<Group> {
    match tree {
        TokenTree::Group(g) => Some(g),
        TokenTree::Token(_) => None,
    }
}

fn comment_tokens(line: Line) -> impl Iterator<Item = Token> {
    line.tokens.into_iter().filter_map(into_token)
}

/// Parse a whole file.
pub(crate) fn parse_source(trees: Vec<TokenTree>) -> Result<SourceFile, ParseError> {
    let mut lines = split_lines(trees).into_iter();
    let mut header = Vec::new();

    let package_line = loop {
        match lines.next() {
            Some(line) if line.is_comment() => header.extend(comment_tokens(line)),
            Some(line) => break line,
            None => return Err(ParseError::MissingPackage),
        }
    };

    let header_detached =
        !header.is_empty() && package_line.tokens.first().is_some_and(|t| t.breaks() >= 2);
    let package = match package_line.tokens.as_slice() {
        [kw, name] if kw.is_keyword("package") => name
            .ident()
            .map(str::to_string)
            .ok_or_else(|| unexpected(name, "package name"))?,
        [kw, ..] if kw.is_keyword("package") => {
            return Err(ParseError::Unexpected {
                line: kw.line(),
                expected: "package name".to_string(),
                found: package_line
                    .tokens
                    .get(2)
                    .or(package_line.tokens.get(1))
                    .map(describe)
                    .unwrap_or_default(),
            })
        }
        _ => return Err(ParseError::MissingPackage),
    };

    let (decls, trailing) = parse_decl_lines(lines)?;
    Ok(SourceFile {
        header,
        header_detached,
        package,
        decls,
        trailing,
    })
}

/// Parse a run of top-level lines into declarations, returning comments left
/// after the last one.
pub(crate) fn parse_decl_lines(
    lines: impl IntoIterator<Item = Line>,
) -> Result<(Vec<Decl>, Vec<Token>), ParseError> {
    let mut decls = Vec::new();
    let mut doc: Vec<Token> = Vec::new();

    for line in lines {
        if line.is_comment() {
            doc.extend(comment_tokens(line));
            continue;
        }
        let detached_doc = !doc.is_empty() && line.blank_before();
        let item = parse_item(line.tokens)?;
        decls.push(Decl {
            doc: std::mem::take(&mut doc),
            detached_doc,
            item,
            comment: line.comment,
        });
    }
    Ok((decls, doc))
}

fn parse_item(tokens: Vec<TokenTree>) -> Result<Item, ParseError> {
    let Some(first) = tokens.first() else {
        return Err(end("declaration"));
    };
    let keyword = match first.as_token() {
        Some(t) if t.kind == TokenKind::Keyword => t.text.as_str(),
        _ => return Err(unexpected(first, "declaration")),
    };
    match keyword {
        "import" => parse_import(tokens).map(Item::Import),
        "type" if tokens.get(1).is_some_and(|t| t.is_group(Delim::Paren)) => {
            Ok(Item::Verbatim(tokens))
        }
        "type" => parse_type(tokens).map(Item::Type),
        "func" => parse_func(tokens).map(Item::Func),
        "var" => parse_value(ValueKeyword::Var, tokens).map(Item::Value),
        "const" => parse_value(ValueKeyword::Const, tokens).map(Item::Value),
        _ => Err(unexpected(first, "declaration")),
    }
}

fn parse_import_spec(tokens: &[TokenTree]) -> Result<ImportSpec, ParseError> {
    let path_of = |tree: &TokenTree| {
        tree.as_token()
            .and_then(Token::unquoted)
            .map(str::to_string)
            .ok_or_else(|| unexpected(tree, "import path"))
    };
    match tokens {
        [path] => Ok(ImportSpec::new(path_of(path)?)),
        [alias, path] => {
            let alias = match alias.as_token() {
                Some(t) if t.kind == TokenKind::Ident || t.is_op(".") => t.text.clone(),
                _ => return Err(unexpected(alias, "import alias")),
            };
            Ok(ImportSpec::aliased(alias, path_of(path)?))
        }
        [] => Err(end("import path")),
        [_, _, extra, ..] => Err(unexpected(extra, "newline")),
    }
}

fn parse_import(tokens: Vec<TokenTree>) -> Result<ImportDecl, ParseError> {
    let mut rest = tokens.into_iter().skip(1);
    let Some(head) = rest.next() else {
        return Err(end("import path"));
    };

    if head.is_group(Delim::Paren) {
        if let Some(extra) = rest.next() {
            return Err(unexpected(&extra, "newline"));
        }
        let group = into_group(head).ok_or_else(|| end("import list"))?;
        let mut specs = Vec::new();
        for line in split_lines(group.trees) {
            if line.is_comment() {
                specs.extend(comment_tokens(line).map(Member::Comment));
                continue;
            }
            let mut spec = parse_import_spec(&line.tokens)?;
            spec.blank_before = line.blank_before();
            spec.comment = line.comment;
            specs.push(Member::Item(spec));
        }
        return Ok(ImportDecl {
            specs,
            grouped: true,
        });
    }

    let tokens: Vec<TokenTree> = std::iter::once(head).chain(rest).collect();
    let spec = parse_import_spec(&tokens)?;
    Ok(ImportDecl {
        specs: vec![Member::Item(spec)],
        grouped: false,
    })
}

/// Is `[...]` after a type name a type parameter list rather than an array length?
fn is_type_params(group: &Group) -> bool {
    group.trees.len() >= 2 && group.trees[0].ident().is_some()
}

fn parse_type(tokens: Vec<TokenTree>) -> Result<TypeDecl, ParseError> {
    let mut rest: Vec<TokenTree> = tokens.into_iter().skip(1).collect();
    if rest.is_empty() {
        return Err(end("type name"));
    }
    let name_tree = rest.remove(0);
    let name = name_tree
        .ident()
        .map(str::to_string)
        .ok_or_else(|| unexpected(&name_tree, "type name"))?;

    let mut type_params = None;
    let leading_params = rest
        .first()
        .and_then(TokenTree::as_group)
        .is_some_and(|g| g.delim == Delim::Bracket && is_type_params(g));
    if rest.len() > 1 && leading_params {
        type_params = into_group(rest.remove(0));
    }

    let alias = rest.first().is_some_and(|t| t.is_op("="));
    if alias {
        rest.remove(0);
    }
    if rest.is_empty() {
        return Err(end("type"));
    }

    Ok(TypeDecl {
        name,
        type_params,
        alias,
        ty: parse_type_expr(rest)?,
    })
}

fn parse_type_expr(mut trees: Vec<TokenTree>) -> Result<TypeExpr, ParseError> {
    let shape = match trees.as_slice() {
        [kw, body] if kw.is_keyword("struct") && body.is_group(Delim::Brace) => Some(true),
        [kw, body] if kw.is_keyword("interface") && body.is_group(Delim::Brace) => Some(false),
        _ => None,
    };
    let Some(is_struct) = shape else {
        return Ok(TypeExpr::Other(trees));
    };
    let body = trees
        .pop()
        .and_then(into_group)
        .ok_or_else(|| end("type body"))?;
    if is_struct {
        Ok(TypeExpr::Struct(parse_fields(body)?))
    } else {
        Ok(TypeExpr::Interface(parse_interface(body)?))
    }
}

/// Does a field or parameter start with a name rather than a type?
fn has_leading_name(tokens: &[TokenTree]) -> bool {
    match tokens {
        [first, second, ..] if first.ident().is_some() => {
            if second.is_op(".") {
                return false;
            }
            // `List[T]` is an embedded generic type, `Items []T` a named field
            !(tokens.len() == 2 && second.is_group(Delim::Bracket))
        }
        _ => false,
    }
}

/// Leading `a, b, c` names of a field or spec, and the remaining trees.
fn split_names(
    tokens: Vec<TokenTree>,
    expected: &str,
) -> Result<(Vec<String>, Vec<TokenTree>), ParseError> {
    let mut names = Vec::new();
    let mut iter = tokens.into_iter().peekable();
    loop {
        let Some(tree) = iter.next() else {
            return Err(end(expected));
        };
        let name = tree
            .ident()
            .map(str::to_string)
            .ok_or_else(|| unexpected(&tree, "name"))?;
        names.push(name);
        if iter.peek().is_some_and(|t| t.is_op(",")) {
            iter.next();
            continue;
        }
        break;
    }
    Ok((names, iter.collect()))
}

fn parse_fields(body: Group) -> Result<Vec<Member<Field>>, ParseError> {
    let mut members = Vec::new();
    for line in split_lines(body.trees) {
        if line.is_comment() {
            members.extend(comment_tokens(line).map(Member::Comment));
            continue;
        }
        let blank_before = line.blank_before();
        let mut tokens = line.tokens;
        let mut comment = line.comment;
        if comment.is_none() && tokens.len() > 1 && tokens.last().is_some_and(TokenTree::is_comment) {
            comment = tokens.pop().and_then(into_token);
        }
        let tag = match tokens.last() {
            Some(last) if last.is_kind(TokenKind::Str) && tokens.len() > 1 => {
                tokens.pop().and_then(into_token).map(|t| t.text)
            }
            _ => None,
        };
        let (names, ty) = if has_leading_name(&tokens) {
            split_names(tokens, "field type")?
        } else {
            (Vec::new(), tokens)
        };
        if ty.is_empty() {
            return Err(end("field type"));
        }
        members.push(Member::Item(Field {
            names,
            ty,
            tag,
            comment,
            blank_before,
        }));
    }
    Ok(members)
}

fn parse_interface(body: Group) -> Result<Vec<Member<InterfaceElem>>, ParseError> {
    let mut members = Vec::new();
    for line in split_lines(body.trees) {
        if line.is_comment() {
            members.extend(comment_tokens(line).map(Member::Comment));
            continue;
        }
        let blank_before = line.blank_before();
        let is_method = matches!(
            line.tokens.as_slice(),
            [name, params, ..] if name.ident().is_some() && params.is_group(Delim::Paren)
        );
        if !is_method {
            members.push(Member::Item(InterfaceElem::Embedded {
                ty: line.tokens,
                comment: line.comment,
                blank_before,
            }));
            continue;
        }
        let mut iter = line.tokens.into_iter();
        let name = iter
            .next()
            .and_then(|t| t.ident().map(str::to_string))
            .ok_or_else(|| end("method name"))?;
        let params = iter
            .next()
            .and_then(into_group)
            .map(parse_params)
            .ok_or_else(|| end("method parameters"))?;
        members.push(Member::Item(InterfaceElem::Method(Method {
            name,
            params,
            results: iter.collect(),
            comment: line.comment,
            blank_before,
        })));
    }
    Ok(members)
}

/// Parse a parameter list, resolving Go's `a, b int` grouping.
pub(crate) fn parse_params(group: Group) -> ParamList {
    let multiline = group.is_multiline();
    let entries: Vec<Vec<TokenTree>> = split_items(group.trees)
        .into_iter()
        .map(|item| item.tokens.into_iter().filter(|t| !t.is_comment()).collect())
        .filter(|tokens: &Vec<TokenTree>| !tokens.is_empty())
        .collect();

    let named = entries.iter().any(|e| has_leading_name(e));
    if !named {
        let params = entries
            .into_iter()
            .map(|ty| Param {
                names: Vec::new(),
                ty,
            })
            .collect();
        return ParamList { params, multiline };
    }

    let mut params = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    for mut entry in entries {
        if entry.len() == 1 {
            if let Some(name) = entry[0].ident() {
                pending.push(name.to_string());
                continue;
            }
        }
        let name = entry.remove(0);
        let mut names = std::mem::take(&mut pending);
        names.extend(name.ident().map(str::to_string));
        params.push(Param { names, ty: entry });
    }
    // Trailing bare names without a type are types themselves
    params.extend(pending.into_iter().map(|name| Param {
        names: Vec::new(),
        ty: vec![TokenTree::Token(Token::ident(name))],
    }));
    ParamList { params, multiline }
}

fn parse_receiver(group: Group) -> Result<Receiver, ParseError> {
    let line = group.line;
    let mut tokens: Vec<TokenTree> = group.trees.into_iter().filter(|t| !t.is_comment()).collect();
    if tokens.is_empty() {
        return Err(ParseError::Unexpected {
            line,
            expected: "receiver".to_string(),
            found: ")".to_string(),
        });
    }
    if has_leading_name(&tokens) {
        let name = tokens.remove(0).ident().map(str::to_string);
        return Ok(Receiver { name, ty: tokens });
    }
    Ok(Receiver {
        name: None,
        ty: tokens,
    })
}

fn parse_func(tokens: Vec<TokenTree>) -> Result<FuncDecl, ParseError> {
    let mut rest: Vec<TokenTree> = tokens.into_iter().skip(1).collect();

    let recv = if rest.first().is_some_and(|t| t.is_group(Delim::Paren)) {
        let group = into_group(rest.remove(0)).ok_or_else(|| end("receiver"))?;
        Some(parse_receiver(group)?)
    } else {
        None
    };

    if rest.is_empty() {
        return Err(end("function name"));
    }
    let name_tree = rest.remove(0);
    let name = name_tree
        .ident()
        .map(str::to_string)
        .ok_or_else(|| unexpected(&name_tree, "function name"))?;

    let type_params = if rest.first().is_some_and(|t| t.is_group(Delim::Bracket)) {
        into_group(rest.remove(0))
    } else {
        None
    };

    match rest.first() {
        Some(t) if t.is_group(Delim::Paren) => {}
        Some(t) => return Err(unexpected(t, "parameter list")),
        None => return Err(end("parameter list")),
    }
    let params = into_group(rest.remove(0))
        .map(parse_params)
        .unwrap_or_default();

    // The last brace group is the body unless it closes a struct or interface result type
    let has_body = rest.last().is_some_and(|t| t.is_group(Delim::Brace))
        && !(rest.len() >= 2 && {
            let before = &rest[rest.len() - 2];
            before.is_keyword("struct") || before.is_keyword("interface")
        });
    let body = if has_body {
        rest.pop().and_then(into_group).map(|g| Block {
            lines: split_lines(g.trees),
        })
    } else {
        None
    };

    Ok(FuncDecl {
        recv,
        name,
        type_params,
        params,
        results: rest,
        body,
    })
}

fn parse_value_spec(tokens: Vec<TokenTree>) -> Result<ValueSpec, ParseError> {
    let blank_before = tokens.first().is_some_and(|t| t.breaks() >= 2);
    let (names, rest) = split_names(tokens, "value")?;
    let (ty, values) = match rest.iter().position(|t| t.is_op("=")) {
        Some(at) => {
            let mut ty = rest;
            let values = ty.split_off(at + 1);
            ty.pop();
            (ty, values)
        }
        None => (rest, Vec::new()),
    };
    Ok(ValueSpec {
        names,
        ty,
        values,
        comment: None,
        blank_before,
    })
}

fn parse_value(keyword: ValueKeyword, tokens: Vec<TokenTree>) -> Result<ValueDecl, ParseError> {
    let mut rest: Vec<TokenTree> = tokens.into_iter().skip(1).collect();

    if rest.len() == 1 && rest[0].is_group(Delim::Paren) {
        let group = rest.pop().and_then(into_group).ok_or_else(|| end("value list"))?;
        let mut specs = Vec::new();
        for line in split_lines(group.trees) {
            if line.is_comment() {
                specs.extend(comment_tokens(line).map(Member::Comment));
                continue;
            }
            let mut spec = parse_value_spec(line.tokens)?;
            spec.comment = line.comment;
            specs.push(Member::Item(spec));
        }
        return Ok(ValueDecl {
            keyword,
            specs,
            grouped: true,
        });
    }

    let spec = parse_value_spec(rest)?;
    Ok(ValueDecl {
        keyword,
        specs: vec![Member::Item(spec)],
        grouped: false,
    })
}
