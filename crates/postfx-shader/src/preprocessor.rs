//! Token-based preprocessor
//!
//! Handles macros, includes and conditional compilation. Sources are appended
//! one at a time; the expanded token stream accumulates in `output` and
//! non-fatal diagnostics in `warnings`. The first fatal problem aborts the
//! append with an error.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::diagnostic::{Diagnostic, Location};
use crate::lexer::{self, Token, TokenKind};

/// Maximum nesting of `#include`
pub const MAX_INCLUDE_DEPTH: usize = 32;

const VA_ARGS: &str = "__VA_ARGS__";

#[derive(Debug, Clone)]
struct Macro {
    /// `None` for object-like macros
    params: Option<Vec<String>>,
    variadic: bool,
    body: Vec<Token>,
}

impl Macro {
    fn same_definition(&self, other: &Macro) -> bool {
        self.params == other.params
            && self.variadic == other.variadic
            && self.body.len() == other.body.len()
            && self.body.iter().zip(&other.body).all(|(a, b)| a.kind == b.kind)
    }

    /// Index of the argument `token` refers to inside the body
    fn param_index(&self, token: &Token) -> Option<usize> {
        let name = token.ident()?;
        let params = self.params.as_ref()?;
        if self.variadic && name == VA_ARGS {
            return Some(params.len());
        }
        params.iter().position(|p| p == name)
    }
}

struct Conditional {
    /// Whether the enclosing region is active
    parent_active: bool,
    /// Whether this branch is active
    active: bool,
    /// Whether some branch of this group has been taken
    taken: bool,
    seen_else: bool,
    location: Location,
}

#[derive(Debug, Default)]
pub struct Preprocessor {
    macros: HashMap<String, Macro>,
    include_paths: Vec<PathBuf>,
    output: Vec<Token>,
    warnings: Vec<Diagnostic>,
    /// Files marked with `#pragma once`
    once: HashSet<PathBuf>,
    depth: usize,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define an object-like macro from source text
    pub fn add_macro_definition(&mut self, name: &str, value: &str) -> Result<(), Diagnostic> {
        let body = lexer::tokenize(value, "<command line>")?;
        self.macros.insert(
            name.to_string(),
            Macro {
                params: None,
                variadic: false,
                body,
            },
        );
        Ok(())
    }

    /// Add a directory searched by `#include`
    pub fn add_include_path(&mut self, path: impl Into<PathBuf>) {
        self.include_paths.push(path.into());
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// Preprocess a source file and append its tokens to the output
    pub fn append_file(&mut self, path: &Path) -> Result<(), Diagnostic> {
        let source = fs::read_to_string(path).map_err(|e| {
            Diagnostic::error(
                Location::new(path.display().to_string(), 0),
                format!("could not open '{}': {}", path.display(), e),
            )
        })?;
        let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.process(&source, Some(&canonical), path.display().to_string().into())
    }

    /// Preprocess in-memory source and append its tokens to the output
    ///
    /// Quoted includes are searched in the include paths only.
    pub fn append_string(&mut self, source: &str, name: &str) -> Result<(), Diagnostic> {
        self.process(source, None, name.into())
    }

    pub fn output(&self) -> &[Token] {
        &self.output
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Consume the preprocessor, returning expanded tokens and warnings
    pub fn into_output(self) -> (Vec<Token>, Vec<Diagnostic>) {
        (self.output, self.warnings)
    }

    fn process(&mut self, source: &str, file: Option<&Path>, name: Arc<str>) -> Result<(), Diagnostic> {
        let tokens = lexer::tokenize(source, name.clone())?;
        let mut conditionals: Vec<Conditional> = Vec::new();
        let mut pending = Vec::new();

        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            if token.line_start && token.is_punct("#") {
                let mut end = i + 1;
                while end < tokens.len() && !tokens[end].line_start {
                    end += 1;
                }
                self.flush(&mut pending)?;
                self.directive(&tokens[i + 1..end], token.location.clone(), &mut conditionals, file)?;
                i = end;
                continue;
            }
            if is_active(&conditionals) {
                pending.push(token.clone());
            }
            i += 1;
        }
        self.flush(&mut pending)?;

        match conditionals.last() {
            Some(open) => Err(Diagnostic::error(open.location.clone(), "unterminated #if")),
            None => Ok(()),
        }
    }

    fn flush(&mut self, pending: &mut Vec<Token>) -> Result<(), Diagnostic> {
        if pending.is_empty() {
            return Ok(());
        }
        let tokens = std::mem::take(pending);
        let expanded = self.expand(&tokens, &mut Vec::new())?;
        self.output.extend(expanded);
        Ok(())
    }

    fn directive(
        &mut self,
        line: &[Token],
        location: Location,
        conditionals: &mut Vec<Conditional>,
        file: Option<&Path>,
    ) -> Result<(), Diagnostic> {
        let active = is_active(conditionals);
        let Some(first) = line.first() else {
            return Ok(());
        };
        let Some(name) = first.ident() else {
            if !active {
                return Ok(());
            }
            return Err(Diagnostic::error(location, format!("invalid preprocessor directive '#{first}'")));
        };
        let args = &line[1..];

        match name {
            "if" => {
                let taken = active && self.eval_condition(args, &location)?;
                conditionals.push(Conditional {
                    parent_active: active,
                    active: taken,
                    taken,
                    seen_else: false,
                    location,
                });
            }
            "ifdef" | "ifndef" => {
                let taken = if active {
                    let macro_name = expect_ident(args.first(), &location, "macro name")?;
                    self.is_defined(macro_name) == (name == "ifdef")
                } else {
                    false
                };
                conditionals.push(Conditional {
                    parent_active: active,
                    active: taken,
                    taken,
                    seen_else: false,
                    location,
                });
            }
            "elif" => {
                let Some(group) = conditionals.last_mut() else {
                    return Err(Diagnostic::error(location, "#elif without #if"));
                };
                if group.seen_else {
                    return Err(Diagnostic::error(location, "#elif after #else"));
                }
                if group.parent_active && !group.taken {
                    let value = self.eval_condition(args, &location)?;
                    group.active = value;
                    group.taken = value;
                } else {
                    group.active = false;
                }
            }
            "else" => {
                let Some(group) = conditionals.last_mut() else {
                    return Err(Diagnostic::error(location, "#else without #if"));
                };
                if group.seen_else {
                    return Err(Diagnostic::error(location, "#else after #else"));
                }
                group.seen_else = true;
                group.active = group.parent_active && !group.taken;
                group.taken = true;
            }
            "endif" => {
                if conditionals.pop().is_none() {
                    return Err(Diagnostic::error(location, "#endif without #if"));
                }
            }
            _ if !active => {}
            "define" => self.define(args, &location)?,
            "undef" => {
                let macro_name = expect_ident(args.first(), &location, "macro name")?;
                self.macros.remove(macro_name);
            }
            "include" => self.include(args, &location, file)?,
            "error" => {
                return Err(Diagnostic::error(location, format!("#error {}", join_spelling(args))));
            }
            "warning" => {
                self.warnings.push(Diagnostic::warning(location, format!("#warning {}", join_spelling(args))));
            }
            "pragma" => match args.first().and_then(Token::ident) {
                Some("once") => {
                    if let Some(file) = file {
                        self.once.insert(file.to_path_buf());
                    }
                }
                _ => {
                    self.warnings.push(Diagnostic::warning(
                        location,
                        format!("unknown pragma ignored: {}", join_spelling(args)),
                    ));
                }
            },
            "line" => {}
            other => {
                return Err(Diagnostic::error(location, format!("unknown preprocessor directive '#{other}'")));
            }
        }
        Ok(())
    }

    fn define(&mut self, args: &[Token], location: &Location) -> Result<(), Diagnostic> {
        let name = expect_ident(args.first(), location, "macro name")?.to_string();
        if name == "defined" {
            return Err(Diagnostic::error(location.clone(), "'defined' cannot be used as a macro name"));
        }

        let mut rest = &args[1..];
        let mut params = None;
        let mut variadic = false;

        // A parameter list must follow the name without whitespace
        if rest.first().is_some_and(|t| t.is_punct("(") && !t.space_before) {
            let mut list = Vec::new();
            let mut j = 1;
            if rest.get(j).is_some_and(|t| t.is_punct(")")) {
                j += 1;
            } else {
                loop {
                    let Some(token) = rest.get(j) else {
                        return Err(Diagnostic::error(location.clone(), "unterminated macro parameter list"));
                    };
                    if token.is_punct("...") {
                        variadic = true;
                    } else if let Some(param) = token.ident() {
                        list.push(param.to_string());
                    } else {
                        return Err(Diagnostic::error(location.clone(), "expected macro parameter name"));
                    }
                    j += 1;
                    match rest.get(j) {
                        Some(t) if t.is_punct(")") => {
                            j += 1;
                            break;
                        }
                        Some(t) if t.is_punct(",") && !variadic => j += 1,
                        _ => {
                            return Err(Diagnostic::error(location.clone(), "malformed macro parameter list"));
                        }
                    }
                }
            }
            params = Some(list);
            rest = &rest[j..];
        }

        let definition = Macro {
            params,
            variadic,
            body: rest.to_vec(),
        };
        if let Some(previous) = self.macros.get(&name) {
            if !previous.same_definition(&definition) {
                self.warnings.push(Diagnostic::warning(
                    location.clone(),
                    format!("redefinition of macro '{name}'"),
                ));
            }
        }
        self.macros.insert(name, definition);
        Ok(())
    }

    fn include(&mut self, args: &[Token], location: &Location, file: Option<&Path>) -> Result<(), Diagnostic> {
        if self.depth >= MAX_INCLUDE_DEPTH {
            return Err(Diagnostic::error(location.clone(), "#include nested too deeply"));
        }

        let (target, system) = self.include_target(args, location)?;
        let local = if system {
            None
        } else {
            file.and_then(Path::parent).map(|dir| dir.join(&target))
        };
        let found = local
            .into_iter()
            .chain(self.include_paths.iter().map(|dir| dir.join(&target)))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                Diagnostic::error(location.clone(), format!("could not find include file '{target}'"))
            })?;

        let canonical = fs::canonicalize(&found).unwrap_or_else(|_| found.clone());
        if self.once.contains(&canonical) {
            return Ok(());
        }
        let source = fs::read_to_string(&found).map_err(|e| {
            Diagnostic::error(location.clone(), format!("could not open '{}': {}", found.display(), e))
        })?;

        log::trace!("Including {:?}", found);
        self.depth += 1;
        let result = self.process(&source, Some(&canonical), found.display().to_string().into());
        self.depth -= 1;
        result
    }

    /// File name of an include directive and whether it used angle brackets
    fn include_target(&self, args: &[Token], location: &Location) -> Result<(String, bool), Diagnostic> {
        match args.first().map(|t| &t.kind) {
            Some(TokenKind::Str(name)) => return Ok((name.clone(), false)),
            Some(TokenKind::Punct("<")) => {
                let mut name = String::new();
                for token in &args[1..] {
                    if token.is_punct(">") {
                        return Ok((name, true));
                    }
                    if token.space_before && !name.is_empty() {
                        name.push(' ');
                    }
                    name.push_str(&token.spelling());
                }
                return Err(Diagnostic::error(location.clone(), "missing '>' in #include"));
            }
            _ => {}
        }
        let expanded = self.expand(args, &mut Vec::new())?;
        match expanded.first().map(|t| &t.kind) {
            Some(TokenKind::Str(name)) => Ok((name.clone(), false)),
            _ => Err(Diagnostic::error(location.clone(), "expected file name after #include")),
        }
    }

    fn eval_condition(&self, args: &[Token], location: &Location) -> Result<bool, Diagnostic> {
        let mut replaced = Vec::with_capacity(args.len());
        let mut i = 0;
        while i < args.len() {
            if !args[i].is_ident("defined") {
                replaced.push(args[i].clone());
                i += 1;
                continue;
            }
            let parenthesized = args.get(i + 1).is_some_and(|t| t.is_punct("("));
            let name_at = if parenthesized { i + 2 } else { i + 1 };
            let name = expect_ident(args.get(name_at), location, "macro name after 'defined'")?;
            i = name_at + 1;
            if parenthesized {
                if !args.get(i).is_some_and(|t| t.is_punct(")")) {
                    return Err(Diagnostic::error(location.clone(), "missing ')' after 'defined'"));
                }
                i += 1;
            }
            let value = i64::from(self.is_defined(name));
            replaced.push(Token::new(
                TokenKind::Int { value, unsigned: false },
                args[i - 1].location.clone(),
            ));
        }

        let expanded = self.expand(&replaced, &mut Vec::new())?;
        if expanded.is_empty() {
            return Err(Diagnostic::error(location.clone(), "#if with no expression"));
        }
        let mut eval = ConditionEval {
            tokens: &expanded,
            pos: 0,
            location,
        };
        let value = eval.conditional()?;
        if eval.pos != expanded.len() {
            return Err(eval.error("unexpected token in preprocessor expression"));
        }
        Ok(value != 0)
    }

    /// Expand macros in `tokens`. `disabled` lists macros currently being expanded.
    fn expand(&self, tokens: &[Token], disabled: &mut Vec<String>) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens = tokens.to_vec();
        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            let TokenKind::Ident(name) = &token.kind else {
                out.push(token.clone());
                i += 1;
                continue;
            };

            match name.as_str() {
                "__LINE__" => {
                    out.push(with_kind(
                        token,
                        TokenKind::Int {
                            value: i64::from(token.location.line),
                            unsigned: false,
                        },
                    ));
                    i += 1;
                    continue;
                }
                "__FILE__" => {
                    out.push(with_kind(token, TokenKind::Str(token.location.file.to_string())));
                    i += 1;
                    continue;
                }
                _ => {}
            }

            let definition = match self.macros.get(name) {
                Some(definition) if !disabled.contains(name) => definition,
                _ => {
                    out.push(token.clone());
                    i += 1;
                    continue;
                }
            };

            let body = match &definition.params {
                None => {
                    i += 1;
                    let body = relocate(&definition.body, token);
                    paste(body)?
                }
                Some(params) => {
                    if !tokens.get(i + 1).is_some_and(|t| t.is_punct("(")) {
                        out.push(token.clone());
                        i += 1;
                        continue;
                    }
                    let (mut args, next) = collect_args(&tokens, i + 2, &token.location)?;
                    i = next;

                    if params.is_empty() && args.len() == 1 && args[0].is_empty() {
                        args.clear();
                    }
                    if definition.variadic {
                        if args.len() < params.len() {
                            return Err(arity_error(token, name, params.len(), args.len()));
                        }
                        let extra = args.split_off(params.len().min(args.len()));
                        args.push(join_args(extra, &token.location));
                    } else if args.len() != params.len() {
                        return Err(arity_error(token, name, params.len(), args.len()));
                    }
                    self.substitute(definition, &args, token, disabled)?
                }
            };

            let name = name.clone();
            disabled.push(name);
            let expanded = self.expand(&body, disabled);
            disabled.pop();
            let mut expanded = expanded?;

            // A trailing function-like macro name is rescanned with the rest of the input
            let resumes_call = expanded
                .last()
                .and_then(Token::ident)
                .and_then(|last| self.macros.get(last))
                .is_some_and(|m| m.params.is_some())
                && tokens.get(i).is_some_and(|t| t.is_punct("("));
            if resumes_call {
                if let Some(last) = expanded.pop() {
                    tokens.insert(i, last);
                }
            }
            out.extend(expanded);
        }
        Ok(out)
    }

    /// Replace parameters in a function-like macro body
    fn substitute(
        &self,
        definition: &Macro,
        args: &[Vec<Token>],
        call: &Token,
        disabled: &mut Vec<String>,
    ) -> Result<Vec<Token>, Diagnostic> {
        let body = &definition.body;
        let mut out = Vec::new();
        let mut k = 0;
        while k < body.len() {
            let token = &body[k];

            if token.is_punct("#") {
                if let Some(index) = body.get(k + 1).and_then(|t| definition.param_index(t)) {
                    let mut text = Token::new(TokenKind::Str(stringify(&args[index])), call.location.clone());
                    text.space_before = token.space_before;
                    out.push(text);
                    k += 2;
                    continue;
                }
            }

            if let Some(index) = definition.param_index(token) {
                let pasted = body.get(k + 1).is_some_and(|t| t.is_punct("##"))
                    || (k > 0 && body[k - 1].is_punct("##"));
                let replacement = if pasted {
                    args[index].clone()
                } else {
                    self.expand(&args[index], disabled)?
                };
                for (n, arg) in replacement.into_iter().enumerate() {
                    let space_before = if n == 0 { token.space_before } else { arg.space_before };
                    out.push(Token {
                        line_start: false,
                        space_before,
                        ..arg
                    });
                }
                k += 1;
                continue;
            }

            out.push(Token {
                location: call.location.clone(),
                line_start: false,
                ..token.clone()
            });
            k += 1;
        }
        if let Some(first) = out.first_mut() {
            first.space_before = call.space_before;
        }
        paste(out)
    }
}

fn is_active(conditionals: &[Conditional]) -> bool {
    conditionals.last().is_none_or(|c| c.active)
}

fn expect_ident<'t>(token: Option<&'t Token>, location: &Location, what: &str) -> Result<&'t str, Diagnostic> {
    token
        .and_then(Token::ident)
        .ok_or_else(|| Diagnostic::error(location.clone(), format!("expected {what}")))
}

fn arity_error(call: &Token, name: &str, expected: usize, got: usize) -> Diagnostic {
    Diagnostic::error(
        call.location.clone(),
        format!("macro '{name}' expects {expected} arguments, got {got}"),
    )
}

fn with_kind(token: &Token, kind: TokenKind) -> Token {
    Token {
        kind,
        line_start: false,
        ..token.clone()
    }
}

/// Copy a macro body, attributing it to the invocation site
fn relocate(body: &[Token], call: &Token) -> Vec<Token> {
    body.iter()
        .enumerate()
        .map(|(n, t)| Token {
            kind: t.kind.clone(),
            location: call.location.clone(),
            line_start: false,
            space_before: if n == 0 { call.space_before } else { t.space_before },
        })
        .collect()
}

/// Split a macro call's argument tokens at top-level commas
fn collect_args(tokens: &[Token], start: usize, location: &Location) -> Result<(Vec<Vec<Token>>, usize), Diagnostic> {
    let mut args = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0usize;
    for (j, token) in tokens.iter().enumerate().skip(start) {
        if token.is_punct("(") {
            depth += 1;
        } else if token.is_punct(")") {
            if depth == 0 {
                args.push(current);
                return Ok((args, j + 1));
            }
            depth -= 1;
        } else if token.is_punct(",") && depth == 0 {
            args.push(std::mem::take(&mut current));
            continue;
        }
        current.push(token.clone());
    }
    Err(Diagnostic::error(location.clone(), "unterminated macro invocation"))
}

/// Re-join variadic arguments with commas
fn join_args(args: Vec<Vec<Token>>, location: &Location) -> Vec<Token> {
    let mut joined = Vec::new();
    for (n, arg) in args.into_iter().enumerate() {
        if n > 0 {
            joined.push(Token::new(TokenKind::Punct(","), location.clone()));
        }
        joined.extend(arg);
    }
    joined
}

/// Apply `##` operators
fn paste(tokens: Vec<Token>) -> Result<Vec<Token>, Diagnostic> {
    if !tokens.iter().any(|t| t.is_punct("##")) {
        return Ok(tokens);
    }
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        if !token.is_punct("##") {
            out.push(token);
            continue;
        }
        let Some(rhs) = iter.next() else {
            continue;
        };
        let Some(lhs) = out.pop() else {
            out.push(rhs);
            continue;
        };
        let text = format!("{}{}", lhs.spelling(), rhs.spelling());
        let mut pasted = lexer::tokenize(&text, lhs.location.file.clone()).ok().unwrap_or_default();
        if pasted.len() != 1 {
            return Err(Diagnostic::error(
                lhs.location.clone(),
                format!("pasting '{}' and '{}' does not give a valid token", lhs, rhs),
            ));
        }
        let mut token = pasted.remove(0);
        token.location = lhs.location;
        token.line_start = false;
        token.space_before = lhs.space_before;
        out.push(token);
    }
    Ok(out)
}

fn stringify(tokens: &[Token]) -> String {
    let mut text = String::new();
    for (n, token) in tokens.iter().enumerate() {
        if n > 0 && token.space_before {
            text.push(' ');
        }
        text.push_str(&token.spelling());
    }
    text
}

fn join_spelling(tokens: &[Token]) -> String {
    stringify(tokens)
}

/// Integer evaluator for `#if` expressions
struct ConditionEval<'a> {
    tokens: &'a [Token],
    pos: usize,
    location: &'a Location,
}

impl ConditionEval<'_> {
    fn error(&self, message: &str) -> Diagnostic {
        let location = self
            .tokens
            .get(self.pos)
            .map(|t| t.location.clone())
            .unwrap_or_else(|| self.location.clone());
        Diagnostic::error(location, message)
    }

    fn peek_punct(&self) -> Option<&'static str> {
        match self.tokens.get(self.pos)?.kind {
            TokenKind::Punct(p) => Some(p),
            _ => None,
        }
    }

    fn accept(&mut self, p: &str) -> bool {
        if self.peek_punct() == Some(p) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn conditional(&mut self) -> Result<i64, Diagnostic> {
        let condition = self.binary(1)?;
        if !self.accept("?") {
            return Ok(condition);
        }
        let then = self.conditional()?;
        if !self.accept(":") {
            return Err(self.error("expected ':' in preprocessor expression"));
        }
        let otherwise = self.conditional()?;
        Ok(if condition != 0 { then } else { otherwise })
    }

    fn binary(&mut self, min_precedence: u8) -> Result<i64, Diagnostic> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.peek_punct() {
            let precedence = binary_precedence(op);
            if precedence == 0 || precedence < min_precedence {
                break;
            }
            self.pos += 1;
            let rhs = self.binary(precedence + 1)?;
            lhs = self.apply(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn apply(&self, op: &str, a: i64, b: i64) -> Result<i64, Diagnostic> {
        Ok(match op {
            "*" => a.wrapping_mul(b),
            "/" | "%" if b == 0 => return Err(self.error("division by zero in preprocessor expression")),
            "/" => a.wrapping_div(b),
            "%" => a.wrapping_rem(b),
            "+" => a.wrapping_add(b),
            "-" => a.wrapping_sub(b),
            "<<" => a.wrapping_shl(b as u32),
            ">>" => a.wrapping_shr(b as u32),
            "<" => i64::from(a < b),
            ">" => i64::from(a > b),
            "<=" => i64::from(a <= b),
            ">=" => i64::from(a >= b),
            "==" => i64::from(a == b),
            "!=" => i64::from(a != b),
            "&" => a & b,
            "^" => a ^ b,
            "|" => a | b,
            "&&" => i64::from(a != 0 && b != 0),
            "||" => i64::from(a != 0 || b != 0),
            _ => return Err(self.error("unsupported operator in preprocessor expression")),
        })
    }

    fn unary(&mut self) -> Result<i64, Diagnostic> {
        if self.accept("-") {
            return Ok(self.unary()?.wrapping_neg());
        }
        if self.accept("+") {
            return self.unary();
        }
        if self.accept("!") {
            return Ok(i64::from(self.unary()? == 0));
        }
        if self.accept("~") {
            return Ok(!self.unary()?);
        }
        if self.accept("(") {
            let value = self.conditional()?;
            if !self.accept(")") {
                return Err(self.error("expected ')' in preprocessor expression"));
            }
            return Ok(value);
        }

        let Some(token) = self.tokens.get(self.pos) else {
            return Err(self.error("unexpected end of preprocessor expression"));
        };
        let value = match &token.kind {
            TokenKind::Int { value, .. } => *value,
            TokenKind::Float(v) => *v as i64,
            TokenKind::Ident(name) if name == "true" => 1,
            // Unknown identifiers evaluate to zero
            TokenKind::Ident(_) => 0,
            _ => return Err(self.error("invalid token in preprocessor expression")),
        };
        self.pos += 1;
        Ok(value)
    }
}

fn binary_precedence(op: &str) -> u8 {
    match op {
        "||" => 1,
        "&&" => 2,
        "|" => 3,
        "^" => 4,
        "&" => 5,
        "==" | "!=" => 6,
        "<" | ">" | "<=" | ">=" => 7,
        "<<" | ">>" => 8,
        "+" | "-" => 9,
        "*" | "/" | "%" => 10,
        _ => 0,
    }
}
