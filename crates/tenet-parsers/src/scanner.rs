//! Hand-written method extraction.
//!
//! The scanner is pattern-based, not a parser: it tracks `class`/`module`
//! nesting and `end`-terminated blocks over the token stream and records every
//! `def` that lands on an instance. Constructs it cannot follow (methods
//! defined through `define_method`, `instance_eval`, or unusual block forms)
//! are not reported, so it may undercount but should not invent definitions.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tenet_core::types::{MethodDefinition, SourceLocation, Visibility};

use crate::lexer::{tokenize, Token, TokenKind};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("cannot read source file {path}: {source}")]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid file pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("cannot walk {path}: {message}")]
    Walk { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SourceScanner;

impl SourceScanner {
    pub fn new() -> Self {
        Self
    }

    /// Scan every file in `paths`. Paths are de-duplicated and scanned in
    /// sorted order, so the result does not depend on the input order. Any
    /// unreadable file fails the whole pass.
    pub fn scan<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<MethodDefinition>, ScanError> {
        let mut files: Vec<&Path> = paths.iter().map(|p| p.as_ref()).collect();
        files.sort();
        files.dedup();

        let per_file: Vec<Vec<MethodDefinition>> = files
            .par_iter()
            .map(|path| self.scan_file(path))
            .collect::<Result<_, _>>()?;

        let found: Vec<MethodDefinition> = per_file.into_iter().flatten().collect();
        tracing::info!(files = files.len(), definitions = found.len(), "scan complete");
        Ok(found)
    }

    pub fn scan_file(&self, path: &Path) -> Result<Vec<MethodDefinition>, ScanError> {
        let source = std::fs::read_to_string(path).map_err(|source| ScanError::UnreadableSource {
            path: path.to_path_buf(),
            source,
        })?;
        let found = self.scan_source(&path.to_string_lossy(), &source);
        tracing::debug!(path = %path.display(), definitions = found.len(), "scanned");
        Ok(found)
    }

    /// Scan in-memory source text; `label` becomes the location's file.
    pub fn scan_source(&self, label: &str, source: &str) -> Vec<MethodDefinition> {
        let tokens = tokenize(source);
        Pass::new(label, &tokens).run()
    }
}

#[derive(Debug)]
enum Frame {
    /// A `class` or `module` body, with its fully qualified name.
    Namespace {
        name: String,
        visibility: Visibility,
    },
    /// `class << self`, or a block whose defs land on the type.
    TypeLevel,
    Def,
    Block,
}

/// Keywords after which `if`/`unless`/`while`/`until` start a statement
/// rather than act as modifiers.
const STATEMENT_KEYWORDS: &[&str] = &[
    "then", "else", "do", "begin", "ensure", "not", "and", "or",
];
/// Operators that leave an expression open, so a following `if` cannot be a
/// modifier.
const STATEMENT_PUNCT: &[&str] = &[
    "=", "(", "[", "{", ",", "||=", "&&=", "+=", "-=", "<<", "=>", "||", "&&", "?", ":", "!",
];
const OPERATOR_NAMES: &[&str] = &[
    "+", "-", "*", "/", "%", "**", "==", "===", "!=", "=~", "!~", "<", ">", "<=", ">=", "<=>",
    "<<", ">>", "&", "|", "^", "~", "!", "`",
];

struct Pass<'a> {
    file: &'a str,
    tokens: &'a [Token],
    stack: Vec<Frame>,
    /// `while`/`until`/`for` opened a block whose optional `do` is not a block.
    loop_do_pending: bool,
    /// Visibility given inline, as in `private def name`.
    inline_visibility: Option<Visibility>,
    found: Vec<MethodDefinition>,
}

impl<'a> Pass<'a> {
    fn new(file: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            file,
            tokens,
            stack: Vec::new(),
            loop_do_pending: false,
            inline_visibility: None,
            found: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<MethodDefinition> {
        let tokens = self.tokens;
        let mut i = 0;
        while i < tokens.len() {
            let tok = &tokens[i];
            if tok.ends_statement() {
                self.loop_do_pending = false;
                self.inline_visibility = None;
                i += 1;
                continue;
            }
            if tok.kind != TokenKind::Ident || self.after_receiver(i) {
                i += 1;
                continue;
            }

            i = match tok.text.as_str() {
                "class" => self.open_class(i),
                "module" => self.open_module(i),
                "def" => self.open_def(i),
                "private" | "protected" | "public" => self.visibility(i),
                word => {
                    self.keyword(i, word);
                    i + 1
                }
            };
        }
        self.found
    }

    fn token(&self, i: usize) -> Option<&'a Token> {
        self.tokens.get(i)
    }

    /// `x.end`, `x&.class`, `Foo::module`: method calls, not keywords.
    fn after_receiver(&self, i: usize) -> bool {
        i > 0 && {
            let prev = &self.tokens[i - 1];
            prev.is_punct(".") || prev.is_punct("&.") || prev.is_punct("::")
        }
    }

    fn statement_position(&self, i: usize) -> bool {
        if i == 0 {
            return true;
        }
        let prev = &self.tokens[i - 1];
        match prev.kind {
            TokenKind::Newline | TokenKind::Label => true,
            TokenKind::Punct => STATEMENT_PUNCT.contains(&prev.text.as_str()),
            TokenKind::Ident => STATEMENT_KEYWORDS.contains(&prev.text.as_str()),
            _ => false,
        }
    }

    fn keyword(&mut self, i: usize, word: &str) {
        match word {
            "do" => {
                if self.loop_do_pending {
                    self.loop_do_pending = false;
                } else if i > 0 && self.tokens[i - 1].is_ident("class_methods") {
                    self.stack.push(Frame::TypeLevel);
                } else {
                    self.stack.push(Frame::Block);
                }
            }
            "begin" | "case" => self.stack.push(Frame::Block),
            "if" | "unless" if self.statement_position(i) => self.stack.push(Frame::Block),
            "while" | "until" | "for" if self.statement_position(i) => {
                self.stack.push(Frame::Block);
                self.loop_do_pending = true;
            }
            "end" => {
                self.stack.pop();
            }
            _ => {}
        }
    }

    fn namespace(&self) -> Option<&str> {
        self.stack.iter().rev().find_map(|frame| match frame {
            Frame::Namespace { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Read `Const(::Const)*` starting at `i`; returns the path and the index
    /// after it.
    fn constant_path(&self, mut i: usize) -> Option<(String, bool, usize)> {
        let absolute = self.token(i).map_or(false, |t| t.is_punct("::"));
        if absolute {
            i += 1;
        }
        let mut parts = Vec::new();
        while let Some(tok) = self.token(i) {
            if tok.kind != TokenKind::Const {
                break;
            }
            parts.push(tok.text.as_str());
            i += 1;
            match (self.token(i), self.token(i + 1)) {
                (Some(sep), Some(next))
                    if sep.is_punct("::") && next.kind == TokenKind::Const =>
                {
                    i += 1
                }
                _ => break,
            }
        }
        if parts.is_empty() {
            None
        } else {
            Some((parts.join("::"), absolute, i))
        }
    }

    fn push_namespace(&mut self, path: String, absolute: bool) {
        let name = match self.namespace() {
            Some(outer) if !absolute => format!("{}::{}", outer, path),
            _ => path,
        };
        self.stack.push(Frame::Namespace {
            name,
            visibility: Visibility::Public,
        });
    }

    fn open_class(&mut self, i: usize) -> usize {
        if self.token(i + 1).map_or(false, |t| t.is_punct("<<")) {
            self.stack.push(Frame::TypeLevel);
            return i + 2;
        }
        match self.constant_path(i + 1) {
            Some((path, absolute, next)) => {
                self.push_namespace(path, absolute);
                next
            }
            None => {
                self.stack.push(Frame::Block);
                i + 1
            }
        }
    }

    fn open_module(&mut self, i: usize) -> usize {
        match self.constant_path(i + 1) {
            Some((path, absolute, next)) => {
                self.push_namespace(path, absolute);
                next
            }
            None => {
                self.stack.push(Frame::Block);
                i + 1
            }
        }
    }

    fn in_type_level(&self) -> bool {
        for frame in self.stack.iter().rev() {
            match frame {
                Frame::TypeLevel => return true,
                Frame::Namespace { .. } => return false,
                Frame::Def | Frame::Block => {}
            }
        }
        false
    }

    /// Parse a `def` header and record the definition if it is instance-level.
    fn open_def(&mut self, i: usize) -> usize {
        let mut j = i + 1;
        let mut type_level = self.in_type_level();

        // `def self.name`, `def Const.name`
        if let (Some(receiver), Some(dot)) = (self.token(j), self.token(j + 1)) {
            if matches!(receiver.kind, TokenKind::Ident | TokenKind::Const) && dot.is_punct(".") {
                type_level = true;
                j += 2;
            }
        }

        let Some((name, after_name)) = self.method_name(j) else {
            self.stack.push(Frame::Def);
            return j;
        };

        let mut k = after_name;
        if self.token(k).map_or(false, |t| t.is_punct("(")) {
            k = self.skip_parens(k);
        }
        let endless = self.token(k).map_or(false, |t| t.is_punct("="));
        if !endless {
            self.stack.push(Frame::Def);
        }

        if !type_level {
            let line = self.tokens[i].line;
            self.record(&name, line);
        }
        self.inline_visibility = None;
        k
    }

    fn method_name(&self, j: usize) -> Option<(String, usize)> {
        let tok = self.token(j)?;
        match tok.kind {
            TokenKind::Ident | TokenKind::Const => {
                let setter = match (self.token(j + 1), self.token(j + 2)) {
                    (Some(eq), Some(next)) => {
                        eq.is_punct("=")
                            && !eq.spaced_before
                            && !next.spaced_before
                            && (next.is_punct("(") || next.kind == TokenKind::Ident)
                    }
                    _ => false,
                };
                if setter {
                    Some((format!("{}=", tok.text), j + 2))
                } else {
                    Some((tok.text.clone(), j + 1))
                }
            }
            TokenKind::Punct if tok.text == "[" => {
                if !self.token(j + 1).map_or(false, |t| t.is_punct("]")) {
                    return None;
                }
                match self.token(j + 2) {
                    Some(eq) if eq.is_punct("=") && !eq.spaced_before => {
                        Some(("[]=".to_string(), j + 3))
                    }
                    _ => Some(("[]".to_string(), j + 2)),
                }
            }
            TokenKind::Punct if OPERATOR_NAMES.contains(&tok.text.as_str()) => {
                match self.token(j + 1) {
                    Some(at) if at.is_punct("@") && !at.spaced_before => {
                        Some((format!("{}@", tok.text), j + 2))
                    }
                    _ => Some((tok.text.clone(), j + 1)),
                }
            }
            _ => None,
        }
    }

    /// Index just past the `)` matching the `(` at `i`.
    fn skip_parens(&self, i: usize) -> usize {
        let mut depth = 0usize;
        let mut k = i;
        while let Some(tok) = self.token(k) {
            if tok.is_punct("(") {
                depth += 1;
            } else if tok.is_punct(")") {
                depth -= 1;
                if depth == 0 {
                    return k + 1;
                }
            }
            k += 1;
        }
        k
    }

    fn current_visibility(&self) -> Visibility {
        if let Some(v) = self.inline_visibility {
            return v;
        }
        self.stack
            .iter()
            .rev()
            .find_map(|frame| match frame {
                Frame::Namespace { visibility, .. } => Some(*visibility),
                _ => None,
            })
            .unwrap_or_default()
    }

    fn record(&mut self, name: &str, line: u32) {
        let defining_type = self.namespace().unwrap_or("Object").to_string();
        let visibility = self.current_visibility();
        self.found.push(MethodDefinition::new(
            &defining_type,
            name,
            visibility,
            SourceLocation {
                file: self.file.to_string(),
                line,
            },
        ));
    }

    /// `private` alone switches the section, `private def x` applies inline,
    /// `private :x, :y` changes methods defined earlier.
    fn visibility(&mut self, i: usize) -> usize {
        let Some(Frame::Namespace { .. }) = self.stack.last() else {
            return i + 1;
        };
        if !self.statement_position(i) {
            return i + 1;
        }
        let Some(visibility) = Visibility::from_keyword(&self.tokens[i].text) else {
            return i + 1;
        };

        match self.token(i + 1) {
            None => {
                self.set_section(visibility);
                i + 1
            }
            Some(next) if next.ends_statement() => {
                self.set_section(visibility);
                i + 1
            }
            Some(next) if next.is_ident("def") => {
                self.inline_visibility = Some(visibility);
                i + 1
            }
            Some(_) => {
                let mut j = i + 1;
                while let Some(tok) = self.token(j) {
                    match tok.kind {
                        TokenKind::Symbol => self.restrict(&tok.text, visibility),
                        TokenKind::Punct if matches!(tok.text.as_str(), "," | "(" | ")") => {}
                        _ => break,
                    }
                    j += 1;
                }
                j
            }
        }
    }

    fn set_section(&mut self, visibility: Visibility) {
        if let Some(Frame::Namespace { visibility: v, .. }) = self.stack.last_mut() {
            *v = visibility;
        }
    }

    fn restrict(&mut self, name: &str, visibility: Visibility) {
        let defining_type = self.namespace().unwrap_or("Object").to_string();
        if let Some(def) = self
            .found
            .iter_mut()
            .rev()
            .find(|d| d.name == name && d.defining_type == defining_type)
        {
            def.visibility = visibility;
        }
    }
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
