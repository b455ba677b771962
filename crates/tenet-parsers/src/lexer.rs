//! Tokenizer for model and controller source files.
//!
//! Only as much of the language is understood as is needed to never mistake
//! literal text for code: comments, embedded documents, quoted strings with
//! interpolation, percent literals, regex literals, heredocs, and symbols all
//! collapse into single tokens. Everything else is identifiers, constants,
//! punctuation, and newlines.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Const,
    /// `@ivar`, `@@cvar`, `$global`.
    Variable,
    /// `name:` in keyword-argument or hash position.
    Label,
    Symbol,
    /// Any string-like literal: quoted strings, percent literals, regexes,
    /// heredocs, character literals.
    Str,
    Number,
    Punct,
    /// A line break or `;`.
    Newline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    /// Whitespace separated this token from the previous one.
    pub spaced_before: bool,
}

impl Token {
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    pub fn is_ident(&self, text: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == text
    }

    pub fn ends_statement(&self) -> bool {
        self.kind == TokenKind::Newline
    }
}

/// Tokenize `source`, stopping at an `__END__` line.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).run()
}

const OPERATORS: &[&str] = &[
    "**=", "<=>", "===", "...", "<<=", ">>=", "&&=", "||=", "::", "&.", "=>", "->", "==", "!=",
    "<=", ">=", "<<", ">>", "&&", "||", "**", "+=", "-=", "*=", "/=", "%=", "|=", "&=", "^=",
    "..", "=~", "!~",
];

const SYMBOL_OPERATORS: &[&str] = &[
    "[]=", "[]", "<=>", "===", "==", "=~", "!=", "!~", "<<", ">>", "<=", ">=", "**", "+@", "-@",
    "+", "-", "*", "/", "%", "<", ">", "!", "&", "|", "^", "~",
];

/// Words after which an expression (and so a literal) is expected.
const VALUE_KEYWORDS: &[&str] = &[
    "if", "unless", "while", "until", "and", "or", "not", "return", "when", "case", "then",
    "else", "elsif", "do", "begin", "yield", "in", "break", "next", "puts",
];

struct PendingHeredoc {
    terminator: String,
    indented: bool,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    spaced: bool,
    tokens: Vec<Token>,
    heredocs: Vec<PendingHeredoc>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            spaced: false,
            tokens: Vec::new(),
            heredocs: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while self.pos < self.chars.len() {
            if self.at_line_start() {
                if self.line_starts_with("=begin") {
                    self.skip_embedded_document();
                    continue;
                }
                if self.line_is("__END__") {
                    break;
                }
            }

            let c = self.chars[self.pos];
            match c {
                '\n' => {
                    self.push(TokenKind::Newline, "\n".to_string(), self.line);
                    self.pos += 1;
                    self.line += 1;
                    if !self.heredocs.is_empty() {
                        self.skip_heredoc_bodies();
                    }
                }
                ' ' | '\t' | '\r' => {
                    self.pos += 1;
                    self.spaced = true;
                }
                '\\' if self.peek(1) == Some('\n') => {
                    self.pos += 2;
                    self.line += 1;
                    self.spaced = true;
                }
                '#' => {
                    while self.pos < self.chars.len() && self.chars[self.pos] != '\n' {
                        self.pos += 1;
                    }
                }
                ';' => {
                    self.push(TokenKind::Newline, ";".to_string(), self.line);
                    self.pos += 1;
                }
                '"' | '`' if !self.after_def() => self.string(c, true),
                '\'' => self.string('\'', false),
                ':' => self.colon(),
                '%' if self.value_position() && self.percent_literal() => {}
                '/' if self.value_position() => self.regex(),
                '<' if self.heredoc() => {}
                '?' if self.value_position() && self.char_literal() => {}
                '@' | '$' => self.variable(),
                c if c.is_ascii_digit() => self.number(),
                c if is_ident_start(c) => self.identifier(),
                _ => self.operator(),
            }
        }
        self.tokens
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn push(&mut self, kind: TokenKind, text: String, line: u32) {
        self.tokens.push(Token {
            kind,
            text,
            line,
            spaced_before: self.spaced,
        });
        self.spaced = false;
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.chars[self.pos - 1] == '\n'
    }

    fn line_starts_with(&self, prefix: &str) -> bool {
        let n = prefix.chars().count();
        let matches = prefix
            .chars()
            .enumerate()
            .all(|(i, p)| self.peek(i) == Some(p));
        matches && self.peek(n).map_or(true, char::is_whitespace)
    }

    fn line_is(&self, word: &str) -> bool {
        let n = word.chars().count();
        let matches = word.chars().enumerate().all(|(i, p)| self.peek(i) == Some(p));
        matches && matches!(self.peek(n), None | Some('\n') | Some('\r'))
    }

    fn after_def(&self) -> bool {
        self.tokens.last().map_or(false, |t| t.is_ident("def"))
    }

    /// Whether the lexer sits where an expression may start, which decides
    /// between literal and operator readings of `/`, `%`, `?`, and `<<`.
    fn value_position(&self) -> bool {
        let Some(last) = self.tokens.last() else {
            return true;
        };
        match last.kind {
            TokenKind::Newline | TokenKind::Label => true,
            TokenKind::Punct => !matches!(last.text.as_str(), ")" | "]" | "}"),
            TokenKind::Ident if last.text == "def" => false,
            TokenKind::Ident => {
                VALUE_KEYWORDS.contains(&last.text.as_str())
                    || (self.spaced
                        && !self.peek(1).map_or(true, |c| c.is_whitespace() || c == '='))
            }
            _ => false,
        }
    }

    fn skip_embedded_document(&mut self) {
        loop {
            while self.pos < self.chars.len() && self.chars[self.pos] != '\n' {
                self.pos += 1;
            }
            if self.pos >= self.chars.len() {
                return;
            }
            self.pos += 1;
            self.line += 1;
            if self.line_starts_with("=end") {
                while self.pos < self.chars.len() && self.chars[self.pos] != '\n' {
                    self.pos += 1;
                }
                return;
            }
        }
    }

    fn skip_heredoc_bodies(&mut self) {
        let pending = std::mem::take(&mut self.heredocs);
        for heredoc in pending {
            while self.pos < self.chars.len() {
                let start = self.pos;
                while self.pos < self.chars.len() && self.chars[self.pos] != '\n' {
                    self.pos += 1;
                }
                let text: String = self.chars[start..self.pos].iter().collect();
                if self.pos < self.chars.len() {
                    self.pos += 1;
                    self.line += 1;
                }
                let candidate = if heredoc.indented {
                    text.trim()
                } else {
                    text.trim_end_matches('\r')
                };
                if candidate == heredoc.terminator {
                    break;
                }
            }
        }
    }

    fn string(&mut self, quote: char, interpolate: bool) {
        let line = self.line;
        self.pos += 1;
        self.skip_until(quote, quote, interpolate);
        self.push(TokenKind::Str, quote.to_string(), line);
    }

    /// Skip literal content up to and including the `close` that balances an
    /// already consumed `open`.
    fn skip_until(&mut self, open: char, close: char, interpolate: bool) {
        let mut depth = 1;
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            match c {
                '\\' => {
                    if self.peek(1) == Some('\n') {
                        self.line += 1;
                    }
                    self.pos += 2;
                    continue;
                }
                '\n' => self.line += 1,
                '#' if interpolate && self.peek(1) == Some('{') => {
                    self.skip_interpolation();
                    continue;
                }
                _ if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return;
                    }
                }
                _ if c == open => depth += 1,
                _ => {}
            }
            self.pos += 1;
        }
    }

    fn skip_interpolation(&mut self) {
        self.pos += 2;
        let mut depth = 1;
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return;
                    }
                }
                '"' | '`' | '\'' => {
                    self.pos += 1;
                    self.skip_until(c, c, c != '\'');
                    continue;
                }
                '\n' => self.line += 1,
                _ => {}
            }
            self.pos += 1;
        }
    }

    fn colon(&mut self) {
        let line = self.line;
        match self.peek(1) {
            Some(':') => {
                self.pos += 2;
                self.push(TokenKind::Punct, "::".to_string(), line);
            }
            Some(q @ ('"' | '\'')) => {
                self.pos += 2;
                self.skip_until(q, q, q == '"');
                self.push(TokenKind::Symbol, String::new(), line);
            }
            Some(c) if is_ident_start(c) => {
                self.pos += 1;
                let mut name = self.read_ident();
                if let Some(suffix @ ('?' | '!' | '=')) = self.peek(0) {
                    let next = self.peek(1);
                    let takes = match suffix {
                        '=' => !matches!(next, Some('=' | '>' | '~')),
                        _ => next != Some('='),
                    };
                    if takes {
                        name.push(suffix);
                        self.pos += 1;
                    }
                }
                self.push(TokenKind::Symbol, name, line);
            }
            Some(_) if self.value_position() => {
                let op = SYMBOL_OPERATORS
                    .iter()
                    .find(|op| op.chars().enumerate().all(|(i, c)| self.peek(i + 1) == Some(c)));
                match op {
                    Some(op) => {
                        self.pos += 1 + op.chars().count();
                        self.push(TokenKind::Symbol, op.to_string(), line);
                    }
                    None => {
                        self.pos += 1;
                        self.push(TokenKind::Punct, ":".to_string(), line);
                    }
                }
            }
            _ => {
                self.pos += 1;
                self.push(TokenKind::Punct, ":".to_string(), line);
            }
        }
    }

    fn percent_literal(&mut self) -> bool {
        let (kind, delim_at) = match self.peek(1) {
            Some(t @ ('w' | 'W' | 'i' | 'I' | 'q' | 'Q' | 'r' | 's' | 'x'))
                if self.peek(2).map_or(false, is_delimiter) =>
            {
                (Some(t), 2)
            }
            Some(c) if is_delimiter(c) => (None, 1),
            _ => return false,
        };
        let Some(open) = self.peek(delim_at) else {
            return false;
        };
        let close = match open {
            '(' => ')',
            '[' => ']',
            '{' => '}',
            '<' => '>',
            c => c,
        };
        let interpolate = !matches!(kind, Some('w' | 'i' | 'q' | 's'));
        let line = self.line;
        self.pos += delim_at + 1;
        self.skip_until(open, close, interpolate);
        if kind == Some('r') {
            self.skip_regex_flags();
        }
        self.push(TokenKind::Str, "%".to_string(), line);
        true
    }

    fn regex(&mut self) {
        let line = self.line;
        self.pos += 1;
        self.skip_until('/', '/', true);
        self.skip_regex_flags();
        self.push(TokenKind::Str, "/".to_string(), line);
    }

    fn skip_regex_flags(&mut self) {
        while matches!(self.peek(0), Some('i' | 'm' | 'x' | 'o' | 'u' | 'e' | 's' | 'n')) {
            self.pos += 1;
        }
    }

    fn heredoc(&mut self) -> bool {
        if self.peek(1) != Some('<') {
            return false;
        }
        let (indented, start) = match self.peek(2) {
            Some('~' | '-') => (true, 3),
            _ => (false, 2),
        };
        let Some(first) = self.peek(start) else {
            return false;
        };
        let quoted = matches!(first, '"' | '\'' | '`');
        let plausible = if indented {
            quoted || is_ident_start(first)
        } else {
            self.value_position() && (quoted || first.is_ascii_uppercase())
        };
        if !plausible {
            return false;
        }

        let line = self.line;
        self.pos += start;
        let terminator = if quoted {
            self.pos += 1;
            let begin = self.pos;
            while self.pos < self.chars.len()
                && self.chars[self.pos] != first
                && self.chars[self.pos] != '\n'
            {
                self.pos += 1;
            }
            let id: String = self.chars[begin..self.pos].iter().collect();
            if self.peek(0) == Some(first) {
                self.pos += 1;
            }
            id
        } else {
            self.read_ident()
        };
        self.heredocs.push(PendingHeredoc {
            terminator,
            indented,
        });
        self.push(TokenKind::Str, "<<".to_string(), line);
        true
    }

    fn char_literal(&mut self) -> bool {
        let (len, follower) = match self.peek(1) {
            Some('\\') => (3, self.peek(3)),
            Some(c) if !c.is_whitespace() => (2, self.peek(2)),
            _ => return false,
        };
        if follower.map_or(false, is_ident_char) {
            return false;
        }
        let line = self.line;
        self.pos += len;
        self.push(TokenKind::Str, "?".to_string(), line);
        true
    }

    fn variable(&mut self) {
        let line = self.line;
        let start = self.pos;
        self.pos += 1;
        if self.chars[start] == '@' && self.peek(0) == Some('@') {
            self.pos += 1;
        }
        match self.peek(0) {
            Some(c) if is_ident_start(c) => {
                self.read_ident();
            }
            Some(c) if self.chars[start] == '$' && !c.is_whitespace() => self.pos += 1,
            _ => {
                self.pos = start + 1;
                self.push(TokenKind::Punct, self.chars[start].to_string(), line);
                return;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.push(TokenKind::Variable, text, line);
    }

    fn number(&mut self) {
        let line = self.line;
        let start = self.pos;
        while let Some(c) = self.peek(0) {
            let continues = c.is_ascii_alphanumeric()
                || c == '_'
                || (c == '.' && self.peek(1).map_or(false, |d| d.is_ascii_digit()));
            if !continues {
                break;
            }
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.push(TokenKind::Number, text, line);
    }

    fn identifier(&mut self) {
        let line = self.line;
        let mut name = self.read_ident();
        if let Some(suffix @ ('?' | '!')) = self.peek(0) {
            if self.peek(1) != Some('=') {
                name.push(suffix);
                self.pos += 1;
            }
        }

        if self.peek(0) == Some(':') && self.peek(1) != Some(':') && !self.after_def() {
            self.pos += 1;
            self.push(TokenKind::Label, name, line);
            return;
        }

        let kind = if name.starts_with(|c: char| c.is_uppercase()) {
            TokenKind::Const
        } else {
            TokenKind::Ident
        };
        self.push(kind, name, line);
    }

    fn read_ident(&mut self) -> String {
        let start = self.pos;
        while self.peek(0).map_or(false, is_ident_char) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn operator(&mut self) {
        let line = self.line;
        let op = OPERATORS
            .iter()
            .find(|op| op.chars().enumerate().all(|(i, c)| self.peek(i) == Some(c)));
        let text = match op {
            Some(op) => op.to_string(),
            None => self.chars[self.pos].to_string(),
        };
        self.pos += text.chars().count();
        self.push(TokenKind::Punct, text, line);
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_delimiter(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace() && c != '_'
}
