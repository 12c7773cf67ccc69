//! Import extraction over a lightweight token stream.
//!
//! The tokenizer only knows identifiers, punctuation and string literals, and
//! drops comments entirely. Import shapes are then matched on tokens, so
//! `import` text inside comments or string literals never produces a reference.

use crate::domain::edge::ImportSyntax;
use crate::domain::node::SourceFileId;

/// Whether a specifier points into the project or at a third-party package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    Internal,
    External,
}

/// One import-like occurrence found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReference {
    pub specifier: String,
    pub kind: ImportKind,
    pub syntax: ImportSyntax,
}

impl ImportReference {
    fn new(specifier: &str, syntax: ImportSyntax) -> Self {
        Self {
            specifier: specifier.to_string(),
            kind: classify(specifier),
            syntax,
        }
    }

    /// Top-level package name for external references.
    pub fn package_name(&self) -> Option<&str> {
        match self.kind {
            ImportKind::External => Some(package_name(&self.specifier)),
            ImportKind::Internal => None,
        }
    }
}

/// `.` or `/` prefixed specifiers are internal, everything else external.
pub fn classify(specifier: &str) -> ImportKind {
    if specifier.starts_with('.') || specifier.starts_with('/') {
        ImportKind::Internal
    } else {
        ImportKind::External
    }
}

/// Specifier truncated at the first `/` (`lodash/fp` -> `lodash`).
///
/// Scoped packages are not special-cased: `@org/pkg` yields `@org`.
pub fn package_name(specifier: &str) -> &str {
    specifier.split('/').next().unwrap_or(specifier)
}

/// Extract every import reference from `source`, in source order.
pub fn extract_imports(file: &SourceFileId, source: &str) -> Vec<ImportReference> {
    let tokens = tokenize(source);
    let mut refs = Vec::new();

    for i in 0..tokens.len() {
        let Token::Ident(word) = tokens[i] else {
            continue;
        };
        if i > 0 && tokens[i - 1] == Token::Punct('.') {
            continue;
        }
        let found = match word {
            "import" => match_import(&tokens, i),
            "export" => match_export(&tokens, i),
            "require" => call_argument(&tokens, i).map(|s| (s, ImportSyntax::Require)),
            _ => None,
        };
        if let Some((specifier, syntax)) = found
            && !specifier.is_empty()
        {
            refs.push(ImportReference::new(specifier, syntax));
        }
    }

    tracing::trace!(file = %file, count = refs.len(), "extracted imports");
    refs
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Str(&'a str),
    Punct(char),
    /// Numbers and template literals with substitutions.
    Other,
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn tokenize(source: &str) -> Vec<Token<'_>> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '/' if bytes.get(start + 1) == Some(&b'/') => {
                while let Some(&(_, next)) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '/' if bytes.get(start + 1) == Some(&b'*') => {
                chars.next();
                let mut prev = '\0';
                for (_, next) in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            '"' | '\'' => {
                let body_start = start + 1;
                let mut body_end = source.len();
                let mut escaped = false;
                while let Some(&(pos, next)) = chars.peek() {
                    if next == '\n' {
                        body_end = pos;
                        break;
                    }
                    chars.next();
                    if escaped {
                        escaped = false;
                    } else if next == '\\' {
                        escaped = true;
                    } else if next == c {
                        body_end = pos;
                        break;
                    }
                }
                tokens.push(Token::Str(&source[body_start..body_end]));
            }
            '`' => {
                let body_start = start + 1;
                let mut body_end = source.len();
                let mut escaped = false;
                for (pos, next) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if next == '\\' {
                        escaped = true;
                    } else if next == '`' {
                        body_end = pos;
                        break;
                    }
                }
                let body = &source[body_start..body_end];
                if body.contains("${") {
                    tokens.push(Token::Other);
                } else {
                    tokens.push(Token::Str(body));
                }
            }
            c if is_ident_start(c) => {
                let mut end = start + c.len_utf8();
                while let Some(&(pos, next)) = chars.peek() {
                    if !is_ident_continue(next) {
                        break;
                    }
                    end = pos + next.len_utf8();
                    chars.next();
                }
                tokens.push(Token::Ident(&source[start..end]));
            }
            c if c.is_ascii_digit() => {
                while let Some(&(_, next)) = chars.peek() {
                    if !(next.is_ascii_alphanumeric() || next == '.' || next == '_') {
                        break;
                    }
                    chars.next();
                }
                tokens.push(Token::Other);
            }
            c => tokens.push(Token::Punct(c)),
        }
    }

    tokens
}

/// `name("mod")` with exactly one string literal argument.
fn call_argument<'a>(tokens: &[Token<'a>], at: usize) -> Option<&'a str> {
    match tokens.get(at + 1..at + 4)? {
        [Token::Punct('('), Token::Str(spec), Token::Punct(')')] => Some(*spec),
        _ => None,
    }
}

fn match_import<'a>(tokens: &[Token<'a>], at: usize) -> Option<(&'a str, ImportSyntax)> {
    match tokens.get(at + 1)? {
        Token::Punct('(') => call_argument(tokens, at).map(|s| (s, ImportSyntax::DynamicImport)),
        Token::Str(spec) => Some((*spec, ImportSyntax::SideEffectImport)),
        Token::Punct('.') => None,
        _ => find_from_clause(tokens, at + 1).map(|s| (s, ImportSyntax::ImportFrom)),
    }
}

fn match_export<'a>(tokens: &[Token<'a>], at: usize) -> Option<(&'a str, ImportSyntax)> {
    let mut i = at + 1;
    if tokens.get(i) == Some(&Token::Ident("type")) {
        i += 1;
    }
    match tokens.get(i)? {
        Token::Punct('*') | Token::Punct('{') => {
            find_from_clause(tokens, i).map(|s| (s, ImportSyntax::ExportFrom))
        }
        _ => None,
    }
}

/// Scan one import/export clause for `from "mod"`.
///
/// The clause ends at `;`, at any string literal, or at the next
/// `import`/`export` keyword, so statements without semicolons cannot borrow a
/// `from` belonging to a later statement.
fn find_from_clause<'a>(tokens: &[Token<'a>], start: usize) -> Option<&'a str> {
    let mut i = start;
    while let Some(token) = tokens.get(i) {
        match token {
            Token::Ident("from") => {
                if let Some(Token::Str(spec)) = tokens.get(i + 1) {
                    return Some(*spec);
                }
            }
            Token::Punct(';') | Token::Str(_) | Token::Ident("import") | Token::Ident("export") => {
                return None;
            }
            _ => {}
        }
        i += 1;
    }
    None
}
