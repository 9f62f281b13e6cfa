//! Token store - In-memory corpus parsed from a persisted token document
//!
//! Accepted document shapes:
//! - a flat object mapping token name to value
//! - a wrapper `{"tokens": {...}, "$metadata": ...}`; inside `tokens`, keys
//!   starting with `$` are internal metadata and are dropped
//!
//! Values may be strings, numbers, booleans, or objects carrying a `value`
//! and an optional `description`.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{LoadError, ParseError};

/// Value prefixes that identify renderable colors and gradients
pub const COLOR_PREFIXES: [&str; 3] = ["hsl(", "hsla(", "linear-gradient("];

/// Key of the wrapper form
const WRAPPER_KEY: &str = "tokens";
/// Prefix of internal metadata entries inside the wrapper
const METADATA_PREFIX: char = '$';

/// Whether a token value is a color or gradient we can render
pub fn is_color_like(value: &str) -> bool {
    let value = value.trim_start();
    COLOR_PREFIXES.iter().any(|prefix| value.starts_with(prefix))
}

/// A named design value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub name: String,
    pub value: String,
    pub description: Option<String>,
    pub is_color_like: bool,
}

impl Token {
    pub fn new(name: impl Into<String>, value: impl Into<String>, description: Option<String>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            is_color_like: is_color_like(&value),
            value,
            description,
        }
    }

    /// Text shown under the title: the description when present, else the value
    pub fn subtitle(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.value)
    }
}

/// Ordered, name-keyed token collection for one document version
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    tokens: Vec<Token>,
    index: HashMap<String, usize>,
}

impl Corpus {
    /// Build from tokens in source order; a repeated name keeps its first position
    /// and takes the latest value
    pub fn from_tokens(tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut corpus = Corpus::default();
        for token in tokens {
            match corpus.index.get(&token.name) {
                Some(&pos) => corpus.tokens[pos] = token,
                None => {
                    corpus.index.insert(token.name.clone(), corpus.tokens.len());
                    corpus.tokens.push(token);
                }
            }
        }
        corpus
    }

    /// Parse a token document
    pub fn parse(document: &[u8]) -> Result<Self, ParseError> {
        let root: Value = serde_json::from_slice(document)?;
        let Value::Object(root) = root else {
            return Err(ParseError::NotAnObject);
        };

        let tokens = match root.get(WRAPPER_KEY) {
            Some(Value::Object(inner)) => parse_entries(inner, true)?,
            _ => parse_entries(&root, false)?,
        };
        Ok(Self::from_tokens(tokens))
    }

    /// Read and parse a token document from disk
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&bytes)?)
    }

    #[allow(dead_code)]
    pub fn lookup(&self, name: &str) -> Option<&Token> {
        self.index.get(name).map(|&pos| &self.tokens[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    #[allow(dead_code)]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn parse_entries(entries: &Map<String, Value>, strip_metadata: bool) -> Result<Vec<Token>, ParseError> {
    entries
        .iter()
        .filter(|(name, _)| !(strip_metadata && name.starts_with(METADATA_PREFIX)))
        .map(|(name, value)| parse_entry(name, value))
        .collect()
}

fn parse_entry(name: &str, value: &Value) -> Result<Token, ParseError> {
    let invalid = || ParseError::InvalidEntry {
        name: name.to_string(),
    };

    match value {
        Value::String(s) => Ok(Token::new(name, s.as_str(), None)),
        Value::Number(n) => Ok(Token::new(name, n.to_string(), None)),
        Value::Bool(b) => Ok(Token::new(name, b.to_string(), None)),
        Value::Object(fields) => {
            let raw = match fields.get("value") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => return Err(invalid()),
            };
            let description = fields
                .get("description")
                .and_then(Value::as_str)
                .filter(|d| !d.is_empty())
                .map(str::to_string);
            Ok(Token::new(name, raw, description))
        }
        Value::Null | Value::Array(_) => Err(invalid()),
    }
}
