//! Launcher result model
//!
//! Every command maps its output to a `ResultSet` before rendering, so the
//! launcher always receives one `{"items": [...]}` object.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::store::Token;

/// Marker kind for icons that have no file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Default,
}

/// Icon reference: a file path or a generic marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IconRef {
    Path { path: PathBuf },
    Marker {
        #[serde(rename = "type")]
        kind: IconKind,
    },
}

impl IconRef {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        IconRef::Path { path: path.into() }
    }

    pub fn default_marker() -> Self {
        IconRef::Marker {
            kind: IconKind::Default,
        }
    }

    #[allow(dead_code)]
    pub fn is_default(&self) -> bool {
        matches!(self, IconRef::Marker { .. })
    }
}

/// One entry of the launcher result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub uid: String,
    pub title: String,
    pub subtitle: String,
    pub arg: String,
    pub autocomplete: String,
    pub icon: IconRef,
}

impl Item {
    /// Create an item for a token
    pub fn token(token: &Token, icon: IconRef) -> Self {
        Self {
            uid: token.name.clone(),
            title: token.name.clone(),
            subtitle: token.subtitle().to_string(),
            arg: token.name.clone(),
            autocomplete: token.name.clone(),
            icon,
        }
    }

    /// Create a synthetic status item (update outcome, batch reports)
    pub fn message(uid: impl Into<String>, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        let uid = uid.into();
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            arg: uid.clone(),
            autocomplete: uid.clone(),
            uid,
            icon: IconRef::default_marker(),
        }
    }
}

/// A collection of result items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<Item>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Item> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
