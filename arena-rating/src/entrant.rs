//! Entrant identity: id, validated display name, stable URL slug.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct EntrantId(Uuid);

impl EntrantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for EntrantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An AI model registered in the arena. The slug is assigned at
/// registration and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    pub display_name: String,
    pub provider: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn parse(s: String) -> Result<Self, String> {
        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];

        if s.trim().is_empty() {
            Err(format!("Name {} has no non-whitespace characters.", s))
        } else if s.graphemes(true).count() > 128 {
            Err(format!("Name {} is too long.", s))
        } else if s.chars().any(|g| forbidden_characters.contains(&g)) {
            Err(format!("Name {} contains forbidden characters.", s))
        } else {
            Ok(Self(s))
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lowercases ASCII-alphanumeric runs of `name` and joins them with
/// dashes. Collisions are resolved at registration (see `Arena`), not
/// here. Falls back to `"entrant"` for names with no usable characters.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("entrant");
    }
    slug
}
