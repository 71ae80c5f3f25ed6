//! Content document names and write actions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a content document (`home`, `pricing`, ...).
///
/// A name must be non-empty and may nest with `/` (`blog/post`), but no segment
/// may be empty, `.` or `..`. Lowercase ASCII letters, digits and hyphens are
/// the convention; see [`Self::is_conventional`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentName(String);

impl DocumentName {
    /// Create a document name, rejecting empty input and relative segments.
    pub fn new(name: impl Into<String>) -> crate::Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(crate::Error::MissingFilename);
        }
        if name
            .split('/')
            .any(|segment| matches!(segment, "" | "." | ".."))
        {
            return Err(crate::Error::InvalidName(format!(
                "'{name}' must not contain empty, '.' or '..' path segments"
            )));
        }
        Ok(Self(name))
    }

    /// Create a document name that must also follow the naming convention.
    pub fn conventional(name: impl Into<String>) -> crate::Result<Self> {
        let name = Self::new(name)?;
        if !name.is_conventional() {
            return Err(crate::Error::InvalidName(format!(
                "'{name}' must contain only lowercase letters, digits and hyphens"
            )));
        }
        Ok(name)
    }

    /// Whether the name uses only lowercase ASCII letters, digits and hyphens.
    pub fn is_conventional(&self) -> bool {
        self.0
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    /// Get the name string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the backing blob, e.g. `home.json`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, crate::DOCUMENT_EXTENSION)
    }

    /// Path of the backing blob below `content_root`.
    pub fn path_in(&self, content_root: &str) -> String {
        let root = content_root.trim_end_matches('/');
        if root.is_empty() {
            self.file_name()
        } else {
            format!("{root}/{}", self.file_name())
        }
    }
}

impl TryFrom<String> for DocumentName {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::new(value)
    }
}

impl From<DocumentName> for String {
    fn from(name: DocumentName) -> Self {
        name.0
    }
}

impl fmt::Debug for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentName({})", self.0)
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A mutating operation on a content document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteAction {
    Create,
    Update,
    Delete,
}

impl WriteAction {
    /// Verb used in commit messages.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }

    /// Commit message used when the caller does not supply one.
    pub fn default_message(self, name: &DocumentName) -> String {
        format!("{} {} via Admin Dashboard", self.verb(), name.file_name())
    }

    /// Caller-supplied message, falling back to [`Self::default_message`].
    ///
    /// Empty messages fall back as well.
    pub fn message_or_default(self, name: &DocumentName, message: Option<&str>) -> String {
        match message {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => self.default_message(name),
        }
    }

    /// Message returned to the caller once the write succeeded.
    pub fn success_message(self) -> &'static str {
        match self {
            Self::Create => "Content created successfully",
            Self::Update => "Content updated successfully",
            Self::Delete => "Content deleted successfully",
        }
    }
}

/// An editable document known to the admin editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Document name.
    pub id: &'static str,
    /// Human-readable label.
    pub label: &'static str,
}

/// Documents offered by the admin editor, in display order.
pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "home",
        label: "Home Page",
    },
    CatalogEntry {
        id: "how-it-works",
        label: "How It Works",
    },
    CatalogEntry {
        id: "features",
        label: "Features",
    },
    CatalogEntry {
        id: "pricing",
        label: "Pricing",
    },
    CatalogEntry {
        id: "about",
        label: "About Us",
    },
    CatalogEntry {
        id: "contact",
        label: "Contact",
    },
];

/// Look up the catalog label for a document, if it is catalogued.
pub fn catalog_label(name: &str) -> Option<&'static str> {
    CATALOG
        .iter()
        .find(|entry| entry.id == name)
        .map(|entry| entry.label)
}
