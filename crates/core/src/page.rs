//! Typed page schemas.
//!
//! Each catalogued page with a fixed shape gets its own struct. Documents with no
//! registered schema stay opaque JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A feature card (icon, title, description).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureItem {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeHero {
    pub headline: String,
    pub subheadline: String,
    pub cta_text: String,
    pub hero_image: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureGroup {
    pub title: String,
    pub items: Vec<FeatureItem>,
}

/// Content of the `home` document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub title: String,
    pub meta_description: String,
    pub hero: HomeHero,
    pub features_obj: Vec<FeatureGroup>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturesHero {
    pub title: String,
    pub subtitle: String,
}

/// Content of the `features` document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesPage {
    pub title: String,
    pub meta_description: String,
    pub hero: FeaturesHero,
    pub feature_list: Vec<FeatureItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    pub name: String,
    pub price: String,
    pub period: String,
    pub features: Vec<String>,
    pub cta_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<bool>,
}

/// Content of the `pricing` document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPage {
    pub title: String,
    pub meta_description: String,
    pub plans: Vec<PricingPlan>,
}

/// A content document, tagged by its name.
#[derive(Clone, Debug, PartialEq)]
pub enum PageDocument {
    Home(HomePage),
    Features(FeaturesPage),
    Pricing(PricingPage),
    /// Any document without a registered schema.
    Other { name: String, content: Value },
}

impl PageDocument {
    /// Names that carry a registered schema.
    pub const SCHEMA_NAMES: &'static [&'static str] = &["home", "features", "pricing"];

    /// Whether `name` carries a registered schema.
    pub fn has_schema(name: &str) -> bool {
        Self::SCHEMA_NAMES.contains(&name)
    }

    /// Validate `content` against the schema registered for `name`.
    pub fn parse(name: &str, content: Value) -> crate::Result<Self> {
        fn typed<T: serde::de::DeserializeOwned>(name: &str, content: Value) -> crate::Result<T> {
            serde_json::from_value(content).map_err(|e| crate::Error::InvalidDocument {
                name: name.to_string(),
                reason: e.to_string(),
            })
        }

        match name {
            "home" => typed(name, content).map(Self::Home),
            "features" => typed(name, content).map(Self::Features),
            "pricing" => typed(name, content).map(Self::Pricing),
            _ => Ok(Self::Other {
                name: name.to_string(),
                content,
            }),
        }
    }

    /// Page title, when the document has one.
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Home(page) => Some(&page.title),
            Self::Features(page) => Some(&page.title),
            Self::Pricing(page) => Some(&page.title),
            Self::Other { content, .. } => content.get("title").and_then(Value::as_str),
        }
    }

    /// Meta description, when the document has one.
    pub fn meta_description(&self) -> Option<&str> {
        match self {
            Self::Home(page) => Some(&page.meta_description),
            Self::Features(page) => Some(&page.meta_description),
            Self::Pricing(page) => Some(&page.meta_description),
            Self::Other { content, .. } => content.get("metaDescription").and_then(Value::as_str),
        }
    }
}
