use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Identity and attributes of the user a flag is evaluated for.
///
/// The context is immutable once built. Use [`UserContext::builder`] to accumulate properties
/// fluently, or [`UserContext::with_properties`] when a map is already at hand.
///
/// ```
/// # use lightswitch::UserContext;
/// let user = UserContext::builder("user-1")
///     .property("plan", "pro")
///     .property("country", "KR")
///     .build();
/// assert_eq!(user.property("plan"), Some("pro"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserContext {
    id: String,
    #[serde(default)]
    properties: HashMap<String, String>,
}

impl UserContext {
    /// Create a context with no properties.
    pub fn new(id: impl Into<String>) -> UserContext {
        UserContext {
            id: id.into(),
            properties: HashMap::new(),
        }
    }

    /// Create a context from an existing property map.
    pub fn with_properties(id: impl Into<String>, properties: HashMap<String, String>) -> Self {
        UserContext {
            id: id.into(),
            properties,
        }
    }

    /// Start building a context for the user `id`.
    pub fn builder(id: impl Into<String>) -> UserContextBuilder {
        UserContextBuilder {
            id: id.into(),
            properties: HashMap::new(),
        }
    }

    /// User identifier, the input of percentage bucketing.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Value of the property `key`, if the user has it.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    #[allow(missing_docs)]
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }
}

/// Fluent builder for [`UserContext`].
#[derive(Debug, Clone)]
pub struct UserContextBuilder {
    id: String,
    properties: HashMap<String, String>,
}

impl UserContextBuilder {
    /// Add a property. Setting the same key twice keeps the last value.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    #[allow(missing_docs)]
    pub fn build(self) -> UserContext {
        UserContext {
            id: self.id,
            properties: self.properties,
        }
    }
}
