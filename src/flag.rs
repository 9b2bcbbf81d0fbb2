use derive_more::From;
use serde::{Deserialize, Serialize};

/// A feature flag definition as delivered by the management service.
///
/// Flags are immutable once built. Updates arrive as whole new definitions and replace the
/// stored flag with the same `title`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flag {
    /// Identifier assigned by the management service.
    #[serde(rename = "flagId")]
    pub id: i64,
    /// Unique key of the flag, used for lookups and for correlating events.
    pub title: String,
    #[allow(missing_docs)]
    #[serde(default)]
    pub description: String,
    /// The only type this flag may be evaluated as.
    #[serde(rename = "type")]
    pub flag_type: FlagType,
    /// Targeting rules, checked in this order.
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    /// Value served when the flag is inactive, and for the default portion of the rollout.
    pub default_value: String,
    /// Width of the default value's range in the percentage rollout.
    #[serde(default, rename = "defaultPortion", alias = "defaultValuePortion")]
    pub default_percentage: u32,
    #[allow(missing_docs)]
    #[serde(default, rename = "defaultDescription", alias = "defaultValueDescription")]
    pub portion_description: String,
    /// Weighted values of the percentage rollout. Order determines bucket ranges.
    #[serde(default)]
    pub variations: Vec<Variation>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub version: i64,
    #[allow(missing_docs)]
    #[serde(default)]
    pub created_at: String,
    #[allow(missing_docs)]
    #[serde(default)]
    pub updated_at: String,
    #[allow(missing_docs)]
    #[serde(default, rename = "deleteAt", alias = "deletedAt")]
    pub deleted_at: Option<String>,
    /// Inactive flags always evaluate to `default_value`.
    pub active: bool,
}

impl Flag {
    /// Create an active flag with no rules and no variations.
    ///
    /// Until variations are added, every user receives `default_value`.
    ///
    /// ```
    /// # use lightswitch::{Flag, FlagType, UserContext};
    /// let flag = Flag::new("dark-mode", FlagType::Boolean, "true");
    /// assert_eq!(flag.evaluate::<bool>(&UserContext::new("user-1")).unwrap(), true);
    /// ```
    pub fn new(
        title: impl Into<String>,
        flag_type: FlagType,
        default_value: impl Into<String>,
    ) -> Flag {
        Flag {
            id: 0,
            title: title.into(),
            description: String::new(),
            flag_type,
            keywords: Vec::new(),
            default_value: default_value.into(),
            default_percentage: 0,
            portion_description: String::new(),
            variations: Vec::new(),
            version: 0,
            created_at: String::new(),
            updated_at: String::new(),
            deleted_at: None,
            active: true,
        }
    }

    /// Return a copy of this flag with `active` set to the given value.
    pub fn with_active(&self, active: bool) -> Flag {
        Flag {
            active,
            ..self.clone()
        }
    }
}

/// Value type declared on a flag.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagType {
    #[allow(missing_docs)]
    Boolean,
    #[allow(missing_docs)]
    Integer,
    #[allow(missing_docs)]
    String,
}

/// A targeting rule: all of its properties must match for `value` to be served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    #[allow(missing_docs)]
    #[serde(default)]
    pub properties: Vec<Property>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub description: String,
    #[allow(missing_docs)]
    pub value: String,
}

impl Keyword {
    #[allow(missing_docs)]
    pub fn new(properties: impl IntoIterator<Item = Property>, value: impl Into<String>) -> Self {
        Keyword {
            properties: properties.into_iter().collect(),
            description: String::new(),
            value: value.into(),
        }
    }
}

/// A single key/value condition of a [`Keyword`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    #[allow(missing_docs)]
    #[serde(rename = "property")]
    pub key: String,
    #[allow(missing_docs)]
    #[serde(rename = "data")]
    pub value: String,
}

impl Property {
    #[allow(missing_docs)]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Property {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One weighted value of a percentage rollout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    #[allow(missing_docs)]
    pub value: String,
    /// Width of this variation's bucket range, out of 100.
    #[serde(rename = "portion")]
    pub percentage: u32,
    #[allow(missing_docs)]
    #[serde(default)]
    pub description: String,
}

impl Variation {
    #[allow(missing_docs)]
    pub fn new(value: impl Into<String>, percentage: u32) -> Self {
        Variation {
            value: value.into(),
            percentage,
            description: String::new(),
        }
    }
}

/// An evaluated flag value, typed according to the flag's declared type.
///
/// Serialized as a plain JSON boolean, number or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From)]
#[serde(untagged)]
pub enum FlagValue {
    #[allow(missing_docs)]
    Boolean(bool),
    #[allow(missing_docs)]
    Integer(i64),
    #[allow(missing_docs)]
    String(String),
}

impl FlagValue {
    /// Type of the contained value.
    pub fn flag_type(&self) -> FlagType {
        match self {
            FlagValue::Boolean(_) => FlagType::Boolean,
            FlagValue::Integer(_) => FlagType::Integer,
            FlagValue::String(_) => FlagType::String,
        }
    }

    #[allow(missing_docs)]
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            FlagValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[allow(missing_docs)]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FlagValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[allow(missing_docs)]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::String(s) => Some(s),
            _ => None,
        }
    }
}
