use serde::{Deserialize, Serialize};

use crate::{Flag, Result};

/// A change pushed by the management service.
///
/// On the wire, events look like `{"type": "UPDATE", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagEvent {
    /// A new flag was created.
    Create(Flag),
    /// An existing flag was changed. Carries the complete new definition.
    Update(Flag),
    /// A flag was deleted.
    Delete(FlagTitle),
    /// A flag was switched on or off without any other change.
    Switch(FlagActivation),
}

impl FlagEvent {
    /// Decode an event from its JSON representation.
    pub fn from_json(bytes: &[u8]) -> Result<FlagEvent> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Title of the flag the event applies to.
    pub fn title(&self) -> &str {
        match self {
            FlagEvent::Create(flag) | FlagEvent::Update(flag) => flag.title.as_str(),
            FlagEvent::Delete(FlagTitle { title }) => title.as_str(),
            FlagEvent::Switch(FlagActivation { title, .. }) => title.as_str(),
        }
    }
}

/// Payload of a delete event. Any other field sent along is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagTitle {
    #[allow(missing_docs)]
    pub title: String,
}

/// Payload of a switch event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagActivation {
    #[allow(missing_docs)]
    pub title: String,
    #[allow(missing_docs)]
    pub active: bool,
}

/// Full set of flags used to bootstrap or resynchronize a store.
///
/// Accepts either a bare array of flags or the service's response envelope
/// `{"code": 200, "message": "...", "data": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    #[allow(missing_docs)]
    Flags(Vec<Flag>),
    #[allow(missing_docs)]
    Envelope {
        #[serde(default)]
        code: i32,
        #[serde(default)]
        message: String,
        data: Vec<Flag>,
    },
}

impl Snapshot {
    /// Decode a snapshot from its JSON representation.
    pub fn from_json(bytes: &[u8]) -> Result<Snapshot> {
        Ok(serde_json::from_slice(bytes)?)
    }

    #[allow(missing_docs)]
    pub fn flags(&self) -> &[Flag] {
        match self {
            Snapshot::Flags(flags) | Snapshot::Envelope { data: flags, .. } => flags.as_slice(),
        }
    }

    #[allow(missing_docs)]
    pub fn into_flags(self) -> Vec<Flag> {
        match self {
            Snapshot::Flags(flags) | Snapshot::Envelope { data: flags, .. } => flags,
        }
    }
}
