use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyEntry {
    pub trigger: String,
    pub response: String,
}

impl ReplyEntry {
    pub fn new(trigger: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            response: response.into(),
        }
    }
}

/// How triggers are compared against incoming text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriggerCase {
    #[default]
    Sensitive,
    /// Triggers are stored lower-cased and incoming text is lower-cased before lookup.
    Insensitive,
}

impl TriggerCase {
    pub fn normalize(self, text: &str) -> String {
        let trimmed = text.trim();
        match self {
            TriggerCase::Sensitive => trimmed.to_string(),
            TriggerCase::Insensitive => trimmed.to_lowercase(),
        }
    }
}

/// The full trigger table in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replies {
    entries: Vec<ReplyEntry>,
}

impl Replies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, trigger: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.trigger == trigger)
            .map(|e| e.response.as_str())
    }

    /// Overwrite in place when the trigger exists, append otherwise. Returns true on overwrite.
    pub fn insert(&mut self, trigger: String, response: String) -> bool {
        match self.entries.iter_mut().find(|e| e.trigger == trigger) {
            Some(existing) => {
                existing.response = response;
                true
            }
            None => {
                self.entries.push(ReplyEntry { trigger, response });
                false
            }
        }
    }

    pub fn remove(&mut self, trigger: &str) -> Option<ReplyEntry> {
        let idx = self.entries.iter().position(|e| e.trigger == trigger)?;
        Some(self.entries.remove(idx))
    }

    pub fn into_entries(self) -> Vec<ReplyEntry> {
        self.entries
    }

    pub(crate) fn to_json_object(&self) -> serde_json::Map<String, serde_json::Value> {
        self.entries
            .iter()
            .map(|e| (e.trigger.clone(), serde_json::Value::String(e.response.clone())))
            .collect()
    }

    /// Fails on anything but an object of string values. A repeated key keeps its last value.
    pub(crate) fn from_json_value(value: serde_json::Value) -> Result<Self, String> {
        let serde_json::Value::Object(map) = value else {
            return Err("top-level value is not an object".to_string());
        };

        let mut replies = Replies::new();
        for (trigger, response) in map {
            match response {
                serde_json::Value::String(response) => {
                    replies.insert(trigger, response);
                }
                other => return Err(format!("value for {trigger:?} is not a string: {other}")),
            }
        }
        Ok(replies)
    }
}
