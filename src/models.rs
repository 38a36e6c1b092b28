//! Domain Models
//!
//! Transient, UI-scoped copies of the records the CMS backend owns.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chat channel a conversation arrived through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSource {
    Telegram,
    Website,
}

impl ChatSource {
    pub const ALL: [ChatSource; 2] = [ChatSource::Telegram, ChatSource::Website];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatSource::Telegram => "telegram",
            ChatSource::Website => "website",
        }
    }
}

impl fmt::Display for ChatSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "telegram" => Ok(ChatSource::Telegram),
            "website" | "web" => Ok(ChatSource::Website),
            other => Err(format!("unknown chat source '{}'", other)),
        }
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOrigin {
    Operator,
    Participant,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "null_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_default")]
    pub from_admin: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl Message {
    pub fn origin(&self) -> MessageOrigin {
        if self.from_admin {
            MessageOrigin::Operator
        } else {
            MessageOrigin::Participant
        }
    }
}

/// A conversation with one external participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub source: Option<ChatSource>,
    #[serde(default, deserialize_with = "null_default")]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Chat {
    pub fn latest_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// `GET /api/chats` without a source filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatsBySource {
    #[serde(default, deserialize_with = "null_default")]
    pub telegram: Vec<Chat>,
    #[serde(default, deserialize_with = "null_default")]
    pub website: Vec<Chat>,
}

impl ChatsBySource {
    pub fn for_source(&self, source: ChatSource) -> &[Chat] {
        match source {
            ChatSource::Telegram => &self.telegram,
            ChatSource::Website => &self.website,
        }
    }
}

/// Unit category; anything but residential is administrative
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Residential,
    #[default]
    #[serde(other)]
    Administrative,
}

/// A sellable property record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Unit {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit_number: String,
    #[serde(default, deserialize_with = "null_default")]
    pub unit_type: UnitCategory,
    #[serde(default, deserialize_with = "null_default")]
    pub area_sqm: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub total_price: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnitList {
    #[serde(default, deserialize_with = "null_default")]
    pub units: Vec<Unit>,
}

/// An uploaded media file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaAsset {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_default")]
    pub file_size: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub thumbnail_url: String,
}

impl MediaAsset {
    /// Size in kilobytes with two decimals
    pub fn size_kb(&self) -> String {
        format!("{:.2}", self.file_size as f64 / 1024.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaList {
    #[serde(default, deserialize_with = "null_default")]
    pub media: Vec<MediaAsset>,
}

/// Serialized editor output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    #[serde(default, deserialize_with = "null_default")]
    pub html: String,
    #[serde(default, deserialize_with = "null_default")]
    pub css: String,
}

/// A CMS page built in the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitePage {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub content: PageContent,
    #[serde(default, deserialize_with = "null_default")]
    pub is_published: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageList {
    #[serde(default, deserialize_with = "null_default")]
    pub pages: Vec<SitePage>,
}

/// Dashboard counters, shown exactly as the backend sends them
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub revenue: serde_json::Value,
    #[serde(default)]
    pub leads: serde_json::Value,
    #[serde(default)]
    pub units: serde_json::Value,
    #[serde(default)]
    pub chats: serde_json::Value,
}

/// Display form of a JSON scalar: strings unquoted, null empty
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One entry of the recent-activity feed
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Activity {
    #[serde(default, deserialize_with = "null_default")]
    pub icon: String,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub time: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Treat an explicit `null` like a missing field
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// String or number, with `null` read as empty
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_string_or_number(deserializer)?.unwrap_or_default())
}
