use serde::{Deserialize, Serialize};

/// Notification shared by every recipient of one fan-out
#[derive(Debug, Clone, PartialEq)]
pub struct PushContent {
    pub title: String,
    pub subtitle: Option<String>,
    pub body: String,
    pub data: Option<serde_json::Value>,
    pub sound: Option<String>,
    pub badge: Option<u32>,
}

impl PushContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            body: body.into(),
            data: None,
            sound: Some("default".to_string()),
            badge: None,
        }
    }

    pub fn to_message(&self, to: &str) -> PushMessage {
        PushMessage {
            to: to.to_string(),
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            body: self.body.clone(),
            data: self.data.clone(),
            sound: self.sound.clone(),
            badge: self.badge,
        }
    }
}

/// Expo push message, one per device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    pub to: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<u32>,
}

/// Per-message acknowledgement from Expo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PushTicket {
    Ok {
        id: String,
    },
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<serde_json::Value>,
    },
}

impl PushTicket {
    pub fn is_ok(&self) -> bool {
        matches!(self, PushTicket::Ok { .. })
    }
}

/// Expo send endpoint response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ExpoSendResponse {
    #[serde(default)]
    pub data: Vec<PushTicket>,
}
