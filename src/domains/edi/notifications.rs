use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
}

/// Message for the user who triggered the operation; the host decides how to show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Notices(Vec<Notice>);

impl Notices {
    pub fn success(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.0.push(Notice {
            level: NoticeLevel::Success,
            message,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.0.push(Notice {
            level: NoticeLevel::Info,
            message,
        });
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.0.push(Notice {
            level: NoticeLevel::Warning,
            message,
        });
    }

    pub fn extend(&mut self, other: Notices) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, level: NoticeLevel, message: &str) -> bool {
        self.0.iter().any(|n| n.level == level && n.message == message)
    }
}
