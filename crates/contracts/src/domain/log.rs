use serde::{Deserialize, Serialize};

use super::tag::Tag;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogAuthor {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRunReference {
    pub id: i64,
    pub run_number: i64,
}

/// A logbook entry as returned by `GET /api/logs`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Log {
    pub id: i64,
    pub title: String,
    pub origin: Option<String>,
    pub subtype: Option<String>,
    pub author: Option<LogAuthor>,
    /// Milliseconds since the epoch
    pub created_at: Option<i64>,
    pub root_log_id: Option<i64>,
    pub replies: Option<u32>,
    pub tags: Vec<Tag>,
    pub runs: Vec<LogRunReference>,
}
