use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PromptId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformType {
    #[default]
    Text,
    Image,
}

impl PlatformType {
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformType::Text => "text",
            PlatformType::Image => "image",
        }
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "text" => Ok(PlatformType::Text),
            "image" => Ok(PlatformType::Image),
            other => Err(format!("unknown platform type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Latest,
    Views,
    Likes,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Latest => "latest",
            SortKey::Views => "views",
            SortKey::Likes => "likes",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "latest" => Ok(SortKey::Latest),
            "views" => Ok(SortKey::Views),
            "likes" => Ok(SortKey::Likes),
            other => Err(format!("unknown sort key '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: PromptId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content: String,
    pub platform: String,
    pub platform_type: PlatformType,
    pub category: String,
    pub author: String,
    pub author_id: i64,
    pub likes: u64,
    pub views: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl Prompt {
    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail.as_deref().is_some_and(|uri| !uri.is_empty())
    }

    pub fn created_at_display(&self) -> String {
        format_timestamp(&self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub platforms: Vec<String>,
    pub image_categories: Vec<String>,
    pub text_categories: Vec<String>,
    #[serde(default)]
    pub total_prompts: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptPage {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    #[serde(default)]
    pub items: Vec<Prompt>,
}

/// Body of both `POST /api/prompts` and `PUT /api/prompts/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PromptInput {
    pub title: String,
    pub description: String,
    pub content: String,
    pub platform: String,
    pub platform_type: PlatformType,
    pub category: String,
    pub tags: Vec<String>,
}

impl From<&Prompt> for PromptInput {
    fn from(prompt: &Prompt) -> Self {
        Self {
            title: prompt.title.clone(),
            description: prompt.description.clone(),
            content: prompt.content.clone(),
            platform: prompt.platform.clone(),
            platform_type: prompt.platform_type,
            category: prompt.category.clone(),
            tags: prompt.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeResponse {
    pub likes: u64,
}

/// Renders an API timestamp for display. The API emits either RFC 3339 or a
/// naive ISO timestamp without offset; anything else is shown verbatim.
pub fn format_timestamp(ts: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string();
    }
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| ts.to_string())
}
