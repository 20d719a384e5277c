use thiserror::Error;

use crate::catalog::MAX_TAGS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TagRejection {
    #[error("tag is empty")]
    Empty,
    #[error("tag already added")]
    Duplicate,
    #[error("at most {MAX_TAGS} tags are allowed")]
    Full,
}

/// Pending tag input plus the committed, insertion-ordered tag list.
///
/// Tags added through the editor are never empty, lose one leading `#`, never
/// duplicate an existing tag (case-sensitive) and stop at [`MAX_TAGS`]. Tags
/// seeded from a stored prompt are kept exactly as saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagEditor {
    pub input: String,
    tags: Vec<String>,
}

impl TagEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the editor with stored tags as they are.
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: String::new(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tags.len() >= MAX_TAGS
    }

    pub fn add_tag(&mut self, raw: &str) -> Result<&str, TagRejection> {
        let tag = normalize(raw);
        if tag.is_empty() {
            return Err(TagRejection::Empty);
        }
        if self.tags.iter().any(|existing| existing == tag) {
            return Err(TagRejection::Duplicate);
        }
        if self.is_full() {
            return Err(TagRejection::Full);
        }
        self.tags.push(tag.to_string());
        Ok(self.tags.last().map(String::as_str).unwrap_or_default())
    }

    /// Adds the pending input as a tag and clears it. On rejection the input
    /// is kept so the user can fix it.
    pub fn commit_input(&mut self) -> Result<(), TagRejection> {
        let raw = std::mem::take(&mut self.input);
        let outcome = self.add_tag(&raw).map(|_| ());
        if outcome.is_err() {
            self.input = raw;
        }
        outcome
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|existing| existing == tag) {
            Some(index) => {
                self.tags.remove(index);
                true
            }
            None => false,
        }
    }
}

fn normalize(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_prefix('#').unwrap_or(trimmed)
}
