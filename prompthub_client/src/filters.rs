use std::fmt;
use std::str::FromStr;

use crate::models::{PlatformType, SortKey};

/// A filter selection where `All` stands for the API's `all` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Choice<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn as_only(&self) -> Option<&T> {
        match self {
            Choice::All => None,
            Choice::Only(value) => Some(value),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str("all"),
            Choice::Only(value) => value.fmt(f),
        }
    }
}

/// Parses `all` (or an empty string) as [`Choice::All`], anything else as a
/// concrete value.
impl<T: FromStr> FromStr for Choice<T> {
    type Err = T::Err;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() || raw == "all" {
            Ok(Choice::All)
        } else {
            raw.parse().map(Choice::Only)
        }
    }
}

impl From<&str> for Choice<String> {
    fn from(raw: &str) -> Self {
        if raw.is_empty() || raw == "all" {
            Choice::All
        } else {
            Choice::Only(raw.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FilterState {
    pub sort: SortKey,
    pub platform_type: Choice<PlatformType>,
    pub platform: Choice<String>,
    pub category: Choice<String>,
    pub search: String,
}

impl FilterState {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Merges `patch` into the current selection. Changing the platform type
    /// resets the category, because categories belong to one type's
    /// vocabulary, unless the same patch picks a new category.
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(sort) = patch.sort {
            self.sort = sort;
        }
        if let Some(platform_type) = patch.platform_type {
            self.platform_type = platform_type;
            self.category = Choice::All;
        }
        if let Some(platform) = patch.platform {
            self.platform = platform;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(search) = patch.search {
            self.search = search;
        }
    }

    pub fn merged(mut self, patch: FilterPatch) -> Self {
        self.apply(patch);
        self
    }
}

/// Partial update of a [`FilterState`]; `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterPatch {
    pub sort: Option<SortKey>,
    pub platform_type: Option<Choice<PlatformType>>,
    pub platform: Option<Choice<String>>,
    pub category: Option<Choice<String>>,
    pub search: Option<String>,
}

impl FilterPatch {
    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn platform_type(mut self, platform_type: Choice<PlatformType>) -> Self {
        self.platform_type = Some(platform_type);
        self
    }

    pub fn platform(mut self, platform: impl Into<Choice<String>>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn category(mut self, category: impl Into<Choice<String>>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}
