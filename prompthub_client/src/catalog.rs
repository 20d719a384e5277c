//! Fixed vocabularies served by the API's `/api/meta` endpoint.
//!
//! Forms pick categories from these lists directly; the list sidebar prefers
//! the runtime [`Meta`] and only falls back to these when it is unavailable.

use crate::filters::Choice;
use crate::models::{Meta, PlatformType};

pub const PLATFORMS: &[&str] = &[
    "ChatGPT",
    "Gemini",
    "Copilot",
    "Midjourney",
    "DALL-E",
    "Stable Diffusion",
    "CLOVA X",
    "Claude",
];

pub const IMAGE_CATEGORIES: &[&str] = &[
    "3D", "일러스트", "사물", "동물", "인물", "캐릭터", "게임", "디자인", "예술", "공예", "패션",
    "건축", "음식", "사진", "배경", "로고", "기타",
];

pub const TEXT_CATEGORIES: &[&str] = &[
    "글쓰기", "개발", "교육", "마케팅", "연구", "업무", "콘텐츠", "생산성", "여행", "SNS",
    "고민해결", "생활", "재미", "기타",
];

pub const DEFAULT_PLATFORM: &str = "ChatGPT";
pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const MAX_PAGE_SIZE: u32 = 50;
pub const MAX_TAGS: usize = 8;

pub fn categories_for(platform_type: PlatformType) -> &'static [&'static str] {
    match platform_type {
        PlatformType::Image => IMAGE_CATEGORIES,
        PlatformType::Text => TEXT_CATEGORIES,
    }
}

pub fn is_category_of(platform_type: PlatformType, category: &str) -> bool {
    categories_for(platform_type).contains(&category)
}

impl Meta {
    /// Catalog built from the compiled-in vocabularies, used when `/api/meta`
    /// cannot be reached.
    pub fn fallback() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            platforms: owned(PLATFORMS),
            image_categories: owned(IMAGE_CATEGORIES),
            text_categories: owned(TEXT_CATEGORIES),
            total_prompts: 0,
        }
    }

    /// Category choices offered by the filter sidebar for a type filter.
    /// With no type selected both vocabularies are offered, image first,
    /// without repeating shared names such as "기타".
    pub fn categories_for(&self, platform_type: Choice<PlatformType>) -> Vec<String> {
        match platform_type {
            Choice::Only(PlatformType::Image) => self.image_categories.clone(),
            Choice::Only(PlatformType::Text) => self.text_categories.clone(),
            Choice::All => {
                let mut merged: Vec<String> = Vec::with_capacity(
                    self.image_categories.len() + self.text_categories.len(),
                );
                for category in self.image_categories.iter().chain(&self.text_categories) {
                    if !merged.contains(category) {
                        merged.push(category.clone());
                    }
                }
                merged
            }
        }
    }
}
