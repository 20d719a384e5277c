#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use prompthub_client::models::{LikeResponse, Meta, PlatformType, Prompt, PromptId, PromptInput, PromptPage};
use prompthub_client::{ApiError, ListRequest, PromptBackend};

/// In-process stand-in for the prompt API with the same filtering, sorting
/// and paging rules, plus knobs for latency and failures.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
    pub list_calls: Arc<AtomicUsize>,
    pub like_calls: Arc<AtomicUsize>,
    pub write_calls: Arc<AtomicUsize>,
}

#[derive(Default)]
struct Inner {
    prompts: Vec<Prompt>,
    next_id: PromptId,
    search_delays: HashMap<String, Duration>,
    page_delays: HashMap<u32, Duration>,
    fail_lists: bool,
    fail_likes: bool,
    fail_writes: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.inner.lock().unwrap().next_id = 1;
        backend
    }

    pub fn seeded(count: usize) -> Self {
        let backend = Self::new();
        for i in 0..count {
            let platform_type = if i % 2 == 0 { PlatformType::Text } else { PlatformType::Image };
            backend.insert(PromptInput {
                title: format!("prompt {i}"),
                description: format!("description {i}"),
                content: format!("content {i}"),
                platform: if i % 2 == 0 { "ChatGPT".into() } else { "Midjourney".into() },
                platform_type,
                category: match platform_type {
                    PlatformType::Text => "개발".into(),
                    PlatformType::Image => "배경".into(),
                },
                tags: vec![],
            });
        }
        backend
    }

    pub fn insert(&self, input: PromptInput) -> Prompt {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        let prompt = Prompt {
            id,
            title: input.title,
            description: input.description,
            content: input.content,
            platform: input.platform,
            platform_type: input.platform_type,
            category: input.category,
            author: "익명 사용자".into(),
            author_id: 999,
            likes: 0,
            views: 0,
            tags: input.tags,
            created_at: format!("2024-01-01T00:00:{:02}", id % 60),
            thumbnail: None,
        };
        inner.prompts.push(prompt.clone());
        prompt
    }

    pub fn set_likes(&self, id: PromptId, likes: u64) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(prompt) = inner.prompts.iter_mut().find(|p| p.id == id) {
            prompt.likes = likes;
        }
    }

    pub fn prompt(&self, id: PromptId) -> Option<Prompt> {
        self.inner.lock().unwrap().prompts.iter().find(|p| p.id == id).cloned()
    }

    pub fn delay_search(&self, search: &str, delay: Duration) {
        self.inner.lock().unwrap().search_delays.insert(search.to_string(), delay);
    }

    pub fn delay_page(&self, page: u32, delay: Duration) {
        self.inner.lock().unwrap().page_delays.insert(page, delay);
    }

    pub fn fail_lists(&self, fail: bool) {
        self.inner.lock().unwrap().fail_lists = fail;
    }

    pub fn fail_likes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_likes = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }

    fn not_found(path: String) -> ApiError {
        ApiError::request_failed(path, "404 Not Found")
    }
}

impl PromptBackend for MemoryBackend {
    fn list_prompts(&self, request: &ListRequest) -> Result<PromptPage, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let page: u32 = request.param("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        let page_size: u32 = request.param("page_size").and_then(|p| p.parse().ok()).unwrap_or(12);

        let delay = {
            let inner = self.inner.lock().unwrap();
            let by_search = request
                .param("search")
                .and_then(|s| inner.search_delays.get(s).copied());
            by_search.or_else(|| inner.page_delays.get(&page).copied())
        };
        if let Some(delay) = delay {
            thread::sleep(delay);
        }

        let inner = self.inner.lock().unwrap();
        if inner.fail_lists {
            return Err(ApiError::request_failed(request.path, "500 Internal Server Error"));
        }

        let mut matches: Vec<Prompt> = inner
            .prompts
            .iter()
            .filter(|p| {
                request
                    .param("platform_type")
                    .map_or(true, |t| p.platform_type.as_str() == t)
            })
            .filter(|p| request.param("platform").map_or(true, |v| p.platform == v))
            .filter(|p| request.param("category").map_or(true, |v| p.category == v))
            .filter(|p| {
                request.param("search").map_or(true, |kw| {
                    let kw = kw.to_lowercase();
                    p.title.to_lowercase().contains(&kw) || p.description.to_lowercase().contains(&kw)
                })
            })
            .cloned()
            .collect();
        match request.param("sort") {
            Some("views") => matches.sort_by(|a, b| b.views.cmp(&a.views)),
            Some("likes") => matches.sort_by(|a, b| b.likes.cmp(&a.likes)),
            _ => matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))),
        }

        let total = matches.len() as u64;
        let start = ((page - 1) * page_size) as usize;
        let items = matches.into_iter().skip(start).take(page_size as usize).collect();
        Ok(PromptPage {
            total,
            page,
            page_size,
            items,
        })
    }

    fn get_prompt(&self, id: PromptId) -> Result<Prompt, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        let prompt = inner
            .prompts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Self::not_found(format!("/api/prompts/{id}")))?;
        prompt.views += 1;
        Ok(prompt.clone())
    }

    fn create_prompt(&self, input: &PromptInput) -> Result<Prompt, ApiError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.lock().unwrap().fail_writes {
            return Err(ApiError::request_failed("/api/prompts", "500 Internal Server Error"));
        }
        Ok(self.insert(input.clone()))
    }

    fn update_prompt(&self, id: PromptId, input: &PromptInput) -> Result<Prompt, ApiError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(ApiError::request_failed(format!("/api/prompts/{id}"), "500"));
        }
        let prompt = inner
            .prompts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Self::not_found(format!("/api/prompts/{id}")))?;
        prompt.title = input.title.clone();
        prompt.description = input.description.clone();
        prompt.content = input.content.clone();
        prompt.platform = input.platform.clone();
        prompt.platform_type = input.platform_type;
        prompt.category = input.category.clone();
        prompt.tags = input.tags.clone();
        Ok(prompt.clone())
    }

    fn delete_prompt(&self, id: PromptId) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.prompts.len();
        inner.prompts.retain(|p| p.id != id);
        if inner.prompts.len() == before {
            return Err(Self::not_found(format!("/api/prompts/{id}")));
        }
        Ok(())
    }

    fn like_prompt(&self, id: PromptId) -> Result<LikeResponse, ApiError> {
        self.like_calls.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_likes {
            return Err(ApiError::request_failed(format!("/api/prompts/{id}/like"), "503"));
        }
        let prompt = inner
            .prompts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Self::not_found(format!("/api/prompts/{id}/like")))?;
        prompt.likes += 1;
        Ok(LikeResponse { likes: prompt.likes })
    }

    fn get_meta(&self) -> Result<Meta, ApiError> {
        let mut meta = Meta::fallback();
        meta.total_prompts = self.inner.lock().unwrap().prompts.len() as u64;
        Ok(meta)
    }
}
