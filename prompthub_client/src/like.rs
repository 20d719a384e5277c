use log::{info, warn};

use crate::api::{ApiError, PromptBackend};
use crate::models::{LikeResponse, Prompt, PromptId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LikeState {
    #[default]
    Unliked,
    Pending,
    Liked,
}

/// Like button state for one rendered prompt.
///
/// The latch lives with the card or detail view that owns it: a fresh control
/// for the same prompt (after a reload, or in a second card) starts unliked
/// again and will send another like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeControl {
    prompt_id: PromptId,
    likes: u64,
    state: LikeState,
}

impl LikeControl {
    pub fn new(prompt_id: PromptId, likes: u64) -> Self {
        Self {
            prompt_id,
            likes,
            state: LikeState::Unliked,
        }
    }

    pub fn for_prompt(prompt: &Prompt) -> Self {
        Self::new(prompt.id, prompt.likes)
    }

    pub fn prompt_id(&self) -> PromptId {
        self.prompt_id
    }

    pub fn likes(&self) -> u64 {
        self.likes
    }

    pub fn state(&self) -> LikeState {
        self.state
    }

    pub fn is_liked(&self) -> bool {
        self.state == LikeState::Liked
    }

    /// Registers a click. Returns the prompt to like when a request should be
    /// sent, which happens at most once until that request fails.
    pub fn begin(&mut self) -> Option<PromptId> {
        match self.state {
            LikeState::Unliked => {
                self.state = LikeState::Pending;
                Some(self.prompt_id)
            }
            LikeState::Pending | LikeState::Liked => None,
        }
    }

    /// Settles the request issued by [`begin`](Self::begin). The displayed
    /// count takes the server's value, never a local increment. A failure is
    /// logged and leaves the control unliked so the user can click again.
    pub fn finish(&mut self, result: Result<LikeResponse, ApiError>) -> bool {
        if self.state != LikeState::Pending {
            return false;
        }
        match result {
            Ok(response) => {
                info!(
                    "prompt {} liked, count {} -> {}",
                    self.prompt_id, self.likes, response.likes
                );
                self.likes = response.likes;
                self.state = LikeState::Liked;
                true
            }
            Err(err) => {
                warn!("like for prompt {} failed: {err}", self.prompt_id);
                self.state = LikeState::Unliked;
                false
            }
        }
    }

    /// Click handler that sends the request inline.
    pub fn like<B: PromptBackend>(&mut self, backend: &B) -> bool {
        match self.begin() {
            Some(prompt_id) => {
                let result = backend.like_prompt(prompt_id);
                self.finish(result)
            }
            None => false,
        }
    }
}
