pub mod api;
pub mod catalog;
pub mod config;
pub mod filters;
pub mod form;
pub mod like;
pub mod list;
pub mod models;
pub mod query;
pub mod tags;

pub use api::{ApiClient, ApiError, PromptBackend};
pub use config::ClientConfig;
pub use filters::{Choice, FilterPatch, FilterState};
pub use form::{DraftForm, FormError, FormSession, RequiredField};
pub use like::{LikeControl, LikeState};
pub use list::{ListController, ListState};
pub use models::{LikeResponse, Meta, PlatformType, Prompt, PromptId, PromptInput, PromptPage, SortKey};
pub use query::{ListRequest, PageCursor};
pub use tags::{TagEditor, TagRejection};
