use log::warn;

use crate::api::{ApiError, PromptBackend};
use crate::models::{Meta, PromptPage};

use super::state::FetchTicket;
use super::ListController;

pub enum ListMessage {
    PageLoaded {
        ticket: FetchTicket,
        result: Result<PromptPage, ApiError>,
    },
    MetaLoaded(Result<Meta, ApiError>),
}

pub(super) fn process_message<B: PromptBackend>(
    controller: &mut ListController<B>,
    message: ListMessage,
) {
    match message {
        ListMessage::PageLoaded { ticket, result } => {
            controller.state.apply(&ticket, result);
        }
        ListMessage::MetaLoaded(result) => {
            controller.meta_loading = false;
            controller.meta = Some(result.unwrap_or_else(|err| {
                warn!("failed to load catalog, using built-in vocabularies: {err}");
                Meta::fallback()
            }));
        }
    }
}
