use std::sync::mpsc::Sender;
use std::thread;

use log::debug;

use crate::api::PromptBackend;

use super::messages::ListMessage;
use super::state::FetchTicket;

pub fn fetch_page<B: PromptBackend>(backend: B, tx: Sender<ListMessage>, ticket: FetchTicket) {
    thread::spawn(move || {
        let result = backend.list_prompts(&ticket.request);
        if tx.send(ListMessage::PageLoaded { ticket, result }).is_err() {
            debug!("list view closed before page arrived");
        }
    });
}

pub fn load_meta<B: PromptBackend>(backend: B, tx: Sender<ListMessage>) {
    thread::spawn(move || {
        let result = backend.get_meta();
        if tx.send(ListMessage::MetaLoaded(result)).is_err() {
            debug!("list view closed before catalog arrived");
        }
    });
}
