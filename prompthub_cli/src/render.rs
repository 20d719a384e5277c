use std::collections::HashMap;

use prompthub_client::models::{Meta, Prompt, PromptId};
use prompthub_client::{FilterState, LikeControl, LikeState, ListState};

const PREVIEW_CHARS: usize = 80;

pub fn print_card(prompt: &Prompt, like: Option<&LikeControl>) {
    let likes = like.map_or(prompt.likes, LikeControl::likes);
    let heart = match like.map(LikeControl::state) {
        Some(LikeState::Liked) => "♥",
        Some(LikeState::Pending) => "…",
        _ => "♡",
    };
    println!(
        "#{:<5} {}  [{} · {} · {}]",
        prompt.id, prompt.title, prompt.platform, prompt.platform_type, prompt.category
    );
    if !prompt.description.is_empty() {
        println!("       {}", preview(&prompt.description));
    }
    println!(
        "       {heart} {likes}  👁 {}  {}  {}",
        prompt.views,
        prompt.created_at_display(),
        format_tags(&prompt.tags)
    );
}

pub fn print_detail(prompt: &Prompt, like: &LikeControl) {
    println!("{}", prompt.title);
    println!(
        "{} · {} · {} · by {}",
        prompt.platform, prompt.platform_type, prompt.category, prompt.author
    );
    println!("created {}", prompt.created_at_display());
    if !prompt.description.is_empty() {
        println!();
        println!("{}", prompt.description);
    }
    println!();
    println!("{}", prompt.content);
    println!();
    if !prompt.tags.is_empty() {
        println!("{}", format_tags(&prompt.tags));
    }
    if prompt.has_thumbnail() {
        println!("(has thumbnail)");
    }
    let heart = if like.is_liked() { "♥" } else { "♡" };
    println!("{heart} {}  👁 {}", like.likes(), prompt.views);
}

pub fn print_list(state: &ListState, likes: &HashMap<PromptId, LikeControl>) {
    println!("{}", describe_filters(state.filters()));
    if state.items().is_empty() {
        if state.is_loading() {
            println!("Loading...");
        } else {
            println!("No prompts match these filters.");
        }
        return;
    }
    for prompt in state.items() {
        print_card(prompt, likes.get(&prompt.id));
    }
    println!(
        "Showing {} of {} prompts{}",
        state.items().len(),
        state.total(),
        if state.has_more() {
            " (type 'more' for the next page)"
        } else {
            ""
        }
    );
}

pub fn print_meta(meta: &Meta) {
    println!("{} prompts shared", meta.total_prompts);
    println!("Platforms: {}", meta.platforms.join(", "));
    println!("Text categories: {}", meta.text_categories.join(", "));
    println!("Image categories: {}", meta.image_categories.join(", "));
}

pub fn describe_filters(filters: &FilterState) -> String {
    let mut out = format!(
        "sort={} type={} platform={} category={}",
        filters.sort, filters.platform_type, filters.platform, filters.category
    );
    if !filters.search.is_empty() {
        out.push_str(&format!(" search=\"{}\"", filters.search));
    }
    out
}

fn format_tags(tags: &[String]) -> String {
    tags.iter().map(|tag| format!("#{tag}")).collect::<Vec<_>>().join(" ")
}

fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > PREVIEW_CHARS {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}
