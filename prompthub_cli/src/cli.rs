use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use prompthub_client::form::FormMode;
use prompthub_client::models::{PlatformType, PromptId};
use prompthub_client::{
    ApiClient, Choice, FilterPatch, FormSession, LikeControl, ListController, PromptBackend,
    SortKey,
};

use crate::render;

/// Interactive browser over the prompt list: filters, paging, likes and the
/// create/edit forms, all against one [`ListController`].
pub fn run_shell(client: ApiClient, page_size: u32, timeout: Duration) -> Result<()> {
    let mut session = ShellSession {
        list: ListController::new(client, page_size),
        likes: HashMap::new(),
        seen_generation: 0,
        timeout,
    };

    println!("PromptHub shell ready. Type 'help' for a list of commands.");
    session.list.start();
    session.settle();
    session.print_list();

    let stdin = io::stdin();
    loop {
        print!("prompthub> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!("Exiting");
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let tokens = match shell_words::split(trimmed) {
            Ok(tokens) if !tokens.is_empty() => tokens,
            Ok(_) => continue,
            Err(err) => {
                println!("Unable to parse command: {err}");
                continue;
            }
        };

        match session.handle_command(&tokens) {
            Ok(LoopAction::Continue) => {}
            Ok(LoopAction::Exit) => break,
            Err(err) => println!("Error: {err:#}"),
        }
    }
    Ok(())
}

struct ShellSession {
    list: ListController<ApiClient>,
    /// Like buttons of the cards currently shown; rebuilt whenever a new
    /// result set replaces the list.
    likes: HashMap<PromptId, LikeControl>,
    seen_generation: u64,
    timeout: Duration,
}

enum LoopAction {
    Continue,
    Exit,
}

impl ShellSession {
    fn handle_command(&mut self, tokens: &[String]) -> Result<LoopAction> {
        let args = &tokens[1..];
        match tokens[0].as_str() {
            "help" => self.print_help(),
            "list" | "ls" => {
                self.list.poll();
                self.sync_likes();
                self.print_list();
            }
            "more" => {
                if self.list.load_more() {
                    self.settle();
                    self.print_list();
                } else if self.list.last_error().is_some() && !self.list.is_busy() {
                    println!("The last fetch failed; type 'refresh' to retry.");
                } else if !self.list.has_more() {
                    println!("Everything is already loaded.");
                } else {
                    println!("Still loading, try again in a moment.");
                }
            }
            "sort" => {
                let Some(raw) = args.first() else {
                    println!("Usage: sort <latest|views|likes>");
                    return Ok(LoopAction::Continue);
                };
                let sort: SortKey = raw.parse().map_err(anyhow::Error::msg)?;
                self.apply_filters(FilterPatch::default().sort(sort));
            }
            "type" => {
                let Some(raw) = args.first() else {
                    println!("Usage: type <all|text|image>");
                    return Ok(LoopAction::Continue);
                };
                let platform_type: Choice<PlatformType> =
                    raw.parse().map_err(anyhow::Error::msg)?;
                self.apply_filters(FilterPatch::default().platform_type(platform_type));
            }
            "platform" => {
                let Some(raw) = args.first() else {
                    println!("Usage: platform <name|all>");
                    return Ok(LoopAction::Continue);
                };
                self.apply_filters(FilterPatch::default().platform(raw.as_str()));
            }
            "category" => {
                let Some(raw) = args.first() else {
                    self.print_categories();
                    return Ok(LoopAction::Continue);
                };
                self.apply_filters(FilterPatch::default().category(raw.as_str()));
            }
            "search" => {
                self.apply_filters(FilterPatch::default().search(args.join(" ")));
            }
            "reset" => {
                self.list.reset();
                self.settle();
                self.print_list();
            }
            "refresh" => {
                self.list.refresh();
                self.settle();
                self.print_list();
            }
            "show" | "view" => {
                let id = parse_id(args, "show <id>")?;
                self.show(id)?;
            }
            "like" => {
                let id = parse_id(args, "like <id>")?;
                self.like(id);
            }
            "new" | "create" => self.run_form(FormSession::create())?,
            "edit" => {
                let id = parse_id(args, "edit <id>")?;
                let prompt = self
                    .list
                    .backend()
                    .get_prompt(id)
                    .with_context(|| format!("failed to load prompt {id}"))?;
                self.run_form(FormSession::edit(&prompt))?;
            }
            "delete" => {
                let id = parse_id(args, "delete <id>")?;
                if confirm(&format!("Delete prompt {id}?"))? {
                    self.list
                        .backend()
                        .delete_prompt(id)
                        .with_context(|| format!("failed to delete prompt {id}"))?;
                    println!("Deleted prompt {id}");
                    self.list.refresh();
                    self.settle();
                }
            }
            "meta" | "stats" => match self.list.meta() {
                Some(meta) => render::print_meta(meta),
                None => println!("Catalog not loaded yet."),
            },
            "quit" | "exit" => return Ok(LoopAction::Exit),
            other => {
                println!("Unknown command '{other}'. Type 'help' for a list of commands.");
            }
        }
        Ok(LoopAction::Continue)
    }

    fn print_help(&self) {
        println!("Available commands:");
        println!("  list                 Show the loaded prompts");
        println!("  more                 Load the next page");
        println!("  sort <key>           Order by latest, views or likes");
        println!("  type <t>             Filter by all, text or image");
        println!("  platform <name>      Filter by platform ('all' clears)");
        println!("  category [name]      Filter by category, or list the choices");
        println!("  search [words]       Search titles and descriptions");
        println!("  reset                Clear every filter");
        println!("  refresh              Reload the first page");
        println!("  show <id>            Display one prompt in full");
        println!("  like <id>            Like a prompt shown in the list");
        println!("  new                  Share a new prompt");
        println!("  edit <id>            Edit an existing prompt");
        println!("  delete <id>          Delete a prompt");
        println!("  meta                 Show platforms, categories and totals");
        println!("  exit                 Quit the shell");
    }

    fn apply_filters(&mut self, patch: FilterPatch) {
        self.list.set_filters(patch);
        self.settle();
        self.print_list();
    }

    /// Waits for outstanding fetches, then brings the like buttons in line
    /// with the visible cards.
    fn settle(&mut self) {
        if !self.list.wait(self.timeout) {
            println!("Still waiting for the server...");
        }
        if let Some(err) = self.list.last_error() {
            tracing::debug!(error = %err, "list fetch failed");
            println!("Could not load prompts; showing the last results.");
        }
        self.sync_likes();
    }

    fn sync_likes(&mut self) {
        let generation = self.list.state().generation();
        if generation != self.seen_generation {
            self.likes.clear();
            self.seen_generation = generation;
        }
        for prompt in self.list.items() {
            self.likes
                .entry(prompt.id)
                .or_insert_with(|| LikeControl::for_prompt(prompt));
        }
    }

    fn print_list(&self) {
        render::print_list(self.list.state(), &self.likes);
    }

    fn print_categories(&self) {
        let platform_type = self.list.filters().platform_type.clone();
        let categories = match self.list.meta() {
            Some(meta) => meta.categories_for(platform_type),
            None => prompthub_client::Meta::fallback().categories_for(platform_type),
        };
        println!("Categories: {}", categories.join(", "));
    }

    fn show(&mut self, id: PromptId) -> Result<()> {
        let prompt = self
            .list
            .backend()
            .get_prompt(id)
            .with_context(|| format!("failed to load prompt {id}"))?;
        let like = self
            .likes
            .get(&id)
            .cloned()
            .unwrap_or_else(|| LikeControl::for_prompt(&prompt));
        render::print_detail(&prompt, &like);
        Ok(())
    }

    fn like(&mut self, id: PromptId) {
        let backend = self.list.backend().clone();
        let Some(control) = self.likes.get_mut(&id) else {
            println!("Prompt {id} is not in the current list.");
            return;
        };
        if control.is_liked() {
            println!("Already liked ({} likes).", control.likes());
            return;
        }
        if control.like(&backend) {
            println!("♥ {}", control.likes());
        }
    }

    fn run_form(&mut self, mut session: FormSession) -> Result<()> {
        loop {
            fill_form(&mut session)?;
            match session.submit(self.list.backend()) {
                Ok(prompt) => {
                    println!("Saved prompt #{}: {}", prompt.id, prompt.title);
                    self.list.refresh();
                    self.settle();
                    return Ok(());
                }
                Err(_) => {
                    if let Some(message) = session.error() {
                        println!("{message}");
                    }
                    if !confirm("Edit the form again?")? {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Walks the draft field by field. Blank answers keep the current value.
fn fill_form(session: &mut FormSession) -> Result<()> {
    let heading = match session.mode() {
        FormMode::Create => "New prompt".to_string(),
        FormMode::Edit(id) => format!("Editing prompt #{id}"),
    };
    println!("{heading} (leave blank to keep the value in brackets)");

    let draft = &mut session.draft;
    if let Some(title) = ask("Title", &draft.title)? {
        draft.title = title;
    }
    if let Some(description) = ask("Description", &draft.description)? {
        draft.description = description;
    }
    if let Some(content) = ask("Content", &draft.content)? {
        draft.content = content;
    }
    if let Some(platform) = ask("Platform", &draft.platform)? {
        draft.platform = platform;
    }
    if let Some(raw) = ask("Type (text/image)", draft.platform_type().as_str())? {
        match raw.parse::<PlatformType>() {
            Ok(platform_type) => draft.set_platform_type(platform_type),
            Err(err) => println!("{err}; keeping {}", draft.platform_type()),
        }
    }
    loop {
        println!("Categories: {}", draft.categories().join(", "));
        let current = draft.category().to_string();
        match ask("Category", &current)? {
            Some(category) => match draft.set_category(&category) {
                Ok(()) => break,
                Err(err) => println!("{err}"),
            },
            None => break,
        }
    }

    println!("Tags: enter one per line, '-tag' removes, blank line finishes.");
    loop {
        println!("  current: {}", draft.tags.tags().join(", "));
        let Some(raw) = read_line("  tag> ")? else { break };
        if raw.is_empty() {
            break;
        }
        if let Some(tag) = raw.strip_prefix('-') {
            if !draft.tags.remove_tag(tag) {
                println!("  no tag '{tag}'");
            }
            continue;
        }
        draft.tags.input = raw;
        if let Err(rejection) = draft.tags.commit_input() {
            println!("  {rejection}");
            draft.tags.input.clear();
        }
    }
    Ok(())
}

fn parse_id(args: &[String], usage: &str) -> Result<PromptId> {
    let Some(raw) = args.first() else {
        bail!("usage: {usage}");
    };
    raw.trim_start_matches('#')
        .parse()
        .with_context(|| format!("'{raw}' is not a prompt id"))
}

fn ask(label: &str, current: &str) -> Result<Option<String>> {
    let answer = read_line(&format!("{label} [{current}]: "))?;
    Ok(answer.filter(|value| !value.is_empty()))
}

fn confirm(question: &str) -> Result<bool> {
    let answer = read_line(&format!("{question} [y/N] "))?;
    Ok(matches!(answer.as_deref(), Some("y" | "Y" | "yes")))
}

/// Returns `None` at end of input.
fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
