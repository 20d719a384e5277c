use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use prompthub_client::models::{PlatformType, PromptId};
use prompthub_client::{
    ApiClient, Choice, ClientConfig, FilterPatch, FormSession, LikeControl, ListController,
    PromptBackend, SortKey,
};

mod cli;
mod render;
mod telemetry;

#[derive(Parser)]
#[command(author, version, about = "Browse and share AI prompts from the terminal")]
struct Args {
    /// Base URL of the prompt API (overrides PROMPTHUB_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Prompts per page (overrides PROMPTHUB_PAGE_SIZE)
    #[arg(long, global = true)]
    page_size: Option<u32>,
    /// Show debug logs from the client
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List prompts matching the given filters
    List {
        #[arg(long, default_value = "latest")]
        sort: SortKey,
        /// text, image or all
        #[arg(long = "type", default_value = "all")]
        platform_type: Choice<PlatformType>,
        #[arg(long)]
        platform: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show one prompt in full
    Show { id: PromptId },
    /// Share a new prompt
    Create(FormArgs),
    /// Replace the fields of an existing prompt
    Edit {
        id: PromptId,
        #[command(flatten)]
        fields: FormArgs,
    },
    /// Like a prompt and print its new like count
    Like { id: PromptId },
    /// Delete a prompt
    Delete { id: PromptId },
    /// Print platforms, categories and the prompt total
    Meta,
    /// Start the interactive shell (default)
    Shell,
}

#[derive(ClapArgs)]
struct FormArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    content: Option<String>,
    #[arg(long)]
    platform: Option<String>,
    /// text or image
    #[arg(long = "type")]
    platform_type: Option<PlatformType>,
    #[arg(long)]
    category: Option<String>,
    /// May be repeated; a leading '#' is dropped
    #[arg(long = "tag")]
    tags: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_tracing(args.verbose);

    let mut config = ClientConfig::from_env();
    if let Some(api_url) = args.api_url {
        config = config.with_api_url(api_url);
    }
    if let Some(page_size) = args.page_size {
        config = config.with_page_size(page_size);
    }
    let client = config
        .build_client()
        .with_context(|| format!("invalid API url '{}'", config.api_url))?;
    tracing::debug!(api_url = %client.base_url(), page_size = config.page_size, "client ready");

    match args.command.unwrap_or(Command::Shell) {
        Command::List {
            sort,
            platform_type,
            platform,
            category,
            search,
            pages,
        } => {
            let mut patch = FilterPatch::default().sort(sort).platform_type(platform_type);
            if let Some(platform) = platform {
                patch = patch.platform(platform.as_str());
            }
            if let Some(category) = category {
                patch = patch.category(category.as_str());
            }
            if let Some(search) = search {
                patch = patch.search(search);
            }
            list(client, &config, patch, pages)
        }
        Command::Show { id } => {
            let prompt = client
                .get_prompt(id)
                .with_context(|| format!("failed to load prompt {id}"))?;
            render::print_detail(&prompt, &LikeControl::for_prompt(&prompt));
            Ok(())
        }
        Command::Create(fields) => submit(&client, FormSession::create(), fields),
        Command::Edit { id, fields } => {
            let prompt = client
                .get_prompt(id)
                .with_context(|| format!("failed to load prompt {id}"))?;
            submit(&client, FormSession::edit(&prompt), fields)
        }
        Command::Like { id } => {
            let mut control = LikeControl::new(id, 0);
            if !control.like(&client) {
                bail!("failed to like prompt {id}");
            }
            println!("♥ {}", control.likes());
            Ok(())
        }
        Command::Delete { id } => {
            client
                .delete_prompt(id)
                .with_context(|| format!("failed to delete prompt {id}"))?;
            println!("Deleted prompt {id}");
            Ok(())
        }
        Command::Meta => {
            let meta = client.get_meta().context("failed to load catalog")?;
            render::print_meta(&meta);
            Ok(())
        }
        Command::Shell => cli::run_shell(client, config.page_size, fetch_timeout(&config)),
    }
}

fn fetch_timeout(config: &ClientConfig) -> Duration {
    config.timeout + Duration::from_secs(5)
}

fn list(client: ApiClient, config: &ClientConfig, patch: FilterPatch, pages: u32) -> Result<()> {
    let timeout = fetch_timeout(config);
    let mut controller = ListController::new(client, config.page_size);
    controller.set_filters(patch);
    if !controller.wait(timeout) {
        bail!("timed out waiting for the prompt list");
    }
    for _ in 1..pages {
        if !controller.load_more() {
            break;
        }
        if !controller.wait(timeout) {
            bail!("timed out waiting for the next page");
        }
    }
    if let Some(err) = controller.last_error() {
        bail!("failed to load prompts: {err}");
    }
    let likes: HashMap<_, _> = controller
        .items()
        .iter()
        .map(|prompt| (prompt.id, LikeControl::for_prompt(prompt)))
        .collect();
    render::print_list(controller.state(), &likes);
    Ok(())
}

fn submit(client: &ApiClient, mut session: FormSession, fields: FormArgs) -> Result<()> {
    let draft = &mut session.draft;
    if let Some(title) = fields.title {
        draft.title = title;
    }
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(content) = fields.content {
        draft.content = content;
    }
    if let Some(platform) = fields.platform {
        draft.platform = platform;
    }
    if let Some(platform_type) = fields.platform_type {
        draft.set_platform_type(platform_type);
    }
    if let Some(category) = fields.category {
        draft.set_category(&category)?;
    }
    for tag in &fields.tags {
        draft
            .tags
            .add_tag(tag)
            .with_context(|| format!("cannot add tag '{tag}'"))?;
    }

    let prompt = session.submit(client)?;
    println!("Saved prompt #{}: {}", prompt.id, prompt.title);
    Ok(())
}
