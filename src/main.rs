use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oia_console::api::{self, ApiClient, LoginCredentials};
use oia_console::forms::{FormSession, SubmitOutcome};
use oia_console::mutation::{GalleryUpload, ImageSource, ResourceWriter};
use oia_console::notify::ConsoleNotifier;
use oia_console::query::{DebouncedSearch, QueryCache};
use oia_console::resources::{ListPage, ResourceKind, SearchHit};
use oia_console::{Config, SessionStore};

#[derive(Parser)]
#[command(name = "oia")]
#[command(author, version, about = "Admin console for the international affairs office site", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the backend base URL from the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override the session/token directory (default: platform config dir)
    #[arg(long, global = true)]
    session_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the admin backend
    Login {
        /// Admin account email
        email: String,
    },

    /// Forget the stored session token
    Logout,

    /// List records of one resource
    List {
        /// Resource (programs, news, partnerships, events, team, faqs, gallery, contacts)
        resource: ResourceKind,

        /// Substring filter applied client-side to the rendered rows
        #[arg(short, long)]
        filter: Option<String>,

        /// Page of the client-side listing (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Rows per page
        #[arg(long, default_value = "20")]
        page_size: usize,
    },

    /// Show one record as JSON
    Get {
        resource: ResourceKind,
        id: String,
    },

    /// Create a record from --set key=value fields
    Create {
        resource: ResourceKind,

        /// Field assignment, repeatable (e.g. --set title="Exchange MIT")
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Update a record from --set key=value fields
    Update {
        resource: ResourceKind,
        id: String,

        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Delete a record
    Delete {
        resource: ResourceKind,
        id: String,
    },

    /// Search across all resources
    Search {
        query: String,
    },

    /// Upload a gallery image from a local file or a remote URL (not both)
    Upload {
        #[arg(long)]
        title: String,

        #[arg(long)]
        category: Option<String>,

        #[arg(long, default_value = "0")]
        order: i32,

        #[arg(long)]
        featured: bool,

        #[arg(long)]
        active: bool,

        /// Local image file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Remote image URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Send a message through the public contact form
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        message: String,
    },

    /// Per-resource record counts for the admin dashboard
    Overview,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "oia_console=debug,oia=debug"
    } else {
        "oia_console=info,oia=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;
    let base_url = cli
        .base_url
        .unwrap_or_else(|| config.api.base_url.clone());
    let session_dir = match cli.session_dir {
        Some(dir) => dir,
        None => SessionStore::default_dir()?,
    };

    let session = Arc::new(SessionStore::open(session_dir)?);
    let client = Arc::new(
        ApiClient::new(base_url, session.clone()).with_notifier(Arc::new(ConsoleNotifier)),
    );
    let cache = Arc::new(QueryCache::new(client.clone(), config.cache.staleness_secs));
    let writer = ResourceWriter::new(client.clone(), cache.clone());

    match cli.command {
        Commands::Login { email } => {
            let password = rpassword::prompt_password("Password: ")?;
            api::login(&client, &LoginCredentials { email, password }).await?;
            println!("{}", "Logged in".green());
        }
        Commands::Logout => {
            api::logout(&client);
            cache.invalidate_all();
            println!("Logged out");
        }
        Commands::List {
            resource,
            filter,
            page,
            page_size,
        } => {
            let listing: ListPage<Value> = cache.list(resource, &[]).await?;
            render_listing(resource, listing.items(), filter.as_deref(), page, page_size);
        }
        Commands::Get { resource, id } => {
            let record: Value = cache.detail(resource, &id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Create { resource, set } => {
            let mut form = FormSession::create(resource);
            for assignment in &set {
                let (key, value) = parse_assignment(assignment)?;
                form.set_field(&key, value);
            }
            let outcome = form.submit(&writer).await;
            finish_submission(outcome, &form)?;
        }
        Commands::Update { resource, id, set } => {
            let current: Value = cache.detail(resource, &id).await?;
            let mut form = FormSession::edit(resource, id, current);
            for assignment in &set {
                let (key, value) = parse_assignment(assignment)?;
                form.set_field(&key, value);
            }
            let outcome = form.submit(&writer).await;
            finish_submission(outcome, &form)?;
        }
        Commands::Delete { resource, id } => {
            writer.delete(resource, &id).await?;
        }
        Commands::Search { query } => {
            let search = DebouncedSearch::new(
                cache.clone(),
                config.search.debounce_ms,
                config.search.min_query_len,
            );
            match search.submit::<ListPage<SearchHit>>(&query).await? {
                Some(results) => render_search(results.items()),
                None => println!(
                    "Type at least {} characters to search",
                    config.search.min_query_len
                ),
            }
        }
        Commands::Upload {
            title,
            category,
            order,
            featured,
            active,
            file,
            url,
        } => {
            let image = ImageSource::from_options(file, url)?;
            let item = writer
                .upload_gallery(GalleryUpload {
                    title,
                    category,
                    order,
                    featured,
                    active,
                    image,
                })
                .await?;
            println!("Uploaded gallery item {}", item.id);
        }
        Commands::Contact {
            name,
            email,
            subject,
            message,
        } => {
            let mut form = FormSession::create(ResourceKind::Contacts);
            form.set_field("name", Value::String(name));
            form.set_field("email", Value::String(email));
            if let Some(subject) = subject {
                form.set_field("subject", Value::String(subject));
            }
            form.set_field("message", Value::String(message));
            let outcome = form.submit(&writer).await;
            finish_submission(outcome, &form)?;
        }
        Commands::Overview => {
            // Errors surface; a dashboard of silent zeros helps no one
            let mut builder = tabled::builder::Builder::default();
            builder.push_record(["Resource", "Records"]);
            for kind in ResourceKind::ALL {
                let listing: ListPage<Value> = cache.list(kind, &[]).await?;
                builder.push_record([kind.to_string(), listing.len().to_string()]);
            }
            print_table(builder);
        }
    }

    Ok(())
}

/// Parse one `key=value` assignment; bare `true`/`false` and integers become
/// typed JSON values, everything else stays a string.
fn parse_assignment(assignment: &str) -> Result<(String, Value)> {
    let (key, raw) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {}", assignment))?;
    let value = match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match raw.parse::<i64>() {
            Ok(n) => Value::Number(n.into()),
            Err(_) => Value::String(raw.to_string()),
        },
    };
    Ok((key.to_string(), value))
}

fn finish_submission(outcome: SubmitOutcome, form: &FormSession) -> Result<()> {
    match outcome {
        SubmitOutcome::Saved(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        SubmitOutcome::Invalid => {
            for error in form.errors() {
                eprintln!("  {} {}: {}", "✗".red(), error.field.bold(), error.message);
            }
            Err(anyhow!("validation failed, nothing was submitted"))
        }
        SubmitOutcome::Failed(error) => {
            for field_error in error.field_errors() {
                eprintln!(
                    "  {} {}: {}",
                    "✗".red(),
                    field_error.field.bold(),
                    field_error.message
                );
            }
            Err(error.into())
        }
    }
}

fn render_listing(
    kind: ResourceKind,
    items: &[Value],
    filter: Option<&str>,
    page: usize,
    page_size: usize,
) {
    let rows: Vec<(String, String, String)> = items
        .iter()
        .map(|item| (record_id(item), record_title(item), record_status(item)))
        .filter(|(id, title, _)| match filter {
            Some(needle) => {
                let needle = needle.to_lowercase();
                id.to_lowercase().contains(&needle) || title.to_lowercase().contains(&needle)
            }
            None => true,
        })
        .collect();

    let total = rows.len();
    let start = page.saturating_sub(1) * page_size;
    let page_rows = rows.into_iter().skip(start).take(page_size);

    let mut builder = tabled::builder::Builder::default();
    builder.push_record(["ID", "Title", "Status"]);
    for (id, title, status) in page_rows {
        builder.push_record([id, title, status]);
    }
    print_table(builder);
    println!(
        "{} {} record(s), page {} ({} per page)",
        total, kind, page, page_size
    );
}

fn render_search(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No results");
        return;
    }
    let mut builder = tabled::builder::Builder::default();
    builder.push_record(["Type", "ID", "Title"]);
    for hit in hits {
        builder.push_record([hit.kind.clone(), hit.id.clone(), hit.title.clone()]);
    }
    print_table(builder);
}

fn print_table(builder: tabled::builder::Builder) {
    let mut table = builder.build();
    table.with(tabled::settings::Style::rounded());
    println!("{}", table);
}

fn record_id(item: &Value) -> String {
    item.get("id")
        .map(value_to_cell)
        .unwrap_or_else(|| "-".to_string())
}

/// Best display title across the resource shapes
fn record_title(item: &Value) -> String {
    for key in ["title", "name", "question", "university", "subject"] {
        if let Some(value) = item.get(key) {
            let text = value_to_cell(value);
            if !text.is_empty() {
                return text;
            }
        }
    }
    "-".to_string()
}

fn record_status(item: &Value) -> String {
    let mut flags = Vec::new();
    for key in ["active", "published", "featured", "read"] {
        if item.get(key).and_then(Value::as_bool).unwrap_or(false) {
            flags.push(key);
        }
    }
    flags.join(", ")
}

/// Cells never leak raw JSON structure; anything non-scalar renders as a
/// placeholder.
fn value_to_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => "[Error]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_assignment_types() {
        assert_eq!(
            parse_assignment("title=Exchange MIT").unwrap(),
            ("title".to_string(), json!("Exchange MIT"))
        );
        assert_eq!(
            parse_assignment("featured=true").unwrap(),
            ("featured".to_string(), json!(true))
        );
        assert_eq!(
            parse_assignment("order=3").unwrap(),
            ("order".to_string(), json!(3))
        );
        assert!(parse_assignment("no-equals").is_err());
    }

    #[test]
    fn test_record_title_falls_back_across_keys() {
        assert_eq!(record_title(&json!({"title": "T"})), "T");
        assert_eq!(record_title(&json!({"name": "N"})), "N");
        assert_eq!(record_title(&json!({"x": 1})), "-");
    }

    #[test]
    fn test_cells_never_leak_structure() {
        assert_eq!(value_to_cell(&json!({"detail": "boom"})), "[Error]");
        assert_eq!(value_to_cell(&json!(["a"])), "[Error]");
        assert_eq!(value_to_cell(&json!("ok")), "ok");
    }
}
