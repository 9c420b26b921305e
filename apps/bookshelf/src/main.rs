use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use catalog_client::{
    config::load_settings, Catalog, CatalogEvent, CatalogSnapshot, HttpBookService, SaveOutcome,
};
use clap::{Parser, Subcommand, ValueEnum};
use shared::domain::{BookId, SortMode};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::RecvError},
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bookshelf", about = "Browse and edit the remote book catalog")]
struct Args {
    /// Base address of the catalog service; overrides bookshelf.toml.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and print the catalog.
    List {
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Create a new book from a name and a JPG/PNG cover.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        image: PathBuf,
    },
    /// Rename a book and/or replace its cover.
    Edit {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Delete one or more books by id.
    Delete {
        #[arg(long = "id", required = true, num_args = 1..)]
        ids: Vec<i64>,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortMode {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Asc => SortMode::Ascending,
            SortArg::Desc => SortMode::Descending,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    let service = HttpBookService::new(&settings).context("failed to configure catalog service")?;
    debug!("catalog service at {}", service.resource_url());
    let catalog = Catalog::new(Arc::new(service));

    let notices = tokio::spawn(follow_events(catalog.subscribe(), |message| {
        println!("{message}")
    }));

    let result = run(&catalog, args.command).await;
    drop(catalog);
    let _ = notices.await;
    result
}

async fn follow_events(
    mut events: broadcast::Receiver<CatalogEvent>,
    mut on_notice: impl FnMut(String),
) {
    loop {
        match events.recv().await {
            Ok(CatalogEvent::Notice(message)) => on_notice(message),
            Ok(CatalogEvent::Changed(changes)) => debug!(?changes, "catalog changed"),
            Ok(CatalogEvent::Error(_)) => {}
            Err(RecvError::Lagged(skipped)) => warn!("missed {skipped} catalog events"),
            Err(RecvError::Closed) => break,
        }
    }
}

async fn run(catalog: &Catalog, command: Command) -> Result<()> {
    catalog.request_list().await?;

    match command {
        Command::List { sort } => {
            if let Some(sort) = sort {
                catalog.set_sort(Some(sort.into())).await;
            }
            print_books(&catalog.snapshot().await);
        }
        Command::Add { name, image } => {
            catalog.open_new_edit().await;
            catalog.set_edit_name(name).await?;
            catalog.choose_image(image).await?;
            if let SaveOutcome::Created(id) = catalog.save().await? {
                println!("created book {id}");
            }
        }
        Command::Edit {
            id,
            name,
            image,
            sort,
        } => {
            if let Some(sort) = sort {
                catalog.set_sort(Some(sort.into())).await;
            }
            select_only(catalog, &[BookId(id)]).await?;
            catalog.open_edit_existing().await?;
            if let Some(name) = name {
                catalog.set_edit_name(name).await?;
            }
            if let Some(image) = image {
                catalog.choose_image(image).await?;
            }
            match catalog.save().await? {
                SaveOutcome::Unchanged => println!("nothing to change"),
                _ => print_books(&catalog.snapshot().await),
            }
        }
        Command::Delete { ids, yes } => {
            let ids: Vec<BookId> = ids.into_iter().map(BookId).collect();
            select_only(catalog, &ids).await?;
            let preview = catalog.delete_preview().await?;
            println!("Next books will be deleted ({}):\n", preview.count);
            for name in &preview.names {
                println!("\"{name}\"");
            }
            if preview.truncated {
                println!("...");
            }
            if !yes && !confirm().await? {
                println!("cancelled");
                return Ok(());
            }
            let removed = catalog.delete_selected().await?;
            println!("deleted {removed} books");
        }
    }

    Ok(())
}

async fn select_only(catalog: &Catalog, ids: &[BookId]) -> Result<()> {
    let snapshot = catalog.snapshot().await;
    for id in ids {
        if !snapshot.books.iter().any(|book| book.id == *id) {
            bail!("book {id} is not in the catalog");
        }
    }
    catalog.unselect_all().await;
    for id in ids {
        catalog.toggle_select(*id, true).await;
    }
    Ok(())
}

async fn confirm() -> Result<bool> {
    println!("\nContinue? [y/N]");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read confirmation")?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn print_books(snapshot: &CatalogSnapshot) {
    if !snapshot.connected {
        println!("(not connected)");
        return;
    }
    if let Some(mode) = snapshot.sort_mode {
        println!("sorted: {mode:?}");
    }
    for book in &snapshot.books {
        println!(
            "{:>6}  {:<40}  {}",
            book.id.0,
            book.name,
            book.display_image_name().unwrap_or_default()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notices_after_a_lag_are_still_printed() {
        let (tx, rx) = broadcast::channel(1);
        for n in 1..=3 {
            tx.send(CatalogEvent::Notice(format!("notice {n}")))
                .expect("receiver alive");
        }
        drop(tx);

        let mut seen = Vec::new();
        follow_events(rx, |message| seen.push(message)).await;

        assert_eq!(seen, ["notice 3"]);
    }
}
