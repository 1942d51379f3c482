use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use forum_feed::api::{ApiClient, HttpPostRepository, HttpTagCatalog};
use forum_feed::auth::{CredentialStore, Identity, TokenFileStore};
use forum_feed::config::{Cli, Command, Config};
use forum_feed::feed::{
    ConfirmDialog, DeleteOutcome, FeedServices, ForumSession, Navigator, Route,
};
use forum_feed::render::{render_feed, render_tags};
use forum_feed::terminal::{AutoConfirm, TerminalConfirm, TerminalNavigator, TerminalNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is reserved for the rendered page
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let config = Config::load(&cli)?;
    let client = ApiClient::new(&config.api)?;
    let credentials = Arc::new(TokenFileStore::from_env_or_file(config.token_path()));
    tracing::debug!(
        "API at {}, token file {}",
        client.base_url(),
        credentials.path().display()
    );

    match cli.command {
        Command::Open { id } => TerminalNavigator.navigate(&Route::Post(id)),
        Command::Add => TerminalNavigator.navigate(&Route::AddPost),
        Command::Whoami => whoami(&client, credentials.as_ref()).await,
        command => run_page(command, client, credentials).await?,
    }

    Ok(())
}

async fn whoami(client: &ApiClient, credentials: &dyn CredentialStore) {
    let credential = credentials.credential();
    let identity = Identity::resolve(credential.as_ref());
    if identity.is_anonymous() {
        println!("Not signed in");
        return;
    }

    println!("User id: {}", identity.user_id());
    match client
        .fetch_profile(identity.user_id(), credential.as_ref())
        .await
    {
        Ok(profile) => {
            println!("Name:    {}", profile.name);
            println!("Email:   {}", profile.email);
        }
        Err(e) => tracing::warn!("Could not load profile: {}", e),
    }
}

async fn run_page(
    command: Command,
    client: ApiClient,
    credentials: Arc<TokenFileStore>,
) -> anyhow::Result<()> {
    let services = FeedServices {
        posts: Arc::new(HttpPostRepository::new(client.clone())),
        tags: Arc::new(HttpTagCatalog::new(client)),
        credentials,
    };
    let mut session = ForumSession::new(services, Arc::new(TerminalNotifier));

    // Ctrl-C closes the page; anything still in flight is dropped
    let lifetime = session.lifetime();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, closing page");
            lifetime.cancel();
        }
    });

    session.activate();

    match command {
        Command::List { search, tag } => {
            let page = session.page_mut();
            page.set_search(search);
            page.select_tag(tag.as_deref());

            session.settle().await;
            if session.page().is_torn_down() {
                bail!("Interrupted before the feed loaded");
            }
            print!("{}", render_tags(session.page())?);
            println!();
            print!("{}", render_feed(session.page())?);
        }
        Command::Tags => {
            session.settle().await;
            print!("{}", render_tags(session.page())?);
        }
        Command::Delete { id, yes } => {
            if !session.wait_until_loaded().await {
                bail!("Interrupted before the feed loaded");
            }
            let dialog: Box<dyn ConfirmDialog> = if yes {
                Box::new(AutoConfirm)
            } else {
                Box::new(TerminalConfirm)
            };
            match session.delete_with_confirmation(&id, dialog.as_ref()).await? {
                DeleteOutcome::Deleted => {}
                DeleteOutcome::Cancelled => println!("Cancelled"),
                DeleteOutcome::Failed(_) => bail!("Post {} was not deleted", id),
            }
        }
        Command::Open { .. } | Command::Add | Command::Whoami => {}
    }

    Ok(())
}
