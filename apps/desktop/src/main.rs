use std::{sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use client_core::{
    Dashboard, Nav, NoticeEvent, Notifier, ProfileService, UserForm, CURRENT_VIEW_KEY,
};
use serde_json::json;
use shared::domain::{ProfileField, Screen, SectionId};
use storage::{DocumentStore, MemoryStore, Storage, UserStore};
use tracing::warn;

mod config;

#[derive(Parser, Debug)]
struct Args {
    /// Override the configured database URL.
    #[arg(long)]
    database_url: Option<String>,
    /// Add a user to the dashboard before listing.
    #[arg(long)]
    add_user: Option<String>,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    contact: String,
    /// Stage a first-name edit on the profile and commit it.
    #[arg(long)]
    set_first_name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(url) = args.database_url {
        settings.database_url = url;
    }
    let database_url = config::prepare_database_url(&settings.database_url)?;

    let (documents, users): (Arc<dyn DocumentStore>, Arc<dyn UserStore>) =
        match Storage::new(&database_url).await {
            Ok(storage) => (Arc::new(storage.clone()), Arc::new(storage)),
            Err(err) => {
                warn!("falling back to in-memory storage: {err:#}");
                let memory = Arc::new(MemoryStore::new());
                (Arc::clone(&memory) as _, memory as _)
            }
        };

    let notifier = Notifier::new();
    let mut notices = notifier.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = notices.recv().await {
            if let NoticeEvent::Posted(notice) = event {
                println!("* {}", notice.text);
            }
        }
    });

    let initial_screen = match documents.load_document(CURRENT_VIEW_KEY).await {
        Ok(Some(value)) => value
            .as_str()
            .and_then(Screen::parse)
            .unwrap_or(Screen::Dashboard),
        _ => Screen::Dashboard,
    };
    let mut nav = Nav::new(initial_screen);

    let dashboard = Dashboard::new(Arc::clone(&users), notifier.clone());
    if let Some(name) = args.add_user {
        dashboard
            .set_form(UserForm {
                name,
                email: args.email,
                contact: args.contact,
            })
            .await;
        if let Err(err) = dashboard.submit().await {
            warn!("add user rejected: {err}");
        }
    }

    println!("Users");
    for (index, user) in dashboard.refresh().await.unwrap_or_default().iter().enumerate() {
        println!("{:>3}  {}  <{}>  {}", index + 1, user.name, user.email, user.contact);
    }

    if nav.current() == Screen::Dashboard {
        nav.toggle();
    }
    let _ = documents
        .save_document(CURRENT_VIEW_KEY, &json!(nav.current().as_str()))
        .await;

    let profile = ProfileService::load(Arc::clone(&documents), notifier.clone()).await;
    if let Some(first_name) = args.set_first_name {
        profile.enter_edit(SectionId::BasicInfo).await?;
        profile
            .set_field(ProfileField::FirstName, first_name)
            .await?;
        profile.commit(SectionId::BasicInfo).await?;
    }

    let header = profile.header().await;
    println!("Profile: {} <{}> {}", header.name, header.email, header.phone);

    // Give fire-and-forget writes and notices a moment before exiting.
    tokio::time::sleep(Duration::from_millis(200)).await;
    Ok(())
}
