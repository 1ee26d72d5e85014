use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use expense_client::{
    new_bill::receipt_extension, BillsController, BillsPage, HttpStore, MemorySessionStore,
    NewBillController, NewBillForm, ReceiptFile, SessionIdentity, SessionUser, Store,
};
use expense_shared::routes::Route;
use tracing::info;

mod config;
mod console;

use config::load_settings;
use console::{render_page, ConsoleFeedback};

#[derive(Parser, Debug)]
#[command(about = "List and submit employee expense reports")]
struct Args {
    /// Overrides the configured Store API url.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Overrides the configured user email.
    #[arg(long, global = true)]
    email: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show my bills, most recent first.
    List,
    /// Upload a receipt and submit a new bill.
    New {
        #[arg(long)]
        file: PathBuf,
        #[arg(long = "type")]
        expense_type: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "")]
        vat: String,
        #[arg(long, default_value = "")]
        pct: String,
        #[arg(long, default_value = "")]
        commentary: String,
    },
}

fn receipt_mime(file_name: &str) -> Option<&'static str> {
    match receipt_extension(file_name)?.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings()?;
    if let Some(api_url) = args.api_url {
        settings.api_url = config::normalize_api_url(&api_url);
    }
    if let Some(email) = args.email {
        settings.user_email = Some(email);
    }
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    let store: Arc<dyn Store> = Arc::new(
        HttpStore::with_timeout(
            &settings.api_url,
            Duration::from_secs(settings.request_timeout_secs),
        )
        .with_context(|| format!("invalid api url '{}'", settings.api_url))?,
    );
    let identity = SessionIdentity::new(MemorySessionStore::default());
    identity
        .sign_in(&SessionUser::employee(settings.user_email.clone()))
        .context("failed to store session user")?;
    let navigator = Arc::new(|path: &str| match Route::from_path(path) {
        Some(route) => info!(path, ?route, "navigate"),
        None => info!(path, "navigate to unknown view"),
    });
    let feedback = Arc::new(ConsoleFeedback);

    match args.command {
        Command::List => {
            let bills = BillsController::new(Some(store), navigator, feedback);
            let page = bills.load_page().await;
            println!("{}", render_page(&page));
            if let BillsPage::Error(message) = page {
                bail!(message);
            }
        }
        Command::New {
            file,
            expense_type,
            name,
            amount,
            date,
            vat,
            pct,
            commentary,
        } => {
            let file_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| anyhow!("receipt path '{}' has no file name", file.display()))?
                .to_string();
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read receipt '{}'", file.display()))?;
            let mime_type = receipt_mime(&file_name);

            let controller =
                NewBillController::new(Some(store), Arc::new(identity), navigator, feedback);
            let upload = controller.handle_change_file(ReceiptFile::new(file_name, mime_type, bytes))?;
            if let Some(upload) = upload {
                upload.await.context("receipt upload task failed")?;
            }

            let form = NewBillForm {
                expense_type,
                name,
                amount,
                date,
                vat,
                pct,
                commentary,
            };
            if let Some(update) = controller.handle_submit(&form)? {
                update.await.context("bill update task failed")?;
            }
            info!(state = ?controller.state(), "new bill flow finished");
        }
    }

    Ok(())
}
