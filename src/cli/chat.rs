use std::sync::Arc;

use anyhow::Result;
use pantry::assistant::Assistant;
use pantry::llm::{ChatModel, OpenAiChatModel};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::App;

fn assistant(app: &App) -> Result<Assistant> {
    let model: Arc<dyn ChatModel> = Arc::new(OpenAiChatModel::new(&app.config.llm)?);

    Ok(Assistant::new(
        app.reconciler.clone(),
        app.shopping.clone(),
        model,
        app.config.inventory.min_confidence,
    ))
}

pub async fn say(app: &App, user: &str, text: &str) -> Result<()> {
    let reply = assistant(app)?.handle_message(user, text).await;

    println!("{reply}");

    Ok(())
}

/// Read messages from stdin, one per line. Every message is handled on its
/// own task; replies are printed in the order the messages arrived.
pub async fn chat(app: &App, user: String) -> Result<()> {
    let assistant = assistant(app)?;
    let user: Arc<str> = user.into();
    let (tx, mut rx) = mpsc::unbounded_channel::<JoinHandle<String>>();

    let printer = tokio::spawn(async move {
        while let Some(handle) = rx.recv().await {
            match handle.await {
                Ok(reply) => println!("{reply}"),
                Err(err) => tracing::error!(error = %err, "Message task failed"),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim().to_owned();
        if text.is_empty() {
            continue;
        }

        let assistant = assistant.clone();
        let user = user.clone();
        let handle = tokio::spawn(async move { assistant.handle_message(&user, &text).await });

        if tx.send(handle).is_err() {
            break;
        }
    }

    drop(tx);
    printer.await?;

    Ok(())
}
