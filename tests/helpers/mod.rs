use std::{
    collections::VecDeque,
    path::PathBuf,
    str::FromStr,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use pantry::{
    assistant::Assistant,
    llm::{ChatModel, LlmError},
};
use pantry_db::{SqliteStore, Store};
use pantry_inventory::{InventoryReconciler, ReconcilerOptions};
use pantry_shared::{Clock, FixedClock};
use pantry_shopping::ShoppingList;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use time::macros::datetime;

/// Chat model double that answers from a queue and records every prompt.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedModel {
    pub fn push(&self, reply: &str) {
        self.replies.lock().unwrap().push_back(Ok(reply.to_owned()));
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_owned(), user.to_owned()));

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse))
    }
}

pub struct TestState {
    pub store: SqliteStore,
    pub model: Arc<ScriptedModel>,
    pub assistant: Assistant,
}

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<TestState> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let store = SqliteStore(SqlitePool::connect_with(opts).await?);
    store.reconcile_schema(false).await?;

    let clock: Arc<dyn Clock> = Arc::new(FixedClock(datetime!(2024-03-10 12:00:00)));
    let reconciler = InventoryReconciler::new(
        Arc::new(store.clone()),
        clock.clone(),
        ReconcilerOptions::default(),
    );
    let shopping = ShoppingList::new(Arc::new(store.clone()), clock);

    let model = Arc::new(ScriptedModel::default());
    let assistant = Assistant::new(reconciler, shopping, model.clone(), 0.5);

    Ok(TestState {
        store,
        model,
        assistant,
    })
}
