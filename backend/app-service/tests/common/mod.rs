//! In-memory stand-ins for PostgreSQL and Kafka
#![allow(dead_code)]

use actix_middleware::{RefreshStore, SessionResolver, StoreError};
use app_service::models::{
    NewUserState, ProfileRecord, ProfileUpdate, QuestionRecord, STATUS_INACTIVE,
};
use app_service::services::{
    AccountService, AccountStore, AccountTx, QuestionService, QuestionStore,
};
use app_service::AppState;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use error_types::{Result, ServiceError};
use jwt_security::TokenCodec;
use notification_queue::{
    NotificationMessage, NotificationProducer, QueueError, QueuePublisher, QueueResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use uuid::Uuid;

pub const SECRET: &str = "devotion-test-secret-0f9Qx7LmZ2pR4tV8wY1k";

#[derive(Debug, Clone)]
pub struct UserRow {
    pub name: String,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RefreshRow {
    pub user_id: String,
    pub expires_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct QuestionRow {
    pub user_id: String,
    pub record: QuestionRecord,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: HashMap<String, UserRow>,
    pub states: HashMap<String, NewUserState>,
    pub refresh_tokens: HashMap<String, RefreshRow>,
    pub questions: Vec<QuestionRow>,
}

/// Shared tables; transactions work on a staged copy that replaces the
/// shared one on commit
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_refresh_insert: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the third registration statement fail
    pub fn fail_refresh_insert(&self) {
        self.fail_refresh_insert.store(true, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Tables {
        self.tables.lock().unwrap().clone()
    }
}

pub struct MemoryTx {
    tables: Arc<Mutex<Tables>>,
    staged: Tables,
    fail_refresh_insert: bool,
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn AccountTx>> {
        Ok(Box::new(MemoryTx {
            tables: self.tables.clone(),
            staged: self.snapshot(),
            fail_refresh_insert: self.fail_refresh_insert.load(Ordering::SeqCst),
        }))
    }

    async fn profile(&self, user_id: &str) -> Result<Option<ProfileRecord>> {
        let tables = self.tables.lock().unwrap();
        let (Some(user), Some(state)) = (tables.users.get(user_id), tables.states.get(user_id))
        else {
            return Ok(None);
        };

        Ok(Some(ProfileRecord {
            name: user.name.clone(),
            alarm: state.alarm,
            expo_push_token: state.expo_push_token.clone(),
            created_date: user.created_date,
        }))
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<u64> {
        let mut tables = self.tables.lock().unwrap();
        let mut affected = 0;

        if let Some(name) = &update.name {
            if let Some(user) = tables.users.get_mut(user_id) {
                user.name = name.clone();
                affected += 1;
            }
        }
        if let Some(state) = tables.states.get_mut(user_id) {
            if let Some(alarm) = update.alarm {
                state.alarm = alarm;
                affected += 1;
            }
            if let Some(token) = &update.expo_push_token {
                state.expo_push_token = Some(token.clone());
                affected += 1;
            }
        }

        Ok(affected)
    }
}

#[async_trait]
impl AccountTx for MemoryTx {
    async fn insert_user(&mut self, user_id: &str, name: &str) -> Result<()> {
        self.staged.users.insert(
            user_id.to_string(),
            UserRow {
                name: name.to_string(),
                created_date: Utc::now(),
            },
        );
        Ok(())
    }

    async fn insert_user_state(&mut self, state: &NewUserState) -> Result<()> {
        self.staged
            .states
            .insert(state.user_id.clone(), state.clone());
        Ok(())
    }

    async fn insert_refresh_token(&mut self, token: &str, user_id: &str) -> Result<()> {
        if self.fail_refresh_insert {
            return Err(ServiceError::Internal("refresh_token insert failed".into()));
        }
        self.staged.refresh_tokens.insert(
            token.to_string(),
            RefreshRow {
                user_id: user_id.to_string(),
                expires_date: Utc::now() + Duration::days(365 * 100),
            },
        );
        Ok(())
    }

    async fn deactivate_user(&mut self, user_id: &str) -> Result<u64> {
        Ok(match self.staged.states.get_mut(user_id) {
            Some(state) => {
                state.status = STATUS_INACTIVE.to_string();
                1
            }
            None => 0,
        })
    }

    async fn expire_refresh_tokens(&mut self, user_id: &str) -> Result<u64> {
        let now = Utc::now();
        let mut affected = 0;
        for row in self.staged.refresh_tokens.values_mut() {
            if row.user_id == user_id {
                row.expires_date = now;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        *self.tables.lock().unwrap() = self.staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl RefreshStore for MemoryStore {
    async fn lookup(&self, token: &str) -> std::result::Result<Option<String>, StoreError> {
        let now = Utc::now();
        Ok(self
            .tables
            .lock()
            .unwrap()
            .refresh_tokens
            .get(token)
            .filter(|row| row.expires_date > now)
            .map(|row| row.user_id.clone()))
    }

    async fn invalidate(&self, subject_id: &str) -> std::result::Result<u64, StoreError> {
        let now = Utc::now();
        let mut affected = 0;
        for row in self.tables.lock().unwrap().refresh_tokens.values_mut() {
            if row.user_id == subject_id {
                row.expires_date = now;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn create(&self, subject_id: &str) -> std::result::Result<String, StoreError> {
        let token = Uuid::new_v4().to_string();
        self.tables.lock().unwrap().refresh_tokens.insert(
            token.clone(),
            RefreshRow {
                user_id: subject_id.to_string(),
                expires_date: Utc::now() + Duration::days(365 * 100),
            },
        );
        Ok(token)
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn list(&self, user_id: &str) -> Result<Vec<QuestionRecord>> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<QuestionRecord> = tables
            .questions
            .iter()
            .filter(|q| q.user_id == user_id && q.is_active)
            .map(|q| q.record.clone())
            .collect();
        rows.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        Ok(rows)
    }

    async fn find(&self, user_id: &str, question_id: &str) -> Result<Option<QuestionRecord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .questions
            .iter()
            .find(|q| q.user_id == user_id && q.is_active && q.record.question_id == question_id)
            .map(|q| q.record.clone()))
    }

    async fn insert(&self, user_id: &str, content: &str) -> Result<String> {
        let question_id = Uuid::new_v4().to_string();
        self.tables.lock().unwrap().questions.push(QuestionRow {
            user_id: user_id.to_string(),
            record: QuestionRecord {
                question_id: question_id.clone(),
                content: content.to_string(),
                is_answered: false,
                created_date: Utc::now(),
            },
            is_active: true,
        });
        Ok(question_id)
    }

    async fn update(&self, user_id: &str, question_id: &str, content: &str) -> Result<u64> {
        let mut tables = self.tables.lock().unwrap();
        let mut affected = 0;
        for q in tables.questions.iter_mut() {
            if q.user_id == user_id && q.is_active && q.record.question_id == question_id {
                q.record.content = content.to_string();
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn deactivate(&self, user_id: &str, question_id: &str) -> Result<u64> {
        let mut tables = self.tables.lock().unwrap();
        let mut affected = 0;
        for q in tables.questions.iter_mut() {
            if q.user_id == user_id && q.is_active && q.record.question_id == question_id {
                q.is_active = false;
                affected += 1;
            }
        }
        Ok(affected)
    }
}

pub struct ChannelPublisher {
    tx: mpsc::UnboundedSender<NotificationMessage>,
}

impl ChannelPublisher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NotificationMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl QueuePublisher for ChannelPublisher {
    async fn publish(&self, message: &NotificationMessage) -> QueueResult<()> {
        self.tx
            .send(message.clone())
            .map_err(|e| QueueError::PublishFailed(e.to_string()))
    }
}

pub struct FailingPublisher;

#[async_trait]
impl QueuePublisher for FailingPublisher {
    async fn publish(&self, _message: &NotificationMessage) -> QueueResult<()> {
        Err(QueueError::PublishFailed("broker unreachable".into()))
    }
}

pub fn codec() -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(SECRET).unwrap())
}

/// Signed with the shared secret but already past its horizon
pub fn expired_token(subject: &str) -> String {
    TokenCodec::new(SECRET)
        .unwrap()
        .with_ttl(Duration::seconds(-60))
        .generate(subject)
        .unwrap()
}

pub struct Harness {
    pub store: MemoryStore,
    pub codec: Arc<TokenCodec>,
    pub state: AppState,
    pub resolver: Arc<SessionResolver>,
}

impl Harness {
    pub fn new(publisher: Arc<dyn QueuePublisher>) -> Self {
        let store = MemoryStore::new();
        let codec = codec();
        let resolver = Arc::new(SessionResolver::new(
            codec.clone(),
            Arc::new(store.clone()),
        ));
        let state = AppState {
            accounts: Arc::new(AccountService::new(Arc::new(store.clone()), codec.clone())),
            questions: Arc::new(QuestionService::new(
                Arc::new(store.clone()),
                NotificationProducer::new(publisher),
            )),
        };

        Self {
            store,
            codec,
            state,
            resolver,
        }
    }
}
