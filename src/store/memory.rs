// src/store/memory.rs

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::{
    models::{
        quiz::{Quiz, QuizFilter, QuizId},
        update::QuizUpdate,
    },
    store::{QuizStore, StoreError},
};

/// In-process store.
///
/// Each quiz sits behind its own mutex, so all mutations of one quiz are
/// serialized while different quizzes proceed in parallel. The outer map lock
/// is only held to look up, insert or remove an entry.
#[derive(Default)]
pub struct MemoryQuizStore {
    quizzes: RwLock<HashMap<QuizId, Arc<Mutex<Quiz>>>>,
}

impl MemoryQuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, id: QuizId) -> Option<Arc<Mutex<Quiz>>> {
        self.quizzes.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl QuizStore for MemoryQuizStore {
    async fn insert(&self, quiz: Quiz) -> Result<Quiz, StoreError> {
        self.quizzes
            .write()
            .await
            .insert(quiz.id, Arc::new(Mutex::new(quiz.clone())));
        Ok(quiz)
    }

    async fn fetch(&self, id: QuizId) -> Result<Option<Quiz>, StoreError> {
        match self.entry(id).await {
            Some(slot) => Ok(Some(slot.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn fetch_many(&self, filter: QuizFilter) -> Result<Vec<Quiz>, StoreError> {
        let slots: Vec<Arc<Mutex<Quiz>>> = self.quizzes.read().await.values().cloned().collect();

        let mut quizzes = Vec::with_capacity(slots.len());
        for slot in slots {
            let quiz = slot.lock().await;
            if filter.course_id.is_none_or(|c| c == quiz.course_id) {
                quizzes.push(quiz.clone());
            }
        }
        quizzes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(quizzes)
    }

    async fn apply(&self, id: QuizId, update: QuizUpdate) -> Result<Option<Quiz>, StoreError> {
        let Some(slot) = self.entry(id).await else {
            return Ok(None);
        };

        let mut quiz = slot.lock().await;
        if update.apply_to(&mut quiz) {
            Ok(Some(quiz.clone()))
        } else {
            Ok(None)
        }
    }

    async fn delete(&self, id: QuizId) -> Result<bool, StoreError> {
        Ok(self.quizzes.write().await.remove(&id).is_some())
    }
}
