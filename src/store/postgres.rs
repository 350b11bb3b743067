// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    FromRow, PgPool, Postgres, QueryBuilder,
    postgres::PgArguments,
    query::QueryAs,
    types::Json,
};
use uuid::Uuid;

use crate::{
    models::{
        question::{Question, QuestionId},
        quiz::{AttemptRecord, Quiz, QuizFilter, QuizId, QuizPatch},
        update::QuizUpdate,
    },
    store::{QuizStore, StoreError},
};

const QUIZ_COLUMNS: &str = "id, course_id, title, description, points, quiz_type, \
    time_limit_minutes, published, shuffle_answers, multiple_attempts, max_attempts, \
    due_date, available_from, available_until, questions, attempts, created_at";

/// Find-or-increment-or-insert of one user's attempt record.
/// The row lock taken by UPDATE makes the CASE see the latest `attempts`.
const RECORD_ATTEMPT_SQL: &str = r#"
    UPDATE quizzes
    SET attempts = CASE
        WHEN attempts @> jsonb_build_array(jsonb_build_object('user', $2::text)) THEN (
            SELECT jsonb_agg(
                CASE WHEN a->>'user' = $2::text
                     THEN jsonb_set(a, '{count}', to_jsonb((a->>'count')::bigint + 1))
                     ELSE a
                END
                ORDER BY pos)
            FROM jsonb_array_elements(attempts) WITH ORDINALITY AS t(a, pos)
        )
        ELSE attempts || jsonb_build_array(jsonb_build_object('user', $2::text, 'count', 1))
    END
    WHERE id = $1
"#;

const PUSH_QUESTION_SQL: &str = r#"
    UPDATE quizzes
    SET questions = questions || jsonb_build_array($2::jsonb)
    WHERE id = $1
"#;

const REPLACE_QUESTION_SQL: &str = r#"
    UPDATE quizzes
    SET questions = (
        SELECT jsonb_agg(
            CASE WHEN q->>'id' = $2::text THEN $3::jsonb ELSE q END
            ORDER BY pos)
        FROM jsonb_array_elements(questions) WITH ORDINALITY AS t(q, pos)
    )
    WHERE id = $1
      AND questions @> jsonb_build_array(jsonb_build_object('id', $2::text))
"#;

const PULL_QUESTION_SQL: &str = r#"
    UPDATE quizzes
    SET questions = COALESCE((
        SELECT jsonb_agg(q ORDER BY pos)
        FROM jsonb_array_elements(questions) WITH ORDINALITY AS t(q, pos)
        WHERE q->>'id' <> $2::text
    ), '[]'::jsonb)
    WHERE id = $1
"#;

/// Represents the 'quizzes' table in the database.
#[derive(Debug, FromRow)]
struct QuizRow {
    id: Uuid,
    course_id: Uuid,
    title: String,
    description: Option<String>,
    points: Option<i32>,
    quiz_type: String,
    time_limit_minutes: Option<i32>,
    published: bool,
    shuffle_answers: bool,
    multiple_attempts: bool,
    max_attempts: i32,
    due_date: Option<DateTime<Utc>>,
    available_from: Option<DateTime<Utc>>,
    available_until: Option<DateTime<Utc>>,
    questions: Json<Vec<Question>>,
    attempts: Json<Vec<AttemptRecord>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<QuizRow> for Quiz {
    type Error = StoreError;

    fn try_from(row: QuizRow) -> Result<Self, Self::Error> {
        let quiz_type = row.quiz_type.parse().map_err(StoreError::Decode)?;

        Ok(Quiz {
            id: row.id,
            course_id: row.course_id,
            title: row.title,
            description: row.description,
            points: row.points,
            quiz_type,
            time_limit_minutes: row.time_limit_minutes,
            published: row.published,
            shuffle_answers: row.shuffle_answers,
            multiple_attempts: row.multiple_attempts,
            max_attempts: row.max_attempts,
            due_date: row.due_date,
            available_from: row.available_from,
            available_until: row.available_until,
            questions: row.questions.0,
            attempts: row.attempts.0,
            created_at: row.created_at,
        })
    }
}

/// Postgres-backed store.
///
/// Every `QuizUpdate` is one `UPDATE ... RETURNING` statement against a single
/// row, so Postgres row locking provides the per-document atomicity.
#[derive(Clone)]
pub struct PgQuizStore {
    pool: PgPool,
}

impl PgQuizStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    async fn set_fields(&self, id: QuizId, patch: QuizPatch) -> Result<Option<Quiz>, StoreError> {
        if patch.is_empty() {
            return self.fetch(id).await;
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE quizzes SET ");
        let mut separated = builder.separated(", ");

        if let Some(title) = patch.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title);
        }

        if let Some(description) = patch.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description);
        }

        if let Some(points) = patch.points {
            separated.push("points = ");
            separated.push_bind_unseparated(points);
        }

        if let Some(quiz_type) = patch.quiz_type {
            separated.push("quiz_type = ");
            separated.push_bind_unseparated(quiz_type.as_str());
        }

        if let Some(minutes) = patch.time_limit_minutes {
            separated.push("time_limit_minutes = ");
            separated.push_bind_unseparated(minutes);
        }

        if let Some(published) = patch.published {
            separated.push("published = ");
            separated.push_bind_unseparated(published);
        }

        if let Some(shuffle) = patch.shuffle_answers {
            separated.push("shuffle_answers = ");
            separated.push_bind_unseparated(shuffle);
        }

        if let Some(multiple) = patch.multiple_attempts {
            separated.push("multiple_attempts = ");
            separated.push_bind_unseparated(multiple);
        }

        if let Some(max) = patch.max_attempts {
            separated.push("max_attempts = ");
            separated.push_bind_unseparated(max);
        }

        if let Some(due) = patch.due_date {
            separated.push("due_date = ");
            separated.push_bind_unseparated(due);
        }

        if let Some(from) = patch.available_from {
            separated.push("available_from = ");
            separated.push_bind_unseparated(from);
        }

        if let Some(until) = patch.available_until {
            separated.push("available_until = ");
            separated.push_bind_unseparated(until);
        }

        if let Some(questions) = patch.questions {
            separated.push("questions = ");
            separated.push_bind_unseparated(Json(questions));
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" RETURNING ");
        builder.push(QUIZ_COLUMNS);

        let row: Option<QuizRow> = builder
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?;

        row.map(Quiz::try_from).transpose()
    }

    async fn fetch_updated<'q>(
        &self,
        query: QueryAs<'q, Postgres, QuizRow, PgArguments>,
    ) -> Result<Option<Quiz>, StoreError> {
        let row = query.fetch_optional(&self.pool).await?;
        row.map(Quiz::try_from).transpose()
    }
}

fn returning(sql: &str) -> String {
    format!("{} RETURNING {}", sql, QUIZ_COLUMNS)
}

fn question_key(id: QuestionId) -> String {
    id.to_string()
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn insert(&self, quiz: Quiz) -> Result<Quiz, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO quizzes ({QUIZ_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {QUIZ_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, QuizRow>(&sql)
            .bind(quiz.id)
            .bind(quiz.course_id)
            .bind(&quiz.title)
            .bind(&quiz.description)
            .bind(quiz.points)
            .bind(quiz.quiz_type.as_str())
            .bind(quiz.time_limit_minutes)
            .bind(quiz.published)
            .bind(quiz.shuffle_answers)
            .bind(quiz.multiple_attempts)
            .bind(quiz.max_attempts)
            .bind(quiz.due_date)
            .bind(quiz.available_from)
            .bind(quiz.available_until)
            .bind(Json(&quiz.questions))
            .bind(Json(&quiz.attempts))
            .bind(quiz.created_at)
            .fetch_one(&self.pool)
            .await?;

        Quiz::try_from(row)
    }

    async fn fetch(&self, id: QuizId) -> Result<Option<Quiz>, StoreError> {
        let sql = format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1");

        let row = sqlx::query_as::<_, QuizRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Quiz::try_from).transpose()
    }

    async fn fetch_many(&self, filter: QuizFilter) -> Result<Vec<Quiz>, StoreError> {
        let sql = format!(
            r#"
            SELECT {QUIZ_COLUMNS} FROM quizzes
            WHERE ($1::UUID IS NULL OR course_id = $1)
            ORDER BY created_at, id
            "#
        );

        let rows = sqlx::query_as::<_, QuizRow>(&sql)
            .bind(filter.course_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Quiz::try_from).collect()
    }

    async fn apply(&self, id: QuizId, update: QuizUpdate) -> Result<Option<Quiz>, StoreError> {
        match update {
            QuizUpdate::SetFields(patch) => self.set_fields(id, patch).await,
            QuizUpdate::RecordAttempt { user } => {
                let sql = returning(RECORD_ATTEMPT_SQL);
                self.fetch_updated(sqlx::query_as(&sql).bind(id).bind(user))
                    .await
            }
            QuizUpdate::PushQuestion(question) => {
                let sql = returning(PUSH_QUESTION_SQL);
                self.fetch_updated(sqlx::query_as(&sql).bind(id).bind(Json(question)))
                    .await
            }
            QuizUpdate::ReplaceQuestion(question) => {
                let sql = returning(REPLACE_QUESTION_SQL);
                let key = question_key(question.id);
                self.fetch_updated(
                    sqlx::query_as(&sql)
                        .bind(id)
                        .bind(key)
                        .bind(Json(question)),
                )
                .await
            }
            QuizUpdate::PullQuestion(question_id) => {
                let sql = returning(PULL_QUESTION_SQL);
                self.fetch_updated(
                    sqlx::query_as(&sql)
                        .bind(id)
                        .bind(question_key(question_id)),
                )
                .await
            }
        }
    }

    async fn delete(&self, id: QuizId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
