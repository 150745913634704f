//! Postgres implementation of [`ModelStore`].
//!
//! All SQL is runtime-checked (sqlx::query, not sqlx::query!) to avoid a
//! compile-time database requirement. Table and column names in the
//! generic-by-kind operations are interpolated from graph and schema
//! metadata only; user data always goes through bind parameters.

mod rows;

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, warn};

use crate::domain::*;
use crate::error::{ModelError, Result};
use crate::graph::{EntityKind, JoinSide, JoinTable};
use crate::schema;
use crate::store::ModelStore;

use rows::*;

/// Connection settings, read from the environment by default.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
    pub idle_timeout: Option<Duration>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost:5432/alumni".to_string()),
            max_connections: std::env::var("DATABASE_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            connection_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
        }
    }
}

/// Credentials never reach the logs.
fn mask_database_url(url: &str) -> String {
    match url.find("://").zip(url.rfind('@')) {
        Some((scheme_end, at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

/// Postgres-backed model store wrapping a connection pool.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: DatabaseConfig) -> Result<Self> {
        info!(url = %mask_database_url(&config.database_url), "connecting to database");
        let mut options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connection_timeout);
        if let Some(idle) = config.idle_timeout {
            options = options.idle_timeout(idle);
        }
        let pool = options.connect(&config.database_url).await.map_err(|e| {
            warn!("database connection failed: {e}");
            anyhow!(e)
        })?;
        info!("database connection pool ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create every table in dependency order.
    pub async fn migrate(&self) -> Result<()> {
        for table in schema::migration_plan() {
            sqlx::query(&table.create_sql())
                .execute(&self.pool)
                .await
                .map_err(|e| anyhow!("creating {}: {e}", table.name))?;
        }
        info!("schema migrated");
        Ok(())
    }

    /// Drop every table, children before parents.
    pub async fn teardown(&self) -> Result<()> {
        for table in schema::drop_plan() {
            sqlx::query(&table.drop_sql())
                .execute(&self.pool)
                .await
                .map_err(|e| anyhow!("dropping {}: {e}", table.name))?;
        }
        Ok(())
    }
}

fn db(e: sqlx::Error) -> ModelError {
    ModelError::Store(anyhow!(e))
}

fn domain<R, T>(row: Option<R>) -> Result<Option<T>>
where
    T: TryFrom<R, Error = String>,
{
    row.map(|r| r.try_into().map_err(|e: String| ModelError::Store(anyhow!(e))))
        .transpose()
}

async fn link_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    join: JoinTable,
    left_id: i64,
    right_id: i64,
) -> Result<()> {
    let (_, left_col) = join.left();
    let (_, right_col) = join.right();
    let sql = format!(
        "INSERT INTO {} ({left_col}, {right_col}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        join.table()
    );
    sqlx::query(&sql)
        .bind(left_id)
        .bind(right_id)
        .execute(&mut **tx)
        .await
        .map_err(db)?;
    Ok(())
}

#[async_trait]
impl ModelStore for PgStore {
    // ── generic-by-kind probes ───────────────────────────────

    async fn exists(&self, kind: EntityKind, id: i64) -> Result<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", kind.as_str());
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(db)
    }

    async fn delete_row(&self, kind: EntityKind, id: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.as_str());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await.map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn child_ids(&self, kind: EntityKind, fk: &str, parent_id: i64) -> Result<Vec<i64>> {
        let sql = format!("SELECT id FROM {} WHERE {fk} = $1 ORDER BY id", kind.as_str());
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db)
    }

    async fn count_children(&self, kind: EntityKind, fk: &str, parent_id: i64) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {fk} = $1", kind.as_str());
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(parent_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db)
    }

    async fn nullify_fk(&self, kind: EntityKind, fk: &str, parent_id: i64) -> Result<u64> {
        let sql = format!(
            "UPDATE {} SET {fk} = NULL, updated_at = now() WHERE {fk} = $1",
            kind.as_str()
        );
        let result = sqlx::query(&sql).bind(parent_id).execute(&self.pool).await.map_err(db)?;
        Ok(result.rows_affected())
    }

    async fn target_child_ids(
        &self,
        kind: EntityKind,
        target_kind: EntityKind,
        target_id: i64,
    ) -> Result<Vec<i64>> {
        let sql = format!(
            "SELECT id FROM {} WHERE target_kind = $1 AND target_id = $2 ORDER BY id",
            kind.as_str()
        );
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(target_kind.as_str())
            .bind(target_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db)
    }

    async fn clear_targets(
        &self,
        kind: EntityKind,
        target_kind: EntityKind,
        target_id: i64,
    ) -> Result<u64> {
        let sql = format!(
            "UPDATE {} SET target_kind = NULL, target_id = NULL, updated_at = now() \
             WHERE target_kind = $1 AND target_id = $2",
            kind.as_str()
        );
        let result = sqlx::query(&sql)
            .bind(target_kind.as_str())
            .bind(target_id)
            .execute(&self.pool)
            .await
            .map_err(db)?;
        Ok(result.rows_affected())
    }

    async fn slug_in_use(
        &self,
        kind: EntityKind,
        slug: &str,
        exclude: Option<i64>,
    ) -> Result<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE slug = $1 AND ($2::bigint IS NULL OR id <> $2))",
            kind.as_str()
        );
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(slug)
            .bind(exclude)
            .fetch_one(&self.pool)
            .await
            .map_err(db)
    }

    async fn all_ids(&self, kind: EntityKind) -> Result<Vec<i64>> {
        let sql = format!("SELECT id FROM {} ORDER BY id", kind.as_str());
        sqlx::query_scalar::<_, i64>(&sql).fetch_all(&self.pool).await.map_err(db)
    }

    // ── join links ───────────────────────────────────────────

    async fn link(&self, join: JoinTable, left_id: i64, right_id: i64) -> Result<bool> {
        let (_, left_col) = join.left();
        let (_, right_col) = join.right();
        let sql = format!(
            "INSERT INTO {} ({left_col}, {right_col}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            join.table()
        );
        let result = sqlx::query(&sql)
            .bind(left_id)
            .bind(right_id)
            .execute(&self.pool)
            .await
            .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn unlink(&self, join: JoinTable, left_id: i64, right_id: i64) -> Result<bool> {
        let (_, left_col) = join.left();
        let (_, right_col) = join.right();
        let sql = format!(
            "DELETE FROM {} WHERE {left_col} = $1 AND {right_col} = $2",
            join.table()
        );
        let result = sqlx::query(&sql)
            .bind(left_id)
            .bind(right_id)
            .execute(&self.pool)
            .await
            .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn linked_ids(&self, join: JoinTable, side: JoinSide, id: i64) -> Result<Vec<i64>> {
        let (_, own_col) = join.side(side);
        let (_, other_col) = match side {
            JoinSide::Left => join.right(),
            JoinSide::Right => join.left(),
        };
        let sql = format!(
            "SELECT {other_col} FROM {} WHERE {own_col} = $1 ORDER BY {other_col}",
            join.table()
        );
        sqlx::query_scalar::<_, i64>(&sql).bind(id).fetch_all(&self.pool).await.map_err(db)
    }

    async fn drop_links(&self, join: JoinTable, side: JoinSide, id: i64) -> Result<u64> {
        let (_, own_col) = join.side(side);
        let sql = format!("DELETE FROM {} WHERE {own_col} = $1", join.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await.map_err(db)?;
        Ok(result.rows_affected())
    }

    // ── users & profiles ─────────────────────────────────────

    async fn insert_user(&self, user: &User) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, password_hash, role, is_verified, is_active,
                               reset_token, reset_token_expires_at, last_login_at,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.is_verified)
        .bind(user.is_active)
        .bind(user.reset_token)
        .bind(user.reset_token_expires_at)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, PgUserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        domain(row)
    }

    async fn update_user(&self, user: &User) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, password_hash = $3, role = $4, is_verified = $5,
                is_active = $6, reset_token = $7, reset_token_expires_at = $8,
                last_login_at = $9, updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.is_verified)
        .bind(user.is_active)
        .bind(user.reset_token)
        .bind(user.reset_token_expires_at)
        .bind(user.last_login_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, PgUserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        domain(row)
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO profiles (user_id, full_name, phone, address, entry_year,
                                  graduation_year, gpa, thesis_title, current_employer,
                                  job_title, profile_picture, bio, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.full_name)
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(profile.entry_year)
        .bind(profile.graduation_year)
        .bind(profile.gpa)
        .bind(&profile.thesis_title)
        .bind(&profile.current_employer)
        .bind(&profile.job_title)
        .bind(&profile.profile_picture)
        .bind(&profile.bio)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_profile(&self, id: i64) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, PgProfileRow>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        domain(row)
    }

    async fn update_profile(&self, profile: &Profile) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET full_name = $2, phone = $3, address = $4, entry_year = $5,
                graduation_year = $6, gpa = $7, thesis_title = $8,
                current_employer = $9, job_title = $10, profile_picture = $11,
                bio = $12, updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(profile.id)
        .bind(&profile.full_name)
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(profile.entry_year)
        .bind(profile.graduation_year)
        .bind(profile.gpa)
        .bind(&profile.thesis_title)
        .bind(&profile.current_employer)
        .bind(&profile.job_title)
        .bind(&profile.profile_picture)
        .bind(&profile.bio)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn profile_by_user(&self, user_id: i64) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, PgProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        domain(row)
    }

    // ── taxonomy ─────────────────────────────────────────────

    async fn insert_category(&self, category: &Category) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO categories (name, slug, description, parent_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.parent_id)
        .bind(category.created_at)
        .bind(category.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let row = sqlx::query_as::<_, PgCategoryRow>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        domain(row)
    }

    async fn update_category(&self, category: &Category) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, slug = $3, description = $4, parent_id = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.parent_id)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_tag(&self, tag: &Tag) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO tags (name, slug, created_at, updated_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&tag.name)
        .bind(&tag.slug)
        .bind(tag.created_at)
        .bind(tag.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_tag(&self, id: i64) -> Result<Option<Tag>> {
        let row = sqlx::query_as::<_, PgTagRow>("SELECT * FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        domain(row)
    }

    async fn update_tag(&self, tag: &Tag) -> Result<bool> {
        let result =
            sqlx::query("UPDATE tags SET name = $2, slug = $3, updated_at = $4 WHERE id = $1")
                .bind(tag.id)
                .bind(&tag.name)
                .bind(&tag.slug)
                .bind(tag.updated_at)
                .execute(&self.pool)
                .await
                .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    // ── content ──────────────────────────────────────────────

    async fn insert_article(
        &self,
        article: &Article,
        category_ids: &[i64],
        tag_ids: &[i64],
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO articles (title, slug, content, excerpt, featured_image,
                                  author_id, is_published, is_featured, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.content)
        .bind(&article.excerpt)
        .bind(&article.featured_image)
        .bind(article.author_id)
        .bind(article.is_published)
        .bind(article.is_featured)
        .bind(article.created_at)
        .bind(article.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db)?;
        for &category_id in category_ids {
            link_in_tx(&mut tx, JoinTable::ArticleCategories, id, category_id).await?;
        }
        for &tag_id in tag_ids {
            link_in_tx(&mut tx, JoinTable::ArticleTags, id, tag_id).await?;
        }
        tx.commit().await.map_err(db)?;
        Ok(id)
    }

    async fn get_article(&self, id: i64) -> Result<Option<Article>> {
        let row = sqlx::query_as::<_, PgArticleRow>("SELECT * FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        domain(row)
    }

    async fn update_article(&self, article: &Article) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE articles
            SET title = $2, slug = $3, content = $4, excerpt = $5, featured_image = $6,
                is_published = $7, is_featured = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.content)
        .bind(&article.excerpt)
        .bind(&article.featured_image)
        .bind(article.is_published)
        .bind(article.is_featured)
        .bind(article.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_news(
        &self,
        news: &News,
        category_ids: &[i64],
        tag_ids: &[i64],
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO news (title, slug, content, excerpt, featured_image,
                              author_id, is_published, is_featured, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&news.title)
        .bind(&news.slug)
        .bind(&news.content)
        .bind(&news.excerpt)
        .bind(&news.featured_image)
        .bind(news.author_id)
        .bind(news.is_published)
        .bind(news.is_featured)
        .bind(news.created_at)
        .bind(news.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db)?;
        for &category_id in category_ids {
            link_in_tx(&mut tx, JoinTable::NewsCategories, id, category_id).await?;
        }
        for &tag_id in tag_ids {
            link_in_tx(&mut tx, JoinTable::NewsTags, id, tag_id).await?;
        }
        tx.commit().await.map_err(db)?;
        Ok(id)
    }

    async fn get_news(&self, id: i64) -> Result<Option<News>> {
        let row = sqlx::query_as::<_, PgNewsRow>("SELECT * FROM news WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        domain(row)
    }

    async fn update_news(&self, news: &News) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE news
            SET title = $2, slug = $3, content = $4, excerpt = $5, featured_image = $6,
                is_published = $7, is_featured = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(news.id)
        .bind(&news.title)
        .bind(&news.slug)
        .bind(&news.content)
        .bind(&news.excerpt)
        .bind(&news.featured_image)
        .bind(news.is_published)
        .bind(news.is_featured)
        .bind(news.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO comments (content, author_id, target_kind, target_id,
                                  parent_id, is_approved, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&comment.content)
        .bind(comment.author_id)
        .bind(comment.target.map(|t| t.kind().as_str()))
        .bind(comment.target.map(|t| t.id()))
        .bind(comment.parent_id)
        .bind(comment.is_approved)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>> {
        let row = sqlx::query_as::<_, PgCommentRow>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        domain(row)
    }

    async fn update_comment(&self, comment: &Comment) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE comments
            SET content = $2, target_kind = $3, target_id = $4, is_approved = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(comment.id)
        .bind(&comment.content)
        .bind(comment.target.map(|t| t.kind().as_str()))
        .bind(comment.target.map(|t| t.id()))
        .bind(comment.is_approved)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    // ── forum ────────────────────────────────────────────────

    async fn insert_forum_topic(&self, topic: &ForumTopic) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO forum_topics (title, content, category_id, author_id, is_closed,
                                      is_pinned, last_activity_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&topic.title)
        .bind(&topic.content)
        .bind(topic.category_id)
        .bind(topic.author_id)
        .bind(topic.is_closed)
        .bind(topic.is_pinned)
        .bind(topic.last_activity_at)
        .bind(topic.created_at)
        .bind(topic.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_forum_topic(&self, id: i64) -> Result<Option<ForumTopic>> {
        let row = sqlx::query_as::<_, PgForumTopicRow>("SELECT * FROM forum_topics WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        domain(row)
    }

    async fn update_forum_topic(&self, topic: &ForumTopic) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE forum_topics
            SET title = $2, content = $3, category_id = $4, is_closed = $5,
                is_pinned = $6, last_activity_at = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(topic.id)
        .bind(&topic.title)
        .bind(&topic.content)
        .bind(topic.category_id)
        .bind(topic.is_closed)
        .bind(topic.is_pinned)
        .bind(topic.last_activity_at)
        .bind(topic.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_forum_post(&self, post: &ForumPost) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO forum_posts (topic_id, author_id, content, parent_id,
                                     created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(post.topic_id)
        .bind(post.author_id)
        .bind(&post.content)
        .bind(post.parent_id)
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_forum_post(&self, id: i64) -> Result<Option<ForumPost>> {
        let row = sqlx::query_as::<_, PgForumPostRow>("SELECT * FROM forum_posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        domain(row)
    }

    async fn update_forum_post(&self, post: &ForumPost) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE forum_posts SET content = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(post.id)
        .bind(&post.content)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    // ── events ───────────────────────────────────────────────

    async fn insert_event(&self, event: &Event, category_ids: &[i64]) -> Result<i64> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO events (title, slug, description, organizer_id, starts_at, ends_at,
                                location, event_type, capacity, registration_deadline,
                                is_published, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(&event.title)
        .bind(&event.slug)
        .bind(&event.description)
        .bind(event.organizer_id)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(&event.location)
        .bind(&event.event_type)
        .bind(event.capacity)
        .bind(event.registration_deadline)
        .bind(event.is_published)
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db)?;
        for &category_id in category_ids {
            link_in_tx(&mut tx, JoinTable::EventCategories, id, category_id).await?;
        }
        tx.commit().await.map_err(db)?;
        Ok(id)
    }

    async fn get_event(&self, id: i64) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, PgEventRow>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        domain(row)
    }

    async fn update_event(&self, event: &Event) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET title = $2, slug = $3, description = $4, starts_at = $5, ends_at = $6,
                location = $7, event_type = $8, capacity = $9,
                registration_deadline = $10, is_published = $11, updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.slug)
        .bind(&event.description)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(&event.location)
        .bind(&event.event_type)
        .bind(event.capacity)
        .bind(event.registration_deadline)
        .bind(event.is_published)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_registration(&self, registration: &EventRegistration) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO event_registrations (event_id, user_id, registered_at,
                                             attendance_status, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(registration.event_id)
        .bind(registration.user_id)
        .bind(registration.registered_at)
        .bind(registration.attendance_status.as_str())
        .bind(&registration.notes)
        .bind(registration.created_at)
        .bind(registration.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_registration(&self, id: i64) -> Result<Option<EventRegistration>> {
        let row = sqlx::query_as::<_, PgEventRegistrationRow>(
            "SELECT * FROM event_registrations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;
        domain(row)
    }

    async fn update_registration(&self, registration: &EventRegistration) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE event_registrations
            SET attendance_status = $2, notes = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(registration.id)
        .bind(registration.attendance_status.as_str())
        .bind(&registration.notes)
        .bind(registration.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn registration_for(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Option<EventRegistration>> {
        let row = sqlx::query_as::<_, PgEventRegistrationRow>(
            "SELECT * FROM event_registrations WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;
        domain(row)
    }

    // ── galleries ────────────────────────────────────────────

    async fn insert_gallery(&self, gallery: &Gallery, tag_ids: &[i64]) -> Result<i64> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO galleries (title, media_kind, media_path, caption, uploader_id,
                                   target_kind, target_id, is_published, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&gallery.title)
        .bind(gallery.media_kind.as_str())
        .bind(&gallery.media_path)
        .bind(&gallery.caption)
        .bind(gallery.uploader_id)
        .bind(gallery.target.map(|t| t.kind().as_str()))
        .bind(gallery.target.map(|t| t.id()))
        .bind(gallery.is_published)
        .bind(gallery.created_at)
        .bind(gallery.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db)?;
        for &tag_id in tag_ids {
            link_in_tx(&mut tx, JoinTable::GalleryTags, id, tag_id).await?;
        }
        tx.commit().await.map_err(db)?;
        Ok(id)
    }

    async fn get_gallery(&self, id: i64) -> Result<Option<Gallery>> {
        let row = sqlx::query_as::<_, PgGalleryRow>("SELECT * FROM galleries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        domain(row)
    }

    async fn update_gallery(&self, gallery: &Gallery) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE galleries
            SET title = $2, caption = $3, target_kind = $4, target_id = $5,
                is_published = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(gallery.id)
        .bind(&gallery.title)
        .bind(&gallery.caption)
        .bind(gallery.target.map(|t| t.kind().as_str()))
        .bind(gallery.target.map(|t| t.id()))
        .bind(gallery.is_published)
        .bind(gallery.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    // ── scholarships ─────────────────────────────────────────

    async fn insert_scholarship(&self, scholarship: &Scholarship) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO scholarships (name, slug, description, amount_cents, opens_on,
                                      closes_on, status, is_published, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&scholarship.name)
        .bind(&scholarship.slug)
        .bind(&scholarship.description)
        .bind(scholarship.amount_cents)
        .bind(scholarship.opens_on)
        .bind(scholarship.closes_on)
        .bind(scholarship.status.as_str())
        .bind(scholarship.is_published)
        .bind(scholarship.created_at)
        .bind(scholarship.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_scholarship(&self, id: i64) -> Result<Option<Scholarship>> {
        let row = sqlx::query_as::<_, PgScholarshipRow>("SELECT * FROM scholarships WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        domain(row)
    }

    async fn update_scholarship(&self, scholarship: &Scholarship) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE scholarships
            SET name = $2, slug = $3, description = $4, amount_cents = $5, opens_on = $6,
                closes_on = $7, status = $8, is_published = $9, updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(scholarship.id)
        .bind(&scholarship.name)
        .bind(&scholarship.slug)
        .bind(&scholarship.description)
        .bind(scholarship.amount_cents)
        .bind(scholarship.opens_on)
        .bind(scholarship.closes_on)
        .bind(scholarship.status.as_str())
        .bind(scholarship.is_published)
        .bind(scholarship.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_recipient(&self, recipient: &ScholarshipRecipient) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO scholarship_recipients (scholarship_id, user_id, award_year, batch,
                                                major, citation, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(recipient.scholarship_id)
        .bind(recipient.user_id)
        .bind(recipient.award_year)
        .bind(&recipient.batch)
        .bind(&recipient.major)
        .bind(&recipient.citation)
        .bind(recipient.created_at)
        .bind(recipient.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_recipient(&self, id: i64) -> Result<Option<ScholarshipRecipient>> {
        let row = sqlx::query_as::<_, PgScholarshipRecipientRow>(
            "SELECT * FROM scholarship_recipients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;
        domain(row)
    }

    async fn update_recipient(&self, recipient: &ScholarshipRecipient) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE scholarship_recipients
            SET award_year = $2, batch = $3, major = $4, citation = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(recipient.id)
        .bind(recipient.award_year)
        .bind(&recipient.batch)
        .bind(&recipient.major)
        .bind(&recipient.citation)
        .bind(recipient.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_application(&self, application: &ScholarshipApplication) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO scholarship_applications (scholarship_id, user_id, status, essay,
                                                  review_notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(application.scholarship_id)
        .bind(application.user_id)
        .bind(application.status.as_str())
        .bind(&application.essay)
        .bind(&application.review_notes)
        .bind(application.created_at)
        .bind(application.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_application(&self, id: i64) -> Result<Option<ScholarshipApplication>> {
        let row = sqlx::query_as::<_, PgScholarshipApplicationRow>(
            "SELECT * FROM scholarship_applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;
        domain(row)
    }

    async fn update_application(&self, application: &ScholarshipApplication) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE scholarship_applications
            SET status = $2, essay = $3, review_notes = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(application.id)
        .bind(application.status.as_str())
        .bind(&application.essay)
        .bind(&application.review_notes)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    // ── donations ────────────────────────────────────────────

    async fn insert_qris_account(&self, account: &QrisAccount) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO qris_accounts (bank_name, merchant_name, account_number,
                                       qr_image_path, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&account.bank_name)
        .bind(&account.merchant_name)
        .bind(&account.account_number)
        .bind(&account.qr_image_path)
        .bind(account.is_active)
        .bind(account.created_at)
        .bind(account.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_qris_account(&self, id: i64) -> Result<Option<QrisAccount>> {
        let row =
            sqlx::query_as::<_, PgQrisAccountRow>("SELECT * FROM qris_accounts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db)?;
        domain(row)
    }

    async fn update_qris_account(&self, account: &QrisAccount) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE qris_accounts
            SET bank_name = $2, merchant_name = $3, account_number = $4,
                qr_image_path = $5, is_active = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(account.id)
        .bind(&account.bank_name)
        .bind(&account.merchant_name)
        .bind(&account.account_number)
        .bind(&account.qr_image_path)
        .bind(account.is_active)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_program(&self, program: &DonationProgram) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO donation_programs (name, slug, description, target_amount_cents,
                                           current_amount_cents, starts_on, ends_on, status,
                                           qris_account_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&program.name)
        .bind(&program.slug)
        .bind(&program.description)
        .bind(program.target_amount_cents)
        .bind(program.current_amount_cents)
        .bind(program.starts_on)
        .bind(program.ends_on)
        .bind(program.status.as_str())
        .bind(program.qris_account_id)
        .bind(program.created_at)
        .bind(program.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_program(&self, id: i64) -> Result<Option<DonationProgram>> {
        let row = sqlx::query_as::<_, PgDonationProgramRow>(
            "SELECT * FROM donation_programs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;
        domain(row)
    }

    async fn update_program(&self, program: &DonationProgram) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE donation_programs
            SET name = $2, slug = $3, description = $4, target_amount_cents = $5,
                current_amount_cents = $6, starts_on = $7, ends_on = $8, status = $9,
                qris_account_id = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(program.id)
        .bind(&program.name)
        .bind(&program.slug)
        .bind(&program.description)
        .bind(program.target_amount_cents)
        .bind(program.current_amount_cents)
        .bind(program.starts_on)
        .bind(program.ends_on)
        .bind(program.status.as_str())
        .bind(program.qris_account_id)
        .bind(program.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_manual_entry(&self, entry: &ManualDonationEntry) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO manual_donation_entries (program_id, account_id, donor_name,
                                                 amount_cents, donated_on, note, is_verified,
                                                 verified_by, verified_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(entry.program_id)
        .bind(entry.account_id)
        .bind(&entry.donor_name)
        .bind(entry.amount_cents)
        .bind(entry.donated_on)
        .bind(&entry.note)
        .bind(entry.is_verified)
        .bind(entry.verified_by)
        .bind(entry.verified_at)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_manual_entry(&self, id: i64) -> Result<Option<ManualDonationEntry>> {
        let row = sqlx::query_as::<_, PgManualDonationEntryRow>(
            "SELECT * FROM manual_donation_entries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;
        domain(row)
    }

    async fn update_manual_entry(&self, entry: &ManualDonationEntry) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE manual_donation_entries
            SET account_id = $2, donor_name = $3, amount_cents = $4, donated_on = $5,
                note = $6, is_verified = $7, verified_by = $8, verified_at = $9,
                updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(entry.id)
        .bind(entry.account_id)
        .bind(&entry.donor_name)
        .bind(entry.amount_cents)
        .bind(entry.donated_on)
        .bind(&entry.note)
        .bind(entry.is_verified)
        .bind(entry.verified_by)
        .bind(entry.verified_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn verify_entry(
        &self,
        entry_id: i64,
        verifier_id: i64,
        verified_at: DateTime<Utc>,
    ) -> Result<Option<ManualDonationEntry>> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        // The is_verified guard makes concurrent verifications settle to
        // exactly one winner; the loser sees zero rows and rolls back.
        let row = sqlx::query_as::<_, PgManualDonationEntryRow>(
            r#"
            UPDATE manual_donation_entries
            SET is_verified = TRUE, verified_by = $2, verified_at = $3, updated_at = $3
            WHERE id = $1 AND is_verified = FALSE
            RETURNING *
            "#,
        )
        .bind(entry_id)
        .bind(verifier_id)
        .bind(verified_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db)?;
        let Some(row) = row else {
            return Ok(None);
        };
        sqlx::query(
            r#"
            UPDATE donation_programs
            SET current_amount_cents = current_amount_cents + $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(row.program_id)
        .bind(row.amount_cents)
        .bind(verified_at)
        .execute(&mut *tx)
        .await
        .map_err(db)?;
        tx.commit().await.map_err(db)?;
        domain(Some(row))
    }

    async fn insert_donor_registration(&self, registration: &DonorRegistration) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO donor_registrations (program_id, user_id, donor_name, amount_cents,
                                             is_anonymous, is_verified, message,
                                             created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(registration.program_id)
        .bind(registration.user_id)
        .bind(&registration.donor_name)
        .bind(registration.amount_cents)
        .bind(registration.is_anonymous)
        .bind(registration.is_verified)
        .bind(&registration.message)
        .bind(registration.created_at)
        .bind(registration.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_donor_registration(&self, id: i64) -> Result<Option<DonorRegistration>> {
        let row = sqlx::query_as::<_, PgDonorRegistrationRow>(
            "SELECT * FROM donor_registrations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;
        domain(row)
    }

    async fn update_donor_registration(&self, registration: &DonorRegistration) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE donor_registrations
            SET donor_name = $2, amount_cents = $3, is_anonymous = $4, is_verified = $5,
                message = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(registration.id)
        .bind(&registration.donor_name)
        .bind(registration.amount_cents)
        .bind(registration.is_anonymous)
        .bind(registration.is_verified)
        .bind(&registration.message)
        .bind(registration.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_report(&self, report: &DonationReport) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO donation_reports (program_id, period_start, period_end,
                                          total_received_cents, total_used_cents, report_file,
                                          is_published, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(report.program_id)
        .bind(report.period_start)
        .bind(report.period_end)
        .bind(report.total_received_cents)
        .bind(report.total_used_cents)
        .bind(&report.report_file)
        .bind(report.is_published)
        .bind(report.created_at)
        .bind(report.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    async fn get_report(&self, id: i64) -> Result<Option<DonationReport>> {
        let row = sqlx::query_as::<_, PgDonationReportRow>(
            "SELECT * FROM donation_reports WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;
        domain(row)
    }

    async fn update_report(&self, report: &DonationReport) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE donation_reports
            SET period_start = $2, period_end = $3, total_received_cents = $4,
                total_used_cents = $5, report_file = $6, is_published = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(report.id)
        .bind(report.period_start)
        .bind(report.period_end)
        .bind(report.total_received_cents)
        .bind(report.total_used_cents)
        .bind(&report.report_file)
        .bind(report.is_published)
        .bind(report.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::mask_database_url;

    #[test]
    fn masks_credentials_in_url() {
        assert_eq!(
            mask_database_url("postgresql://user:secret@db:5432/alumni"),
            "postgresql://***@db:5432/alumni"
        );
        assert_eq!(
            mask_database_url("postgresql://localhost:5432/alumni"),
            "postgresql://localhost:5432/alumni"
        );
    }
}
