use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use crate::error::SourceError;
use crate::post::RawPost;
use crate::source::PostSource;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS forums (
    name TEXT PRIMARY KEY COLLATE NOCASE
);
CREATE TABLE IF NOT EXISTS posts (
    id TEXT NOT NULL,
    forum TEXT NOT NULL COLLATE NOCASE REFERENCES forums(name),
    title TEXT,
    author TEXT NOT NULL DEFAULT '',
    score INTEGER NOT NULL DEFAULT 0,
    num_comments INTEGER NOT NULL DEFAULT 0,
    created_utc INTEGER NOT NULL,
    PRIMARY KEY (forum, id)
);
CREATE INDEX IF NOT EXISTS posts_by_forum_time ON posts (forum, created_utc DESC);
";

/// Archive location: explicit path, then `$POLARIMETER_DB`, then the per-user data dir.
pub fn get_archive_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = env::var("POLARIMETER_DB") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let path = match env::consts::OS {
        "windows" => {
            let local_app_data = env::var("LOCALAPPDATA")?;
            PathBuf::from(local_app_data).join("polarimeter/posts.db")
        }
        "macos" => {
            let home = env::var("HOME")?;
            PathBuf::from(home).join("Library/Application Support/polarimeter/posts.db")
        }
        _ => {
            let home = env::var("HOME").or_else(|_| env::var("USERPROFILE"))?;
            PathBuf::from(home).join(".local/share/polarimeter/posts.db")
        }
    };

    info!(action = "resolve", component = "archive_path", path = ?path, "Post archive path resolved");
    Ok(path)
}

/// Create the archive tables if they are missing.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Failed to create archive schema")
}

/// Insert or replace `posts` under `forum`, creating the archive if needed.
pub fn store_posts(path: &Path, forum: &str, posts: &[RawPost]) -> Result<usize> {
    let start_time = Instant::now();
    info!(action = "start", component = "archive_import", forum = forum, post_count = posts.len(), "Importing posts into archive");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create archive directory {:?}", parent))?;
    }

    let mut conn = Connection::open(path)
        .with_context(|| format!("Failed to open archive at {:?}", path))?;
    init_schema(&conn)?;

    let tx = conn.transaction()?;
    tx.execute("INSERT OR IGNORE INTO forums (name) VALUES (?1)", [forum])?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO posts (id, forum, title, author, score, num_comments, created_utc)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for post in posts {
            stmt.execute(params![
                post.id,
                forum,
                post.title,
                post.author,
                post.score,
                i64::try_from(post.num_comments).unwrap_or(i64::MAX),
                post.created_at.timestamp(),
            ])?;
        }
    }
    tx.commit()?;

    info!(action = "complete", component = "archive_import", forum = forum, duration_ms = start_time.elapsed().as_millis(), "Archive import completed");
    Ok(posts.len())
}

/// Load a JSON array of raw posts and store it under `forum`.
pub fn import_json(archive: &Path, forum: &str, json_path: &Path) -> Result<usize> {
    if !json_path.exists() {
        anyhow::bail!("Import file not found: {:?}", json_path);
    }
    let content = fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read {:?}", json_path))?;
    let posts: Vec<RawPost> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse posts from {:?}", json_path))?;
    store_posts(archive, forum, &posts)
}

/// Replay source backed by a local SQLite archive of posts.
///
/// A fresh read-only connection is opened per fetch, so one source can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct SqlitePostSource {
    path: PathBuf,
}

impl SqlitePostSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, SourceError> {
        if !self.path.exists() {
            return Err(SourceError::Unavailable(format!(
                "archive not found at {}",
                self.path.display()
            )));
        }
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(unavailable)
    }
}

fn unavailable(err: rusqlite::Error) -> SourceError {
    SourceError::Unavailable(err.to_string())
}

impl PostSource for SqlitePostSource {
    fn fetch(&self, forum: &str, limit: usize) -> Result<Vec<RawPost>, SourceError> {
        let start_time = Instant::now();
        info!(action = "start", component = "archive_fetch", forum = forum, limit, "Querying archived posts");

        let conn = self.connect()?;

        let known: Option<String> = conn
            .query_row(
                "SELECT name FROM forums WHERE name = ?1",
                [forum],
                |row| row.get(0),
            )
            .optional()
            .map_err(unavailable)?;
        if known.is_none() {
            return Err(SourceError::NotFound(forum.to_string()));
        }

        let mut stmt = conn
            .prepare(
                "SELECT id, title, author, score, num_comments, created_utc
                 FROM posts WHERE forum = ?1
                 ORDER BY created_utc DESC, id
                 LIMIT ?2",
            )
            .map_err(unavailable)?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let posts = stmt
            .query_map(params![forum, limit], |row| {
                let num_comments: i64 = row.get(4)?;
                let created_utc: i64 = row.get(5)?;
                Ok(RawPost {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    author: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    score: row.get(3)?,
                    num_comments: u64::try_from(num_comments).unwrap_or(0),
                    created_at: DateTime::<Utc>::from_timestamp(created_utc, 0)
                        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
                })
            })
            .map_err(unavailable)?
            .collect::<rusqlite::Result<Vec<RawPost>>>()
            .map_err(unavailable)?;

        info!(
            action = "complete",
            component = "archive_fetch",
            forum = forum,
            post_count = posts.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Archive query completed"
        );
        Ok(posts)
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
