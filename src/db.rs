use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rusqlite::{Connection, OptionalExtension, params};

use crate::models::{ArticleEnvelope, Website};

const SCHEMA_SQL: &str = include_str!("../schema.sql");

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("Failed to open DB at {}", path.display()))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL).context("Failed to initialize schema")?;

        Ok(Db { conn })
    }

    /// Id of the website registered under `website.name`, inserting it on
    /// first sight. Calling it again with the same name returns the same id.
    pub fn get_or_create_website(&self, website: &Website) -> Result<i64> {
        let existing = self
            .conn
            .query_row("SELECT id FROM websites WHERE name = ?", [&website.name], |row| {
                row.get::<_, i64>(0)
            })
            .optional()?;

        if let Some(id) = existing {
            info!("Website already exists, using existing ID.");
            return Ok(id);
        }

        self.conn.execute(
            "INSERT INTO websites (name, link, title, description, inserted_at) VALUES (?, ?, ?, ?, ?)",
            params![
                &website.name,
                &website.link,
                &website.title,
                &website.description,
                &website.inserted_at.to_rfc3339(),
            ],
        )?;
        info!("New website inserted.");

        Ok(self.conn.last_insert_rowid())
    }

    pub fn create_run(&self) -> Result<i64> {
        self.conn.execute("INSERT INTO runs DEFAULT VALUES;", [])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Stores the whole batch in one transaction; either every article is
    /// written or none is.
    pub fn insert_articles(&mut self, run_id: i64, articles: &[ArticleEnvelope]) -> Result<usize> {
        let tx = self.conn.transaction()?;

        let mut stmt = tx.prepare(
            "INSERT INTO articles (
                run_id, website_id, link, title, publication_date, author, description, categories, media
            ) VALUES (
                ?, ?, ?, ?, ?, ?, ?, ?, ?
            )",
        )?;

        for envelope in articles {
            let article = &envelope.article;
            let record = &article.record;
            stmt.execute(params![
                run_id,
                article.website_id,
                &record.link,
                &record.title,
                &record.publication_date,
                &record.author,
                &record.description,
                serde_json::to_string(&record.categories)?,
                serde_json::to_string(&record.media)?,
            ])
            .with_context(|| format!("Failed to insert article {}", record.link))?;
        }

        drop(stmt);
        tx.commit().context("Failed to commit articles")?;

        Ok(articles.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AUTHOR, ArticleRecord, SiteSummary};
    use chrono::Utc;

    fn open() -> Db {
        Db::open(Path::new(":memory:")).unwrap()
    }

    fn record(link: &str) -> ArticleRecord {
        ArticleRecord {
            link: link.to_string(),
            title: "Title".to_string(),
            publication_date: Some("2024-01-15 00:00:00".to_string()),
            author: AUTHOR.to_string(),
            description: "Body".to_string(),
            categories: vec!["Vigo".to_string(), "Cultura".to_string()],
            media: vec![],
        }
    }

    #[test]
    fn test_get_or_create_website_is_idempotent() {
        let db = open();
        let summary = SiteSummary {
            title: "Xornal Vigo".to_string(),
            description: "Noticias".to_string(),
        };
        let website = Website::new("https://xornal.test/vigo/", Some(&summary), Utc::now());

        let first = db.get_or_create_website(&website).unwrap();
        let second = db.get_or_create_website(&Website::new("https://elsewhere.test", None, Utc::now())).unwrap();
        assert_eq!(first, second);

        let title: Option<String> = db
            .conn
            .query_row("SELECT title FROM websites WHERE id = ?", [first], |row| row.get(0))
            .unwrap();
        assert_eq!(title.as_deref(), Some("Xornal Vigo"));
    }

    #[test]
    fn test_insert_articles_for_run() {
        let mut db = open();
        let run_id = db.create_run().unwrap();
        let batch = vec![
            ArticleEnvelope::new(record("https://xornal.test/a"), 7),
            ArticleEnvelope::new(record("https://xornal.test/b"), 7),
        ];

        assert_eq!(db.insert_articles(run_id, &batch).unwrap(), 2);

        let mut stmt = db
            .conn
            .prepare("SELECT link, website_id, categories, publication_date FROM articles WHERE run_id = ? ORDER BY id")
            .unwrap();
        let rows: Vec<(String, i64, String, Option<String>)> = stmt
            .query_map([run_id], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, "https://xornal.test/a");
        assert_eq!(rows[0].1, 7);
        assert_eq!(rows[0].2, r#"["Vigo","Cultura"]"#);
        assert_eq!(rows[1].3.as_deref(), Some("2024-01-15 00:00:00"));
    }

    #[test]
    fn test_articles_require_an_existing_run() {
        let mut db = open();
        let batch = vec![ArticleEnvelope::new(record("https://xornal.test/a"), 0)];

        assert!(db.insert_articles(42, &batch).is_err());

        let count: i64 = db.conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0)).unwrap();
        assert_eq!(count, 0);
    }
}
