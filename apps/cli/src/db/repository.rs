//! Repository pattern for database access.

use crate::db::date_utils::{parse_timestamp, to_db_string};
use crate::db::error::DbError;
use chrono::{DateTime, Utc};
use dhammapada_core::types::{AppSettings, RawVerse, ReadStatus, Verse};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

const VERSE_COLUMNS: &str = "id, category, title, content, my_content, created_at, reg_date, \
    write_date, url, read_count, read_time, bookmark, status, accuracy";

/// Repository for verse operations.
pub trait VerseRepository {
    fn insert_verses(&self, category: &str, raw_verses: &[RawVerse]) -> Result<Vec<i64>>;
    /// Insert the initial verses and record that seeding happened, atomically.
    fn seed_verses(&self, category: &str, raw_verses: &[RawVerse]) -> Result<Vec<i64>>;
    fn get_verse(&self, id: i64) -> Result<Option<Verse>>;
    fn get_next_verse(&self, after_id: i64) -> Result<Option<Verse>>;
    fn get_previous_verse(&self, before_id: i64) -> Result<Option<Verse>>;
    fn get_last_verse(&self) -> Result<Option<Verse>>;
    fn list_verses(&self) -> Result<Vec<Verse>>;
    fn search_verses(&self, query: &str) -> Result<Vec<Verse>>;
    fn set_bookmark(&self, id: i64, bookmarked: bool) -> Result<()>;
    fn mark_read(&self, id: i64) -> Result<()>;
    fn save_writing(&self, id: i64, my_content: &str, accuracy: f64) -> Result<bool>;
    fn count_verses(&self) -> Result<usize>;
}

/// Repository for reader preferences.
pub trait SettingsRepository {
    fn get_settings(&self) -> Result<AppSettings>;
    fn save_settings(&self, settings: &AppSettings) -> Result<()>;
}

/// Repository for the reading position and install metadata.
pub trait ReadingRepository {
    fn get_read_index(&self) -> Result<i64>;
    fn set_read_index(&self, id: i64) -> Result<()>;
    fn is_seeded(&self) -> Result<bool>;
    fn installed_at(&self) -> Result<DateTime<Utc>>;
}

/// Reading statistics.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReadingStats {
    pub total_verses: usize,
    pub read_verses: usize,
    pub written_verses: usize,
    pub bookmarked_verses: usize,
    pub total_reads: usize,
    /// Mean accuracy over written verses, 0.0 if none.
    pub average_accuracy: f64,
}

/// Repository for statistics operations.
pub trait StatsRepository {
    fn get_stats(&self) -> Result<ReadingStats>;
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute_batch(super::schema::INIT_SETTINGS)?;
        self.conn.execute(
            super::schema::INIT_READING_STATE,
            params![to_db_string(&Utc::now())],
        )?;
        Ok(())
    }

    fn query_one(&self, sql: &str, params: impl rusqlite::Params) -> Result<Option<Verse>> {
        self.conn
            .query_row(sql, params, Self::row_to_verse)
            .optional()
            .map_err(Into::into)
    }

    fn query_many(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Verse>> {
        let mut stmt = self.conn.prepare(sql)?;
        let verses = stmt
            .query_map(params, Self::row_to_verse)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(verses)
    }

    fn row_to_verse(row: &rusqlite::Row) -> rusqlite::Result<Verse> {
        Ok(Verse {
            id: row.get(0)?,
            category: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            my_content: row.get(4)?,
            created_at: Self::required_timestamp(row, 5)?,
            reg_date: Self::required_timestamp(row, 6)?,
            write_date: row.get::<_, Option<String>>(7)?.and_then(|s| parse_timestamp(&s)),
            url: row.get(8)?,
            read_count: row.get(9)?,
            read_time: row.get::<_, Option<String>>(10)?.and_then(|s| parse_timestamp(&s)),
            bookmarked: row.get::<_, i64>(11)? != 0,
            status: ReadStatus::from_db(&row.get::<_, String>(12)?),
            accuracy: row.get(13)?,
        })
    }

    fn required_timestamp(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
        let raw: String = row.get(idx)?;
        parse_timestamp(&raw).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                Type::Text,
                Box::new(DbError::InvalidData(format!("bad timestamp '{}'", raw))),
            )
        })
    }

    fn ensure_updated(id: i64, rows: usize) -> Result<()> {
        if rows == 0 {
            Err(DbError::VerseNotFound(id))
        } else {
            Ok(())
        }
    }
}

/// Escape LIKE wildcards so the query matches literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn insert_rows(conn: &Connection, category: &str, raw_verses: &[RawVerse]) -> Result<Vec<i64>> {
    let now = to_db_string(&Utc::now());
    let mut stmt = conn.prepare(
        "INSERT INTO verses (category, title, content, url, created_at, reg_date, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5, 'unread')",
    )?;

    let mut ids = Vec::with_capacity(raw_verses.len());
    for raw in raw_verses {
        stmt.execute(params![category, raw.title, raw.body, raw.url, now])?;
        ids.push(conn.last_insert_rowid());
    }
    Ok(ids)
}

impl VerseRepository for SqliteRepository {
    fn insert_verses(&self, category: &str, raw_verses: &[RawVerse]) -> Result<Vec<i64>> {
        let tx = self.conn.unchecked_transaction()?;
        let ids = insert_rows(&tx, category, raw_verses)?;
        tx.commit()?;
        Ok(ids)
    }

    fn seed_verses(&self, category: &str, raw_verses: &[RawVerse]) -> Result<Vec<i64>> {
        let tx = self.conn.unchecked_transaction()?;
        let ids = insert_rows(&tx, category, raw_verses)?;
        tx.execute(
            "UPDATE reading_state SET seeded_at = ?1 WHERE id = 1",
            params![to_db_string(&Utc::now())],
        )?;
        tx.commit()?;
        Ok(ids)
    }

    fn get_verse(&self, id: i64) -> Result<Option<Verse>> {
        let sql = format!("SELECT {} FROM verses WHERE id = ?1", VERSE_COLUMNS);
        self.query_one(&sql, params![id])
    }

    fn get_next_verse(&self, after_id: i64) -> Result<Option<Verse>> {
        let sql = format!(
            "SELECT {} FROM verses WHERE id > ?1 ORDER BY id ASC LIMIT 1",
            VERSE_COLUMNS
        );
        self.query_one(&sql, params![after_id])
    }

    fn get_previous_verse(&self, before_id: i64) -> Result<Option<Verse>> {
        let sql = format!(
            "SELECT {} FROM verses WHERE id < ?1 ORDER BY id DESC LIMIT 1",
            VERSE_COLUMNS
        );
        self.query_one(&sql, params![before_id])
    }

    fn get_last_verse(&self) -> Result<Option<Verse>> {
        let sql = format!("SELECT {} FROM verses ORDER BY id DESC LIMIT 1", VERSE_COLUMNS);
        self.query_one(&sql, [])
    }

    fn list_verses(&self) -> Result<Vec<Verse>> {
        let sql = format!("SELECT {} FROM verses ORDER BY id", VERSE_COLUMNS);
        self.query_many(&sql, [])
    }

    fn search_verses(&self, query: &str) -> Result<Vec<Verse>> {
        let sql = format!(
            "SELECT {} FROM verses
             WHERE title LIKE ?1 ESCAPE '\\' OR content LIKE ?1 ESCAPE '\\'
             ORDER BY id",
            VERSE_COLUMNS
        );
        self.query_many(&sql, params![like_pattern(query)])
    }

    fn set_bookmark(&self, id: i64, bookmarked: bool) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE verses SET bookmark = ?1 WHERE id = ?2",
            params![bookmarked as i64, id],
        )?;
        Self::ensure_updated(id, rows)
    }

    fn mark_read(&self, id: i64) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE verses SET read_count = read_count + 1, read_time = ?1, status = 'read' WHERE id = ?2",
            params![to_db_string(&Utc::now()), id],
        )?;
        Self::ensure_updated(id, rows)
    }

    fn save_writing(&self, id: i64, my_content: &str, accuracy: f64) -> Result<bool> {
        // Only the first completed copy is kept.
        let rows = self.conn.execute(
            "UPDATE verses SET write_date = ?1, my_content = ?2, accuracy = ?3
             WHERE id = ?4 AND write_date IS NULL",
            params![to_db_string(&Utc::now()), my_content, accuracy, id],
        )?;
        Ok(rows > 0)
    }

    fn count_verses(&self) -> Result<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM verses", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

impl SettingsRepository for SqliteRepository {
    fn get_settings(&self) -> Result<AppSettings> {
        self.conn
            .query_row(
                "SELECT use_tts, use_writing, font_size_large FROM app_settings WHERE id = 1",
                [],
                |row| {
                    Ok(AppSettings {
                        use_tts: row.get::<_, i64>(0)? != 0,
                        use_writing: row.get::<_, i64>(1)? != 0,
                        font_size_large: row.get::<_, i64>(2)? != 0,
                    })
                },
            )
            .map_err(Into::into)
    }

    fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.conn.execute(
            "UPDATE app_settings SET use_tts = ?1, use_writing = ?2, font_size_large = ?3 WHERE id = 1",
            params![
                settings.use_tts as i64,
                settings.use_writing as i64,
                settings.font_size_large as i64,
            ],
        )?;
        Ok(())
    }
}

impl ReadingRepository for SqliteRepository {
    fn get_read_index(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT read_index FROM reading_state WHERE id = 1", [], |row| row.get(0))
            .map_err(Into::into)
    }

    fn set_read_index(&self, id: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE reading_state SET read_index = ?1 WHERE id = 1",
            params![id],
        )?;
        Ok(())
    }

    fn is_seeded(&self) -> Result<bool> {
        let seeded_at: Option<String> = self.conn.query_row(
            "SELECT seeded_at FROM reading_state WHERE id = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(seeded_at.is_some())
    }

    fn installed_at(&self) -> Result<DateTime<Utc>> {
        let raw: String = self.conn.query_row(
            "SELECT installed_at FROM reading_state WHERE id = 1",
            [],
            |row| row.get(0),
        )?;
        parse_timestamp(&raw).ok_or_else(|| DbError::InvalidData(format!("bad install time '{}'", raw)))
    }
}

impl StatsRepository for SqliteRepository {
    fn get_stats(&self) -> Result<ReadingStats> {
        self.conn
            .query_row(
                "SELECT
                    COUNT(*),
                    COALESCE(SUM(CASE WHEN read_count > 0 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN write_date IS NOT NULL THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN bookmark != 0 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(read_count), 0),
                    COALESCE(AVG(CASE WHEN write_date IS NOT NULL THEN accuracy END), 0.0)
                 FROM verses",
                [],
                |row| {
                    Ok(ReadingStats {
                        total_verses: row.get(0)?,
                        read_verses: row.get(1)?,
                        written_verses: row.get(2)?,
                        bookmarked_verses: row.get(3)?,
                        total_reads: row.get(4)?,
                        average_accuracy: row.get(5)?,
                    })
                },
            )
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(title: &str, body: &str) -> RawVerse {
        RawVerse {
            title: title.to_string(),
            body: body.to_string(),
            url: String::new(),
        }
    }

    fn seeded() -> SqliteRepository {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.insert_verses(
            "법구경",
            &[
                raw("Twin Verses 1", "Mind is the forerunner of all states."),
                raw("Twin Verses 2", "Hatred is never appeased by hatred."),
                raw("Heedfulness 21", "Heedfulness is the path to the deathless."),
            ],
        )
        .unwrap();
        repo
    }

    #[test]
    fn test_insert_and_get() {
        let repo = seeded();
        assert_eq!(repo.count_verses().unwrap(), 3);

        let verse = repo.get_verse(1).unwrap().unwrap();
        assert_eq!(verse.title, "Twin Verses 1");
        assert_eq!(verse.category, "법구경");
        assert_eq!(verse.status, ReadStatus::Unread);
        assert_eq!(verse.read_count, 0);
        assert!(!verse.bookmarked);
        assert!(!verse.is_written());
        assert!(repo.get_verse(99).unwrap().is_none());
    }

    #[test]
    fn test_navigation_queries() {
        let repo = seeded();
        assert_eq!(repo.get_next_verse(0).unwrap().unwrap().id, 1);
        assert_eq!(repo.get_next_verse(1).unwrap().unwrap().id, 2);
        assert!(repo.get_next_verse(3).unwrap().is_none());
        assert_eq!(repo.get_previous_verse(3).unwrap().unwrap().id, 2);
        assert!(repo.get_previous_verse(1).unwrap().is_none());
        assert_eq!(repo.get_last_verse().unwrap().unwrap().id, 3);
    }

    #[test]
    fn test_search() {
        let repo = seeded();
        let hits = repo.search_verses("hatred").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);

        let hits = repo.search_verses("Twin").unwrap();
        assert_eq!(hits.iter().map(|v| v.id).collect::<Vec<_>>(), vec![1, 2]);

        // wildcards are literal
        assert!(repo.search_verses("%").unwrap().is_empty());
        assert!(repo.search_verses("_").unwrap().is_empty());
    }

    #[test]
    fn test_bookmark() {
        let repo = seeded();
        repo.set_bookmark(2, true).unwrap();
        assert!(repo.get_verse(2).unwrap().unwrap().bookmarked);
        repo.set_bookmark(2, false).unwrap();
        assert!(!repo.get_verse(2).unwrap().unwrap().bookmarked);
        assert!(matches!(repo.set_bookmark(42, true), Err(DbError::VerseNotFound(42))));
    }

    #[test]
    fn test_mark_read() {
        let repo = seeded();
        repo.mark_read(1).unwrap();
        repo.mark_read(1).unwrap();
        let verse = repo.get_verse(1).unwrap().unwrap();
        assert_eq!(verse.read_count, 2);
        assert_eq!(verse.status, ReadStatus::Read);
        assert!(verse.read_time.is_some());
        assert!(matches!(repo.mark_read(7), Err(DbError::VerseNotFound(7))));
    }

    #[test]
    fn test_save_writing_only_once() {
        let repo = seeded();
        assert!(repo.save_writing(1, "first copy", 72.5).unwrap());
        assert!(!repo.save_writing(1, "second copy", 99.0).unwrap());

        let verse = repo.get_verse(1).unwrap().unwrap();
        assert!(verse.is_written());
        assert_eq!(verse.my_content.as_deref(), Some("first copy"));
        assert_eq!(verse.accuracy, 72.5);
    }

    #[test]
    fn test_settings_defaults_and_save() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert_eq!(repo.get_settings().unwrap(), AppSettings::default());

        let settings = AppSettings {
            use_tts: true,
            use_writing: false,
            font_size_large: true,
        };
        repo.save_settings(&settings).unwrap();
        assert_eq!(repo.get_settings().unwrap(), settings);
    }

    #[test]
    fn test_reading_state() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert_eq!(repo.get_read_index().unwrap(), 0);
        assert!(!repo.is_seeded().unwrap());

        repo.set_read_index(5).unwrap();
        assert_eq!(repo.get_read_index().unwrap(), 5);
        assert!(repo.installed_at().unwrap() <= Utc::now());
    }

    #[test]
    fn test_seed_verses_marks_seeded() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let ids = repo
            .seed_verses("법구경", &[raw("One", "first"), raw("Two", "second")])
            .unwrap();
        assert_eq!(ids, vec![1, 2]);
        assert!(repo.is_seeded().unwrap());

        // plain inserts leave the seeded flag alone
        let other = SqliteRepository::open_in_memory().unwrap();
        other.insert_verses("법구경", &[raw("One", "first")]).unwrap();
        assert!(!other.is_seeded().unwrap());
    }

    #[test]
    fn test_seed_verses_rolls_back_on_failure() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.conn.execute_batch("DROP TABLE reading_state;").unwrap();

        assert!(repo.seed_verses("법구경", &[raw("One", "first")]).is_err());
        assert_eq!(repo.count_verses().unwrap(), 0);
    }

    #[test]
    fn test_stats() {
        let repo = seeded();
        let empty = repo.get_stats().unwrap();
        assert_eq!(empty.total_verses, 3);
        assert_eq!(empty.read_verses, 0);
        assert_eq!(empty.average_accuracy, 0.0);

        repo.mark_read(1).unwrap();
        repo.mark_read(1).unwrap();
        repo.mark_read(2).unwrap();
        repo.set_bookmark(3, true).unwrap();
        repo.save_writing(1, "a", 80.0).unwrap();
        repo.save_writing(2, "b", 60.0).unwrap();

        let stats = repo.get_stats().unwrap();
        assert_eq!(stats.read_verses, 2);
        assert_eq!(stats.total_reads, 3);
        assert_eq!(stats.written_verses, 2);
        assert_eq!(stats.bookmarked_verses, 1);
        assert_eq!(stats.average_accuracy, 70.0);
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("a%b_c"), "%a\\%b\\_c%");
    }
}
