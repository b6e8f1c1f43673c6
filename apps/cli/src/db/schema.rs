//! SQLite schema definitions.

/// Complete schema for the local SQLite database.
pub const SCHEMA: &str = r#"
-- Verses
CREATE TABLE IF NOT EXISTS verses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    my_content TEXT,
    created_at TEXT NOT NULL,
    reg_date TEXT NOT NULL,
    write_date TEXT,
    url TEXT NOT NULL DEFAULT '',
    read_count INTEGER NOT NULL DEFAULT 0,
    read_time TEXT,
    bookmark INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'unread',
    accuracy REAL NOT NULL DEFAULT 0.0
);

-- Reader preferences
CREATE TABLE IF NOT EXISTS app_settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    use_tts INTEGER NOT NULL DEFAULT 0,
    use_writing INTEGER NOT NULL DEFAULT 1,
    font_size_large INTEGER NOT NULL DEFAULT 0
);

-- Reading position and install metadata
CREATE TABLE IF NOT EXISTS reading_state (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    read_index INTEGER NOT NULL DEFAULT 0,
    seeded_at TEXT,
    installed_at TEXT NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_verses_write_date ON verses(write_date);
CREATE INDEX IF NOT EXISTS idx_verses_bookmark ON verses(bookmark);
"#;

/// Initialize settings if not exists.
pub const INIT_SETTINGS: &str = r#"
INSERT OR IGNORE INTO app_settings (id) VALUES (1);
"#;

/// Initialize reading state if not exists. Bound parameter: install time.
pub const INIT_READING_STATE: &str = r#"
INSERT OR IGNORE INTO reading_state (id, read_index, installed_at) VALUES (1, 0, ?1)
"#;
