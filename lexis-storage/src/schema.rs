use rusqlite::Connection;

pub(crate) const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS vocabulary (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
        namespace_uri TEXT NOT NULL UNIQUE,
        prefix TEXT NOT NULL UNIQUE,
        label TEXT NOT NULL,
        comment TEXT
    );

    CREATE TABLE IF NOT EXISTS resource_class (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
        vocabulary_id INTEGER NOT NULL REFERENCES vocabulary(id) ON DELETE CASCADE,
        local_name TEXT NOT NULL,
        label TEXT NOT NULL,
        comment TEXT,
        UNIQUE(vocabulary_id, local_name)
    );

    CREATE TABLE IF NOT EXISTS property (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
        vocabulary_id INTEGER NOT NULL REFERENCES vocabulary(id) ON DELETE CASCADE,
        local_name TEXT NOT NULL,
        label TEXT NOT NULL,
        comment TEXT,
        UNIQUE(vocabulary_id, local_name)
    );

    CREATE INDEX IF NOT EXISTS idx_resource_class_vocabulary ON resource_class(vocabulary_id);
    CREATE INDEX IF NOT EXISTS idx_property_vocabulary ON property(vocabulary_id);
";

pub(crate) fn init(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}
