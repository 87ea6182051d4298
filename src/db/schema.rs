//! Database schema and migrations for deptstock.
//!
//! Migrations are applied in order when the database is opened; the
//! `schema_version` table records how many have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: departments, users, items
    r#"
CREATE TABLE departments (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name    TEXT NOT NULL
);

CREATE TABLE users (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    username        TEXT NOT NULL UNIQUE,
    email           TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password        TEXT NOT NULL,           -- Argon2 hash
    department_id   INTEGER NOT NULL REFERENCES departments(id),
    job_id          TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE INDEX idx_users_department_id ON users(department_id);

CREATE TABLE items (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,
    quantity        INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
    condition       TEXT NOT NULL DEFAULT '',
    department_id   INTEGER NOT NULL REFERENCES departments(id),
    last_updated    TEXT NOT NULL
);

CREATE INDEX idx_items_department_id ON items(department_id);
"#,
];
