//! Database schema and migrations for Filebox.
//!
//! Migrations are applied sequentially when the database is first opened
//! or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: File metadata
    r#"
-- One row per stored file; the blob itself lives on the filesystem at file_path
CREATE TABLE file_info (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    file_name       TEXT NOT NULL,
    file_path       TEXT NOT NULL,
    file_extension  TEXT NOT NULL,
    file_size       INTEGER NOT NULL
);

-- Duplicate lookup by (name, size); non-unique
CREATE INDEX idx_file_info_name_size ON file_info(file_name, file_size);
"#,
];
