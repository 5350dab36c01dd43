//! SQL schema for the sprint SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` pragma.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS sessions (
    session_id     TEXT PRIMARY KEY,
    question_queue TEXT NOT NULL,               -- JSON array of question ids
    current_index  INTEGER NOT NULL DEFAULT 0,
    original_count INTEGER NOT NULL,
    debt_count     INTEGER NOT NULL DEFAULT 0,
    completed      INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS questions (
    question_id          TEXT PRIMARY KEY,
    question_text        TEXT NOT NULL,
    options              TEXT NOT NULL,         -- JSON array, at most four
    correct_answer_index INTEGER NOT NULL,
    category             TEXT NOT NULL,
    times_attempted      INTEGER NOT NULL DEFAULT 0,
    times_correct        INTEGER NOT NULL DEFAULT 0
);

-- Attempts are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS attempts (
    session_id      TEXT NOT NULL REFERENCES sessions(session_id),
    question_id     TEXT NOT NULL REFERENCES questions(question_id),
    category        TEXT NOT NULL,
    is_correct      INTEGER NOT NULL,
    is_debt_attempt INTEGER NOT NULL,
    recorded_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS review_items (
    item_id            TEXT PRIMARY KEY,
    problem            TEXT NOT NULL,
    solution_steps     TEXT NOT NULL,           -- JSON array; poll options
    flawed_step_number INTEGER NOT NULL,        -- one-based
    error_category     TEXT NOT NULL,
    explanation        TEXT NOT NULL,
    status             TEXT NOT NULL DEFAULT 'pending',
    created_at         TEXT NOT NULL,
    delivered_at       TEXT
);

CREATE TABLE IF NOT EXISTS daily_log (
    problem_id TEXT NOT NULL REFERENCES review_items(item_id),
    logged_at  TEXT NOT NULL,
    caught     INTEGER                          -- NULL until the vote lands
);

CREATE TABLE IF NOT EXISTS settings (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS attempts_session_idx  ON attempts(session_id);
CREATE INDEX IF NOT EXISTS questions_usage_idx   ON questions(times_attempted);
CREATE INDEX IF NOT EXISTS review_status_idx     ON review_items(status);
CREATE INDEX IF NOT EXISTS daily_log_problem_idx ON daily_log(problem_id);

PRAGMA user_version = 1;
";
