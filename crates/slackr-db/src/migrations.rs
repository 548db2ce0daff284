use anyhow::Result;
use rusqlite::Connection;
use tracing::debug;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS session (
            key         TEXT PRIMARY KEY,
            value       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS cache (
            key         TEXT PRIMARY KEY,
            payload     TEXT NOT NULL,
            cached_at   TEXT NOT NULL
        );
        ",
    )?;

    debug!("Local store migrations complete");
    Ok(())
}
