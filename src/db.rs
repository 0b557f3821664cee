//! SQLite lookup table mapping captured commands to their device.
//!
//! One row per captured command keyed by (location, device_type,
//! device_name, command_id), with three non-unique lookup indexes. Schema
//! is created on first use; inserts for a session are batched in a single
//! transaction.

use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::info;

const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS IrCommandLookup (
    id integer PRIMARY KEY,
    location text NOT NULL,
    device_type text NOT NULL,
    device_name text NOT NULL,
    command_id text NOT NULL
);";

const CREATE_DEVICE_ID_INDEX: &str = "
CREATE INDEX IF NOT EXISTS idx_device_id
ON IrCommandLookup (location, device_type, device_name);";

const CREATE_DEVICE_NAME_INDEX: &str = "
CREATE INDEX IF NOT EXISTS idx_device_name
ON IrCommandLookup (device_name);";

const CREATE_TYPE_COMMAND_INDEX: &str = "
CREATE INDEX IF NOT EXISTS idx_type_command_id
ON IrCommandLookup (location, device_type, command_id);";

/// Remote identifier decomposed into its lookup-table columns.
///
/// A database-bound remote is named `<location>.<device_type>`; the
/// device name is derived by joining both with `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId {
    pub location: String,
    pub device_type: String,
    pub device_name: String,
}

impl DeviceId {
    pub fn from_remote(remote: &str) -> Result<Self> {
        let Some((location, device_type)) = remote.split_once('.') else {
            bail!("--database requires the remote to be named <location>.<device_type>, got '{remote}'");
        };
        if location.is_empty() || device_type.is_empty() || device_type.contains('.') {
            bail!("--database requires the remote to be named <location>.<device_type>, got '{remote}'");
        }
        Ok(Self {
            location: location.to_string(),
            device_type: device_type.to_string(),
            device_name: format!("{location}-{device_type}"),
        })
    }
}

/// Handle over the lookup database.
pub struct CommandStore {
    conn: Connection,
}

impl CommandStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database '{}'", path.display()))?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    fn ensure_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(&format!(
                "{CREATE_TABLE}{CREATE_DEVICE_ID_INDEX}{CREATE_DEVICE_NAME_INDEX}{CREATE_TYPE_COMMAND_INDEX}"
            ))
            .context("failed to create IrCommandLookup schema")
    }

    /// Insert one row per command for this device, all in one transaction.
    pub fn insert_commands<'a>(
        &mut self,
        device: &DeviceId,
        commands: impl Iterator<Item = &'a str>,
    ) -> Result<usize> {
        let tx = self
            .conn
            .transaction()
            .context("failed to open insert transaction")?;
        let mut inserted = 0usize;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO IrCommandLookup \
                     (location, device_type, device_name, command_id) \
                     VALUES (?1, ?2, ?3, ?4)",
                )
                .context("failed to prepare insert statement")?;
            for command in commands {
                stmt.execute(params![
                    device.location,
                    device.device_type,
                    device.device_name,
                    command,
                ])
                .with_context(|| format!("failed to insert command '{command}'"))?;
                inserted += 1;
            }
        }
        tx.commit().context("failed to commit command inserts")?;
        info!(
            inserted,
            device = %device.device_name,
            "saved command lookup rows"
        );
        Ok(inserted)
    }

    #[cfg(test)]
    fn command_ids(&self, device_name: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT command_id FROM IrCommandLookup WHERE device_name = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![device_name], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_remote_into_device_id() {
        let device = DeviceId::from_remote("livingroom.aircon").unwrap();
        assert_eq!(device.location, "livingroom");
        assert_eq!(device.device_type, "aircon");
        assert_eq!(device.device_name, "livingroom-aircon");
    }

    #[test]
    fn rejects_remote_without_separator() {
        assert!(DeviceId::from_remote("aircon").is_err());
        assert!(DeviceId::from_remote(".aircon").is_err());
        assert!(DeviceId::from_remote("livingroom.").is_err());
        assert!(DeviceId::from_remote("a.b.c").is_err());
    }

    #[test]
    fn inserts_one_row_per_command() {
        let mut store = CommandStore::open_in_memory().unwrap();
        let device = DeviceId::from_remote("livingroom.aircon").unwrap();
        let commands = ["power", "temp-up", "temp-down"];
        let inserted = store
            .insert_commands(&device, commands.iter().copied())
            .unwrap();
        assert_eq!(inserted, 3);
        assert_eq!(store.command_ids("livingroom-aircon").unwrap(), commands);
    }

    #[test]
    fn schema_creation_is_idempotent() {
        let store = CommandStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
    }
}
