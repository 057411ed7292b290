//! SQLite-backed `SequenceStore`.
//!
//! Stops live in a single `stops` table keyed by id and grouped by
//! `route_id`. Index batches run inside one transaction so that a failed
//! batch never leaves a route half renumbered.

use std::fmt;
use std::path::{Path, PathBuf};

use geo::Coord;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use thiserror::Error;

use super::SequenceStore;
use crate::{
    IndexUpdate, ParseStopStatusError, SequenceIndex, SequenceIndexError, Stop, StopStatus,
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS stops (
    id INTEGER PRIMARY KEY,
    route_id INTEGER NOT NULL,
    lat REAL,
    lng REAL,
    status TEXT NOT NULL,
    sequence_index INTEGER
);
CREATE INDEX IF NOT EXISTS stops_route_idx ON stops (route_id);
";

/// Errors raised by [`SqliteSequenceStore`].
#[derive(Debug, Error)]
pub enum SqliteSequenceStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the `stops` table failed.
    #[error("failed to create stops table")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// An identifier could not be represented as an SQLite integer.
    #[error("identifier {id} exceeds SQLite i64 range")]
    IdOutOfRange {
        /// Identifier that failed the conversion.
        id: u64,
    },
    /// A stored identifier was negative.
    #[error("stored identifier {id} is negative")]
    NegativeId {
        /// Identifier read from the database.
        id: i64,
    },
    /// A stored status was not recognised.
    #[error("stop {id} has an invalid status: {source}")]
    InvalidStatus {
        /// Stop whose status failed to parse.
        id: u64,
        /// Parse failure.
        #[source]
        source: ParseStopStatusError,
    },
    /// A stored sequence index failed validation.
    #[error("stop {id} has an invalid sequence index: {source}")]
    InvalidIndex {
        /// Stop whose index failed validation.
        id: u64,
        /// Validation failure.
        #[source]
        source: SequenceIndexError,
    },
    /// An update referenced a stop outside the route.
    #[error("stop {id} does not belong to route {route}")]
    UnknownStop {
        /// Route being updated.
        route: u64,
        /// Unknown stop id.
        id: u64,
    },
    /// Generic SQLite error.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Read-write stop store backed by SQLite.
pub struct SqliteSequenceStore {
    connection: Connection,
}

impl fmt::Debug for SqliteSequenceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteSequenceStore")
            .field("path", &self.connection.path())
            .finish_non_exhaustive()
    }
}

impl SqliteSequenceStore {
    /// Open (creating if needed) a store at `path`.
    pub fn open<P>(path: P) -> Result<Self, SqliteSequenceStoreError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let connection =
            Connection::open(path).map_err(|source| SqliteSequenceStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_connection(connection)
    }

    /// Open a private in-memory store.
    pub fn open_in_memory() -> Result<Self, SqliteSequenceStoreError> {
        let connection = Connection::open_in_memory().map_err(|source| {
            SqliteSequenceStoreError::OpenDatabase {
                path: PathBuf::from(":memory:"),
                source,
            }
        })?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self, SqliteSequenceStoreError> {
        connection
            .execute_batch(SCHEMA)
            .map_err(|source| SqliteSequenceStoreError::CreateSchema { source })?;
        Ok(Self { connection })
    }

    /// Insert or replace `stop` in `route`.
    pub fn insert_stop(&mut self, route: u64, stop: &Stop) -> Result<(), SqliteSequenceStoreError> {
        self.connection.execute(
            "INSERT OR REPLACE INTO stops (id, route_id, lat, lng, status, sequence_index)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                to_sql_id(stop.id)?,
                to_sql_id(route)?,
                stop.lat().is_finite().then_some(stop.lat()),
                stop.lng().is_finite().then_some(stop.lng()),
                stop.status.as_str(),
                stop.sequence_index.map(i64::from),
            ],
        )?;
        Ok(())
    }

    /// Fetch a single stop regardless of route.
    pub fn find_stop(&self, id: u64) -> Result<Option<Stop>, SqliteSequenceStoreError> {
        let row = self
            .connection
            .query_row(
                "SELECT id, lat, lng, status, sequence_index FROM stops WHERE id = ?1",
                params![to_sql_id(id)?],
                read_row,
            )
            .optional()?;
        row.map(StopRow::into_stop).transpose()
    }
}

impl SequenceStore for SqliteSequenceStore {
    type Error = SqliteSequenceStoreError;

    fn load_route(&self, route: u64) -> Result<Vec<Stop>, Self::Error> {
        let mut statement = self.connection.prepare(
            "SELECT id, lat, lng, status, sequence_index FROM stops
             WHERE route_id = ?1
             ORDER BY sequence_index IS NULL, sequence_index, id",
        )?;
        let rows = statement.query_map(params![to_sql_id(route)?], read_row)?;
        rows.map(|row| row.map_err(SqliteSequenceStoreError::from)?.into_stop())
            .collect()
    }

    fn persist_indices(
        &mut self,
        route: u64,
        updates: &[IndexUpdate],
        cleared: &[u64],
    ) -> Result<(), Self::Error> {
        let route_id = to_sql_id(route)?;
        let transaction = self.connection.transaction()?;
        clear_listed(&transaction, route, route_id, cleared)?;
        apply_updates(&transaction, route, route_id, updates)?;
        transaction.commit()?;
        log::debug!(
            "persisted {} index update(s) and {} clear(s) for route {route}",
            updates.len(),
            cleared.len()
        );
        Ok(())
    }

    fn clear_indices(
        &mut self,
        route: u64,
        keep: &dyn Fn(&Stop) -> bool,
    ) -> Result<usize, Self::Error> {
        let stops = self.load_route(route)?;
        let targets: Vec<i64> = stops
            .iter()
            .filter(|stop| stop.sequence_index.is_some() && !keep(stop))
            .map(|stop| to_sql_id(stop.id))
            .collect::<Result<_, _>>()?;

        let transaction = self.connection.transaction()?;
        {
            let mut statement =
                transaction.prepare("UPDATE stops SET sequence_index = NULL WHERE id = ?1")?;
            for id in &targets {
                statement.execute(params![id])?;
            }
        }
        transaction.commit()?;
        Ok(targets.len())
    }
}

fn clear_listed(
    transaction: &Transaction<'_>,
    route: u64,
    route_id: i64,
    cleared: &[u64],
) -> Result<(), SqliteSequenceStoreError> {
    let mut statement = transaction
        .prepare("UPDATE stops SET sequence_index = NULL WHERE id = ?1 AND route_id = ?2")?;
    for &id in cleared {
        if statement.execute(params![to_sql_id(id)?, route_id])? == 0 {
            return Err(SqliteSequenceStoreError::UnknownStop { route, id });
        }
    }
    Ok(())
}

fn apply_updates(
    transaction: &Transaction<'_>,
    route: u64,
    route_id: i64,
    updates: &[IndexUpdate],
) -> Result<(), SqliteSequenceStoreError> {
    let mut statement = transaction
        .prepare("UPDATE stops SET sequence_index = ?1 WHERE id = ?2 AND route_id = ?3")?;
    for update in updates {
        let changed = statement.execute(params![
            i64::from(update.sequence_index),
            to_sql_id(update.id)?,
            route_id
        ])?;
        if changed == 0 {
            // Dropping the transaction without commit rolls the batch back.
            return Err(SqliteSequenceStoreError::UnknownStop {
                route,
                id: update.id,
            });
        }
    }
    Ok(())
}

struct StopRow {
    id: i64,
    lat: Option<f64>,
    lng: Option<f64>,
    status: String,
    sequence_index: Option<i64>,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StopRow> {
    Ok(StopRow {
        id: row.get(0)?,
        lat: row.get(1)?,
        lng: row.get(2)?,
        status: row.get(3)?,
        sequence_index: row.get(4)?,
    })
}

impl StopRow {
    fn into_stop(self) -> Result<Stop, SqliteSequenceStoreError> {
        let id = u64::try_from(self.id)
            .map_err(|_| SqliteSequenceStoreError::NegativeId { id: self.id })?;
        let status = self
            .status
            .parse::<StopStatus>()
            .map_err(|source| SqliteSequenceStoreError::InvalidStatus { id, source })?;
        let sequence_index = self
            .sequence_index
            .map(SequenceIndex::try_from)
            .transpose()
            .map_err(|source| SqliteSequenceStoreError::InvalidIndex { id, source })?;
        let location = Coord {
            x: self.lng.unwrap_or(f64::NAN),
            y: self.lat.unwrap_or(f64::NAN),
        };
        Ok(Stop {
            id,
            location,
            status,
            sequence_index,
        })
    }
}

fn to_sql_id(id: u64) -> Result<i64, SqliteSequenceStoreError> {
    i64::try_from(id).map_err(|_| SqliteSequenceStoreError::IdOutOfRange { id })
}
