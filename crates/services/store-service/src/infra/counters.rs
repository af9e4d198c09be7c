//! Monotonic id sequences kept in the counters collection.

use mongodb::{bson::doc, options::ReturnDocument, Collection};
use serde::Deserialize;

use common::{AppError, AppResult};

use super::collections::COUNTER_COLLECTION;
use super::Database;

#[derive(Debug, Deserialize)]
struct Counter {
    seq: i64,
}

/// Hands out sequential integer ids (first id is 1).
#[derive(Clone)]
pub struct CounterStore {
    counters: Collection<Counter>,
}

impl CounterStore {
    pub fn new(db: &Database) -> Self {
        Self {
            counters: db.collection(COUNTER_COLLECTION),
        }
    }

    /// Atomically increment and return the next value of `sequence`.
    pub async fn next(&self, sequence: &str) -> AppResult<i64> {
        let counter = self
            .counters
            .find_one_and_update(doc! { "_id": sequence }, doc! { "$inc": { "seq": 1_i64 } })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?;

        counter
            .map(|c| c.seq)
            .ok_or_else(|| AppError::internal(format!("Counter {} was not returned", sequence)))
    }
}
