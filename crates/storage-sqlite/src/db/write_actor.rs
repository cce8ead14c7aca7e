//! Single-writer actor for SQLite.
//!
//! SQLite allows one writer at a time; funneling every mutation through
//! one task with one dedicated connection keeps concurrent requests from
//! tripping over `SQLITE_BUSY`. Reads keep using the pool directly.

use std::any::Any;

use diesel::SqliteConnection;
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::StorageError;
use spendwise_core::errors::Result;

const WRITE_QUEUE_DEPTH: usize = 1024;

// Closures of arbitrary return type share one channel, so results travel
// type-erased and exec() downcasts on the way out.
type ErasedResult = Result<Box<dyn Any + Send + 'static>>;

struct WriteRequest {
    job: Box<dyn FnOnce(&mut SqliteConnection) -> ErasedResult + Send + 'static>,
    reply: oneshot::Sender<ErasedResult>,
}

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<WriteRequest>,
}

impl WriteHandle {
    /// Runs a job on the writer's dedicated connection, inside an
    /// immediate transaction, serialized behind every write submitted
    /// before it.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (reply, outcome) = oneshot::channel();
        let request = WriteRequest {
            job: Box::new(move |conn| job(conn).map(|v| Box::new(v) as Box<dyn Any + Send>)),
            reply,
        };
        self.tx
            .send(request)
            .await
            .expect("Writer actor is gone, its queue is closed.");

        let erased = outcome
            .await
            .expect("Writer actor dropped the reply sender without answering.")?;
        Ok(*erased
            .downcast::<T>()
            .unwrap_or_else(|_| panic!("Writer actor replied with an unexpected type.")))
    }
}

/// Spawns the writer actor and hands back its submission handle.
///
/// The actor checks out one pooled connection for its whole lifetime and
/// stops once every handle has been dropped.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<WriteRequest>(WRITE_QUEUE_DEPTH);

    tokio::spawn(async move {
        let mut conn = pool
            .get()
            .expect("No connection available for the writer actor.");

        while let Some(request) = rx.recv().await {
            let outcome = conn
                .immediate_transaction::<_, StorageError, _>(|c| {
                    (request.job)(c).map_err(StorageError::from)
                })
                .map_err(|e: StorageError| e.into());
            // Nobody waiting on the reply is fine, the write still landed.
            let _ = request.reply.send(outcome);
        }
    });

    WriteHandle { tx }
}
