use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use spendwise_core::auth::{NewOtp, Otp, OtpRepositoryTrait};
use spendwise_core::Result;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::otps::model::OtpDB;
use crate::schema::otps;

/// SQLite repository for one-time passcodes, one row per email.
pub struct OtpRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl OtpRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl OtpRepositoryTrait for OtpRepository {
    fn find_by_email(&self, email: &str) -> Result<Option<Otp>> {
        let mut conn = get_connection(&self.pool)?;
        let otp = otps::table
            .filter(otps::email.eq(email))
            .first::<OtpDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(otp.map(Otp::from))
    }

    async fn upsert(&self, new_otp: NewOtp) -> Result<Otp> {
        let mut record = OtpDB::from(new_otp);
        record.id = Uuid::new_v4().to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Otp> {
                diesel::insert_into(otps::table)
                    .values(&record)
                    .on_conflict(otps::email)
                    .do_update()
                    .set((
                        otps::code.eq(&record.code),
                        otps::expires_at.eq(record.expires_at),
                        otps::updated_at.eq(record.updated_at),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let stored = otps::table
                    .filter(otps::email.eq(&record.email))
                    .first::<OtpDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Otp::from(stored))
            })
            .await
    }
}
