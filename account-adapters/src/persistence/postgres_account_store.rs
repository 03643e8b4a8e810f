use account_core::{
    Account, AccountId, AccountStatus, AccountStore, AccountStoreError, AuditTrail, Email, Gender,
    Password, PasswordResetToken, PendingVerification, PersonName, PhoneNumber, Profile,
    RefreshSession, RefreshTokenSecret, Role, VerificationCode,
};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core},
};
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, Secret};
use sqlx::{Pool, Postgres, Row, postgres::PgRow};
use uuid::Uuid;

/// Account store backed by PostgreSQL. Passwords are stored as Argon2id
/// hashes; refresh-token rotation is a conditional `UPDATE`, so concurrent
/// rotations resolve in the database rather than in process memory.
#[derive(Clone)]
pub struct PostgresAccountStore {
    pool: sqlx::PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresAccountStore { pool }
    }

    async fn account_exists(&self, id: &AccountId) -> Result<bool, AccountStoreError> {
        let row = sqlx::query("SELECT id FROM accounts WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        Ok(row.is_some())
    }
}

#[async_trait::async_trait]
impl AccountStore for PostgresAccountStore {
    #[tracing::instrument(name = "Adding account to PostgreSQL", skip_all)]
    async fn add_account(
        &self,
        account: Account,
        password: Option<Password>,
    ) -> Result<(), AccountStoreError> {
        let password_hash = match password {
            Some(password) => Some(
                compute_password_hash(password)
                    .await
                    .map_err(AccountStoreError::UnexpectedError)?,
            ),
            None => None,
        };

        let profile = account.profile();
        let audit = account.audit();

        let query = sqlx::query(
            r#"
                INSERT INTO accounts (
                    id, email, first_name, last_name, gender, date_of_birth,
                    address, phone_number, picture, password_hash,
                    email_confirmed, verification_code,
                    verification_code_expires_at, refresh_token,
                    refresh_token_expires_at, is_deleted, created_at,
                    created_by, updated_at, updated_by, deleted_at, deleted_by
                )
                VALUES (
                    $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22
                )
            "#,
        )
        .bind(account.id().as_uuid())
        .bind(account.email().as_ref().expose_secret())
        .bind(profile.first_name.as_ref().map(|name| name.as_str().to_owned()))
        .bind(profile.last_name.as_ref().map(|name| name.as_str().to_owned()))
        .bind(profile.gender.map(|gender| gender.as_str().to_owned()))
        .bind(profile.date_of_birth)
        .bind(profile.address.clone())
        .bind(profile.phone_number.as_ref().map(|phone| phone.as_str().to_owned()))
        .bind(profile.picture.clone())
        .bind(password_hash.map(|hash| hash.expose_secret().to_owned()))
        .bind(account.email_confirmed())
        .bind(account.verification().map(|v| v.code().as_str().to_owned()))
        .bind(account.verification().map(|v| v.expires_at()))
        .bind(
            account
                .refresh_session()
                .map(|s| s.secret().as_ref().expose_secret().to_owned()),
        )
        .bind(account.refresh_session().map(|s| s.expires_at()))
        .bind(account.is_deleted())
        .bind(audit.created_at)
        .bind(audit.created_by.map(|id| id.as_uuid()))
        .bind(audit.updated_at)
        .bind(audit.updated_by.map(|id| id.as_uuid()))
        .bind(audit.deleted_at)
        .bind(audit.deleted_by.map(|id| id.as_uuid()));

        query.execute(&self.pool).await.map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.constraint().is_some() {
                    return AccountStoreError::AccountAlreadyExists;
                }
            }
            AccountStoreError::UnexpectedError(e.to_string())
        })?;

        Ok(())
    }

    #[tracing::instrument(name = "Retrieving account by email from PostgreSQL", skip_all)]
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountStoreError> {
        let row = sqlx::query(
            r#"
                SELECT id, email, first_name, last_name, gender, date_of_birth,
                       address, phone_number, picture, email_confirmed,
                       verification_code, verification_code_expires_at,
                       refresh_token, refresh_token_expires_at, is_deleted,
                       created_at, created_by, updated_at, updated_by,
                       deleted_at, deleted_by
                FROM accounts
                WHERE email = $1
                ORDER BY is_deleted ASC, created_at DESC
                LIMIT 1
            "#,
        )
        .bind(email.as_ref().expose_secret())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        row.map(|row| account_from_row(&row)).transpose()
    }

    #[tracing::instrument(name = "Retrieving account by id from PostgreSQL", skip_all)]
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountStoreError> {
        let row = sqlx::query(
            r#"
                SELECT id, email, first_name, last_name, gender, date_of_birth,
                       address, phone_number, picture, email_confirmed,
                       verification_code, verification_code_expires_at,
                       refresh_token, refresh_token_expires_at, is_deleted,
                       created_at, created_by, updated_at, updated_by,
                       deleted_at, deleted_by
                FROM accounts
                WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        row.map(|row| account_from_row(&row)).transpose()
    }

    #[tracing::instrument(name = "Validating account credentials in PostgreSQL", skip_all)]
    async fn check_password(
        &self,
        id: &AccountId,
        candidate: &Password,
    ) -> Result<(), AccountStoreError> {
        let row = sqlx::query("SELECT password_hash FROM accounts WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        let Some(row) = row else {
            return Err(AccountStoreError::AccountNotFound);
        };

        // Federated accounts carry no hash and can never pass a password check
        let Some(password_hash) = column::<Option<String>>(&row, "password_hash")? else {
            return Err(AccountStoreError::IncorrectPassword);
        };

        verify_password_hash(Secret::from(password_hash), candidate.clone())
            .await
            .map_err(|_| AccountStoreError::IncorrectPassword)?;

        Ok(())
    }

    #[tracing::instrument(name = "Set new password", skip_all)]
    async fn set_new_password(
        &self,
        id: &AccountId,
        new_password: Password,
    ) -> Result<(), AccountStoreError> {
        let password_hash = compute_password_hash(new_password)
            .await
            .map_err(AccountStoreError::UnexpectedError)?;

        let result = sqlx::query("UPDATE accounts SET password_hash = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(password_hash.expose_secret())
            .execute(&self.pool)
            .await
            .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AccountStoreError::AccountNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Updating account in PostgreSQL", skip_all)]
    async fn update_account(&self, account: &Account) -> Result<(), AccountStoreError> {
        let profile = account.profile();
        let audit = account.audit();

        let result = sqlx::query(
            r#"
                UPDATE accounts
                SET first_name = $2, last_name = $3, gender = $4,
                    date_of_birth = $5, address = $6, phone_number = $7,
                    picture = $8, email_confirmed = $9,
                    verification_code = $10, verification_code_expires_at = $11,
                    updated_at = $12, updated_by = $13
                WHERE id = $1
            "#,
        )
        .bind(account.id().as_uuid())
        .bind(profile.first_name.as_ref().map(|name| name.as_str().to_owned()))
        .bind(profile.last_name.as_ref().map(|name| name.as_str().to_owned()))
        .bind(profile.gender.map(|gender| gender.as_str().to_owned()))
        .bind(profile.date_of_birth)
        .bind(profile.address.clone())
        .bind(profile.phone_number.as_ref().map(|phone| phone.as_str().to_owned()))
        .bind(profile.picture.clone())
        .bind(account.email_confirmed())
        .bind(account.verification().map(|v| v.code().as_str().to_owned()))
        .bind(account.verification().map(|v| v.expires_at()))
        .bind(audit.updated_at)
        .bind(audit.updated_by.map(|id| id.as_uuid()))
        .execute(&self.pool)
        .await
        .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AccountStoreError::AccountNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Rotating refresh session in PostgreSQL", skip_all)]
    async fn rotate_refresh_session(
        &self,
        id: &AccountId,
        expected: Option<&RefreshTokenSecret>,
        new: RefreshSession,
    ) -> Result<(), AccountStoreError> {
        let result = sqlx::query(
            r#"
                UPDATE accounts
                SET refresh_token = $2, refresh_token_expires_at = $3
                WHERE id = $1 AND refresh_token IS NOT DISTINCT FROM $4
            "#,
        )
        .bind(id.as_uuid())
        .bind(new.secret().as_ref().expose_secret())
        .bind(new.expires_at())
        .bind(expected.map(|secret| secret.as_ref().expose_secret().to_owned()))
        .execute(&self.pool)
        .await
        .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            // Either the account is gone or another rotation won the race
            return Err(if self.account_exists(id).await? {
                AccountStoreError::RefreshSessionConflict
            } else {
                AccountStoreError::AccountNotFound
            });
        }

        Ok(())
    }

    #[tracing::instrument(name = "Clearing refresh session in PostgreSQL", skip_all)]
    async fn clear_refresh_session(&self, id: &AccountId) -> Result<(), AccountStoreError> {
        let result = sqlx::query(
            r#"
                UPDATE accounts
                SET refresh_token = NULL, refresh_token_expires_at = NULL
                WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AccountStoreError::AccountNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Issuing password reset token in PostgreSQL", skip_all)]
    async fn create_password_reset_token(
        &self,
        id: &AccountId,
        ttl: Duration,
    ) -> Result<PasswordResetToken, AccountStoreError> {
        let token = PasswordResetToken::generate();

        sqlx::query(
            r#"
                INSERT INTO password_reset_tokens (account_id, token, expires_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (account_id)
                DO UPDATE SET token = EXCLUDED.token, expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(token.as_ref().expose_secret())
        .bind(Utc::now() + ttl)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.constraint().is_some() {
                    return AccountStoreError::AccountNotFound;
                }
            }
            AccountStoreError::UnexpectedError(e.to_string())
        })?;

        Ok(token)
    }

    #[tracing::instrument(name = "Consuming password reset token in PostgreSQL", skip_all)]
    async fn reset_password(
        &self,
        id: &AccountId,
        token: &PasswordResetToken,
        new_password: Password,
    ) -> Result<(), AccountStoreError> {
        // Hash before the transaction so it stays short
        let password_hash = compute_password_hash(new_password)
            .await
            .map_err(AccountStoreError::UnexpectedError)?;

        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        let consumed = sqlx::query(
            r#"
                DELETE FROM password_reset_tokens
                WHERE account_id = $1 AND token = $2 AND expires_at > $3
            "#,
        )
        .bind(id.as_uuid())
        .bind(token.as_ref().expose_secret())
        .bind(Utc::now())
        .execute(&mut *transaction)
        .await
        .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        if consumed.rows_affected() == 0 {
            return Err(AccountStoreError::InvalidResetToken);
        }

        let updated = sqlx::query("UPDATE accounts SET password_hash = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(password_hash.expose_secret())
            .execute(&mut *transaction)
            .await
            .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        if updated.rows_affected() == 0 {
            return Err(AccountStoreError::AccountNotFound);
        }

        transaction
            .commit()
            .await
            .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        Ok(())
    }

    #[tracing::instrument(name = "Soft-deleting account in PostgreSQL", skip_all)]
    async fn mark_deleted(
        &self,
        id: &AccountId,
        deleted_by: Option<&AccountId>,
        at: DateTime<Utc>,
    ) -> Result<(), AccountStoreError> {
        let result = sqlx::query(
            r#"
                UPDATE accounts
                SET is_deleted = TRUE, deleted_at = $2, deleted_by = $3,
                    refresh_token = NULL, refresh_token_expires_at = NULL
                WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(at)
        .bind(deleted_by.map(|id| id.as_uuid()))
        .execute(&self.pool)
        .await
        .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AccountStoreError::AccountNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Restoring account in PostgreSQL", skip_all)]
    async fn restore(
        &self,
        id: &AccountId,
        restored_by: Option<&AccountId>,
        at: DateTime<Utc>,
    ) -> Result<(), AccountStoreError> {
        let result = sqlx::query(
            r#"
                UPDATE accounts
                SET is_deleted = FALSE, deleted_at = NULL, deleted_by = NULL,
                    updated_at = $2, updated_by = $3
                WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(at)
        .bind(restored_by.map(|id| id.as_uuid()))
        .execute(&self.pool)
        .await
        .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AccountStoreError::AccountNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Retrieving roles from PostgreSQL", skip_all)]
    async fn roles_of(&self, id: &AccountId) -> Result<Vec<Role>, AccountStoreError> {
        let rows = sqlx::query("SELECT role FROM account_roles WHERE account_id = $1")
            .bind(id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                column::<String>(&row, "role")?
                    .parse::<Role>()
                    .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))
            })
            .collect()
    }

    #[tracing::instrument(name = "Assigning role in PostgreSQL", skip_all)]
    async fn assign_role(&self, id: &AccountId, role: Role) -> Result<(), AccountStoreError> {
        sqlx::query(
            r#"
                INSERT INTO account_roles (account_id, role)
                VALUES ($1, $2)
                ON CONFLICT (account_id, role) DO NOTHING
            "#,
        )
        .bind(id.as_uuid())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.constraint().is_some() {
                    return AccountStoreError::AccountNotFound;
                }
            }
            AccountStoreError::UnexpectedError(e.to_string())
        })?;

        Ok(())
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, AccountStoreError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))
}

fn account_from_row(row: &PgRow) -> Result<Account, AccountStoreError> {
    let email = Email::try_from(Secret::from(column::<String>(row, "email")?))
        .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

    let first_name = column::<Option<String>>(row, "first_name")?
        .map(|raw| PersonName::parse(&raw))
        .transpose()
        .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;
    let last_name = column::<Option<String>>(row, "last_name")?
        .map(|raw| PersonName::parse(&raw))
        .transpose()
        .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;
    let gender = column::<Option<String>>(row, "gender")?
        .map(|raw| raw.parse::<Gender>())
        .transpose()
        .map_err(AccountStoreError::UnexpectedError)?;
    let phone_number = column::<Option<String>>(row, "phone_number")?
        .map(|raw| PhoneNumber::parse(&raw))
        .transpose()
        .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

    let profile = Profile {
        first_name,
        last_name,
        gender,
        date_of_birth: column(row, "date_of_birth")?,
        address: column(row, "address")?,
        phone_number,
        picture: column(row, "picture")?,
    };

    let verification = match (
        column::<Option<String>>(row, "verification_code")?,
        column::<Option<DateTime<Utc>>>(row, "verification_code_expires_at")?,
    ) {
        (Some(code), Some(expires_at)) => {
            let code = VerificationCode::parse(&code)
                .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;
            Some(PendingVerification::new(code, expires_at))
        }
        _ => None,
    };

    let refresh_session = match (
        column::<Option<String>>(row, "refresh_token")?,
        column::<Option<DateTime<Utc>>>(row, "refresh_token_expires_at")?,
    ) {
        (Some(secret), Some(expires_at)) => Some(RefreshSession::new(
            RefreshTokenSecret::from(Secret::from(secret)),
            expires_at,
        )),
        _ => None,
    };

    let status = if column::<bool>(row, "is_deleted")? {
        AccountStatus::Deleted
    } else {
        AccountStatus::Active
    };

    let audit = AuditTrail {
        created_at: column(row, "created_at")?,
        created_by: column::<Option<Uuid>>(row, "created_by")?.map(AccountId::from),
        updated_at: column(row, "updated_at")?,
        updated_by: column::<Option<Uuid>>(row, "updated_by")?.map(AccountId::from),
        deleted_at: column(row, "deleted_at")?,
        deleted_by: column::<Option<Uuid>>(row, "deleted_by")?.map(AccountId::from),
    };

    Ok(Account::from_storage(
        AccountId::from(column::<Uuid>(row, "id")?),
        email,
        profile,
        status,
        column::<bool>(row, "email_confirmed")?,
        verification,
        refresh_session,
        audit,
    ))
}

#[tracing::instrument(name = "Verify password hash", skip_all)]
async fn verify_password_hash(
    expected_password_hash: Secret<String>,
    password_candidate: Password,
) -> Result<(), String> {
    let current_span: tracing::Span = tracing::Span::current();
    let result = tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| {
            let expected_password_hash: PasswordHash<'_> =
                PasswordHash::new(expected_password_hash.expose_secret())
                    .map_err(|e| e.to_string())?;

            Argon2::new(
                Algorithm::Argon2id,
                Version::V0x13,
                Params::new(15000, 2, 1, None).map_err(|e| e.to_string())?,
            )
            .verify_password(
                password_candidate.as_ref().expose_secret().as_bytes(),
                &expected_password_hash,
            )
            .map_err(|e| e.to_string())
        })
    })
    .await
    .map_err(|e| e.to_string())?;

    result
}

#[tracing::instrument(name = "Computing password hash", skip_all)]
async fn compute_password_hash(password: Password) -> Result<Secret<String>, String> {
    let current_span: tracing::Span = tracing::Span::current();

    let result = tokio::task::spawn_blocking(move || {
        current_span.in_scope(move || {
            let salt: SaltString = SaltString::generate(rand_core::OsRng);
            let hasher = Argon2::new(
                Algorithm::Argon2id,
                Version::V0x13,
                Params::new(15000, 2, 1, None).map_err(|e| e.to_string())?,
            );
            hasher
                .hash_password(password.as_ref().expose_secret().as_bytes(), &salt)
                .map(|h| Secret::from(h.to_string()))
                .map_err(|e| e.to_string())
        })
    })
    .await
    .map_err(|e| e.to_string())?;

    result
}
