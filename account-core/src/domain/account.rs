use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    email::Email,
    person_name::PersonName,
    phone_number::PhoneNumber,
    refresh_token::RefreshSession,
    verification_code::PendingVerification,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AccountId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            other => Err(format!("Invalid gender: {other}")),
        }
    }
}

/// Soft-delete state. A deleted account keeps its row but must never
/// authenticate until restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    Deleted,
}

/// Display profile. Everything is optional because federated provisioning
/// only receives what the provider asserts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone_number: Option<PhoneNumber>,
    pub picture: Option<String>,
}

/// Creation/modification/deletion audit fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTrail {
    pub created_at: DateTime<Utc>,
    pub created_by: Option<AccountId>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<AccountId>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<AccountId>,
}

impl AuditTrail {
    pub fn started(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            created_by: None,
            updated_at: None,
            updated_by: None,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

/// Account aggregate: identity, profile and authentication state.
///
/// The verification code and the refresh session each pair a value with its
/// expiry, so "set together, cleared together" holds by construction.
#[derive(Debug, Clone)]
pub struct Account {
    id: AccountId,
    email: Email,
    profile: Profile,
    status: AccountStatus,
    email_confirmed: bool,
    verification: Option<PendingVerification>,
    refresh_session: Option<RefreshSession>,
    audit: AuditTrail,
}

impl Account {
    /// New account from a registration, pending email verification.
    pub fn local(
        email: Email,
        profile: Profile,
        verification: PendingVerification,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AccountId::new(),
            email,
            profile,
            status: AccountStatus::Active,
            email_confirmed: false,
            verification: Some(verification),
            refresh_session: None,
            audit: AuditTrail::started(now),
        }
    }

    /// New account provisioned from a federated identity. Has no password and
    /// trusts the provider's assertion about email ownership.
    pub fn federated(
        email: Email,
        profile: Profile,
        email_confirmed: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AccountId::new(),
            email,
            profile,
            status: AccountStatus::Active,
            email_confirmed,
            verification: None,
            refresh_session: None,
            audit: AuditTrail::started(now),
        }
    }

    /// Reconstructs an account from persisted state.
    #[allow(clippy::too_many_arguments)]
    pub fn from_storage(
        id: AccountId,
        email: Email,
        profile: Profile,
        status: AccountStatus,
        email_confirmed: bool,
        verification: Option<PendingVerification>,
        refresh_session: Option<RefreshSession>,
        audit: AuditTrail,
    ) -> Self {
        Self {
            id,
            email,
            profile,
            status,
            email_confirmed,
            verification,
            refresh_session,
            audit,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn is_deleted(&self) -> bool {
        self.status == AccountStatus::Deleted
    }

    pub fn email_confirmed(&self) -> bool {
        self.email_confirmed
    }

    pub fn verification(&self) -> Option<&PendingVerification> {
        self.verification.as_ref()
    }

    pub fn refresh_session(&self) -> Option<&RefreshSession> {
        self.refresh_session.as_ref()
    }

    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    /// Marks the email as verified and clears the pending code.
    pub fn confirm_email(&mut self, now: DateTime<Utc>) {
        self.email_confirmed = true;
        self.verification = None;
        self.audit.updated_at = Some(now);
    }

    /// Installs a fresh verification code, replacing any previous one.
    pub fn begin_verification(&mut self, verification: PendingVerification, now: DateTime<Utc>) {
        self.verification = Some(verification);
        self.audit.updated_at = Some(now);
    }

    pub fn set_refresh_session(&mut self, session: Option<RefreshSession>) {
        self.refresh_session = session;
    }

    /// Soft delete. Invalidating the refresh session is part of the
    /// transition itself, not a follow-up concern.
    pub fn mark_deleted(&mut self, deleted_by: Option<AccountId>, now: DateTime<Utc>) {
        self.status = AccountStatus::Deleted;
        self.refresh_session = None;
        self.audit.deleted_at = Some(now);
        self.audit.deleted_by = deleted_by;
    }

    pub fn restore(&mut self, restored_by: Option<AccountId>, now: DateTime<Utc>) {
        self.status = AccountStatus::Active;
        self.audit.deleted_at = None;
        self.audit.deleted_by = None;
        self.audit.updated_at = Some(now);
        self.audit.updated_by = restored_by;
    }
}
