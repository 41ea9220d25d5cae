// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository for the document store.
//!
//! Each user is stored as a separate JSON file under `users/`, keyed by id.
//! Email and phone are secondary identifiers resolved by a linear scan.
//! The stored document is never serialized to API responses; handlers use
//! the [`UserResponse`] and [`UserProfile`] projections instead.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::otp::OtpError;
use crate::auth::{Identifier, Role};

use super::super::{FileStorage, StorageError, StorageResult};

/// User document stored on the filesystem.
///
/// Holds the password hash and any pending OTP, so this type must never be
/// serialized into an API response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Normalized email address (lowercase), if registered with one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Normalized phone number (digits only), if registered with one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Argon2 password hash (PHC string)
    pub password_hash: String,
    /// Authorization role
    pub role: Role,
    /// Whether the account passed OTP verification
    pub verified: bool,
    /// Pending one-time code, present only together with `otp_expires`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    /// Expiry of the pending code, present only together with `otp`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp_expires: Option<DateTime<Utc>>,
    /// Date of birth, if provided at registration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    /// "Keep me logged in" preference, if provided at registration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_logged_in: Option<bool>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    /// Set a pending OTP, replacing any existing one.
    pub fn issue_otp(&mut self, code: String, expires: DateTime<Utc>) {
        self.otp = Some(code);
        self.otp_expires = Some(expires);
    }

    /// Whether a pending OTP exists and has not expired at `now`.
    pub fn has_valid_otp(&self, now: DateTime<Utc>) -> bool {
        match (&self.otp, self.otp_expires) {
            (Some(_), Some(expires)) => now <= expires,
            _ => false,
        }
    }

    /// Consume the pending OTP.
    ///
    /// On success both OTP fields are cleared and the account is marked
    /// verified. The code and its expiry always travel together; a document
    /// with only one of them set is unreachable through this type.
    pub fn verify_otp(&mut self, code: &str, now: DateTime<Utc>) -> Result<(), OtpError> {
        let (Some(stored), Some(expires)) = (&self.otp, self.otp_expires) else {
            return Err(OtpError::Missing);
        };

        if now > expires {
            return Err(OtpError::Expired);
        }
        if stored != code {
            return Err(OtpError::Invalid);
        }

        self.otp = None;
        self.otp_expires = None;
        self.verified = true;
        Ok(())
    }
}

/// Sans-secret user projection returned by `/api/auth/me` and admin views.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_logged_in: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl From<&StoredUser> for UserResponse {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            verified: user.verified,
            dob: user.dob,
            keep_logged_in: user.keep_logged_in,
            created_at: user.created_at,
        }
    }
}

/// Compact user projection embedded in login and OTP verification responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<&StoredUser> for UserProfile {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }
}

/// Repository for user operations on the document store.
pub struct UserRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Check if a user exists.
    pub fn exists(&self, user_id: &str) -> bool {
        self.storage.exists(self.storage.paths().user(user_id))
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: &str) -> StorageResult<StoredUser> {
        let path = self.storage.paths().user(user_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.storage.read_json(path)
    }

    /// Find a user by normalized email or phone.
    pub fn find_by_identifier(&self, identifier: &Identifier) -> StorageResult<StoredUser> {
        let user_ids = self
            .storage
            .list_files(self.storage.paths().users_dir(), "json")?;

        for id in user_ids {
            if let Ok(user) = self.get(&id) {
                let matches = match identifier {
                    Identifier::Email(email) => user.email.as_deref() == Some(email.as_str()),
                    Identifier::Phone(phone) => user.phone.as_deref() == Some(phone.as_str()),
                };
                if matches {
                    return Ok(user);
                }
            }
        }

        Err(StorageError::NotFound(format!("User for {identifier}")))
    }

    /// Create a new user.
    ///
    /// Rejects the write when another user already holds any identifier the
    /// new user carries. Absent identifiers never match existing documents.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        let user_id = &user.id;

        if self.exists(user_id) {
            return Err(StorageError::AlreadyExists(format!("User {user_id}")));
        }

        // Check email and phone uniqueness across present fields only
        let user_ids = self
            .storage
            .list_files(self.storage.paths().users_dir(), "json")?;
        for id in user_ids {
            if let Ok(existing) = self.get(&id) {
                let email_taken =
                    user.email.is_some() && user.email == existing.email;
                let phone_taken =
                    user.phone.is_some() && user.phone == existing.phone;
                if email_taken || phone_taken {
                    return Err(StorageError::AlreadyExists(format!(
                        "User with the same identifier as {user_id}"
                    )));
                }
            }
        }

        self.storage
            .write_json(self.storage.paths().user(user_id), user)
    }

    /// Update an existing user.
    pub fn update(&self, user: &StoredUser) -> StorageResult<()> {
        let user_id = &user.id;

        if !self.exists(user_id) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }

        self.storage
            .write_json(self.storage.paths().user(user_id), user)
    }

    /// List all users (admin view).
    pub fn list_all(&self) -> StorageResult<Vec<StoredUser>> {
        let user_ids = self
            .storage
            .list_files(self.storage.paths().users_dir(), "json")?;

        let mut users = Vec::new();
        for id in user_ids {
            if let Ok(user) = self.get(&id) {
                users.push(user);
            }
        }

        Ok(users)
    }

    /// Delete every user document, returning the number removed.
    ///
    /// Maintenance use only.
    pub fn delete_all(&self) -> StorageResult<usize> {
        let user_ids = self
            .storage
            .list_files(self.storage.paths().users_dir(), "json")?;

        let mut removed = 0;
        for id in &user_ids {
            self.storage.delete(self.storage.paths().user(id))?;
            removed += 1;
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, StoragePaths};
    use chrono::Duration;
    use std::env;
    use std::fs;

    fn test_storage() -> FileStorage {
        let test_dir = env::temp_dir().join(format!("test-user-repo-{}", uuid::Uuid::new_v4()));
        let paths = StoragePaths::new(&test_dir);
        let mut storage = FileStorage::new(paths);
        storage.initialize().expect("Failed to initialize");
        storage
    }

    fn cleanup(storage: &FileStorage) {
        let _ = fs::remove_dir_all(storage.paths().root());
    }

    fn test_user(id: &str, email: Option<&str>, phone: Option<&str>) -> StoredUser {
        StoredUser {
            id: id.to_string(),
            name: "Test User".to_string(),
            email: email.map(String::from),
            phone: phone.map(String::from),
            password_hash: "$argon2id$fake-hash".to_string(),
            role: Role::User,
            verified: false,
            otp: None,
            otp_expires: None,
            dob: None,
            keep_logged_in: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_get_user() {
        let storage = test_storage();
        let repo = UserRepository::new(&storage);

        let user = test_user("u-1", Some("a@b.com"), None);
        repo.create(&user).unwrap();

        let loaded = repo.get("u-1").unwrap();
        assert_eq!(loaded, user);

        cleanup(&storage);
    }

    #[test]
    fn duplicate_email_rejected() {
        let storage = test_storage();
        let repo = UserRepository::new(&storage);

        repo.create(&test_user("u-1", Some("same@b.com"), None))
            .unwrap();

        let result = repo.create(&test_user("u-2", Some("same@b.com"), None));
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));

        cleanup(&storage);
    }

    #[test]
    fn duplicate_phone_rejected_despite_different_email() {
        let storage = test_storage();
        let repo = UserRepository::new(&storage);

        repo.create(&test_user("u-1", Some("first@b.com"), Some("5551234567")))
            .unwrap();

        let result = repo.create(&test_user("u-2", Some("second@b.com"), Some("5551234567")));
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));

        cleanup(&storage);
    }

    #[test]
    fn absent_identifiers_never_collide() {
        let storage = test_storage();
        let repo = UserRepository::new(&storage);

        // Both users have no phone; the absent field must not match
        repo.create(&test_user("u-1", Some("one@b.com"), None)).unwrap();
        repo.create(&test_user("u-2", Some("two@b.com"), None)).unwrap();

        cleanup(&storage);
    }

    #[test]
    fn find_by_identifier_matches_email_and_phone() {
        let storage = test_storage();
        let repo = UserRepository::new(&storage);

        repo.create(&test_user("u-1", Some("find@b.com"), Some("19998887777")))
            .unwrap();

        let by_email = repo
            .find_by_identifier(&Identifier::Email("find@b.com".to_string()))
            .unwrap();
        assert_eq!(by_email.id, "u-1");

        let by_phone = repo
            .find_by_identifier(&Identifier::Phone("19998887777".to_string()))
            .unwrap();
        assert_eq!(by_phone.id, "u-1");

        let missing = repo.find_by_identifier(&Identifier::Email("nope@b.com".to_string()));
        assert!(matches!(missing, Err(StorageError::NotFound(_))));

        cleanup(&storage);
    }

    #[test]
    fn update_persists_changes() {
        let storage = test_storage();
        let repo = UserRepository::new(&storage);

        let mut user = test_user("u-1", Some("a@b.com"), None);
        repo.create(&user).unwrap();

        user.role = Role::Admin;
        user.verified = true;
        repo.update(&user).unwrap();

        let loaded = repo.get("u-1").unwrap();
        assert_eq!(loaded.role, Role::Admin);
        assert!(loaded.verified);

        cleanup(&storage);
    }

    #[test]
    fn concurrent_style_otp_writes_are_last_write_wins() {
        let storage = test_storage();
        let repo = UserRepository::new(&storage);

        repo.create(&test_user("u-1", Some("a@b.com"), None)).unwrap();

        // Snapshot taken before another writer issues a code, then written
        // back afterwards. There is no locking: the stale snapshot wins and
        // the pending code is lost.
        let stale = repo.get("u-1").unwrap();

        let mut with_otp = repo.get("u-1").unwrap();
        with_otp.issue_otp("123456".to_string(), Utc::now() + Duration::minutes(10));
        repo.update(&with_otp).unwrap();

        storage
            .write_json(storage.paths().user("u-1"), &stale)
            .unwrap();

        let loaded = repo.get("u-1").unwrap();
        assert!(loaded.otp.is_none());
        assert!(loaded.otp_expires.is_none());

        cleanup(&storage);
    }

    #[test]
    fn delete_all_removes_every_user() {
        let storage = test_storage();
        let repo = UserRepository::new(&storage);

        repo.create(&test_user("u-1", Some("a@b.com"), None)).unwrap();
        repo.create(&test_user("u-2", Some("b@b.com"), None)).unwrap();

        let removed = repo.delete_all().unwrap();
        assert_eq!(removed, 2);
        assert!(repo.list_all().unwrap().is_empty());

        cleanup(&storage);
    }

    // ===== OTP state machine =====

    #[test]
    fn verify_otp_consumes_code_and_marks_verified() {
        let now = Utc::now();
        let mut user = test_user("u-1", Some("a@b.com"), None);
        user.issue_otp("123456".to_string(), now + Duration::minutes(10));
        assert!(user.has_valid_otp(now));

        user.verify_otp("123456", now).unwrap();
        assert!(user.verified);
        assert!(user.otp.is_none());
        assert!(user.otp_expires.is_none());

        // A second attempt finds no pending code
        let result = user.verify_otp("123456", now);
        assert_eq!(result, Err(OtpError::Missing));
    }

    #[test]
    fn verify_otp_rejects_wrong_code() {
        let now = Utc::now();
        let mut user = test_user("u-1", Some("a@b.com"), None);
        user.issue_otp("123456".to_string(), now + Duration::minutes(10));

        let result = user.verify_otp("654321", now);
        assert_eq!(result, Err(OtpError::Invalid));

        // The pending code survives a failed attempt
        assert!(user.has_valid_otp(now));
        assert!(!user.verified);
    }

    #[test]
    fn verify_otp_rejects_expired_code() {
        let now = Utc::now();
        let mut user = test_user("u-1", Some("a@b.com"), None);
        user.issue_otp("123456".to_string(), now - Duration::seconds(1));

        let result = user.verify_otp("123456", now);
        assert_eq!(result, Err(OtpError::Expired));
        assert!(!user.has_valid_otp(now));
    }

    #[test]
    fn issue_otp_replaces_pending_code() {
        let now = Utc::now();
        let mut user = test_user("u-1", Some("a@b.com"), None);
        user.issue_otp("111111".to_string(), now + Duration::minutes(10));
        user.issue_otp("222222".to_string(), now + Duration::minutes(10));

        assert_eq!(user.verify_otp("111111", now), Err(OtpError::Invalid));
        user.verify_otp("222222", now).unwrap();
    }

    #[test]
    fn projections_drop_secret_fields() {
        let mut user = test_user("u-1", Some("a@b.com"), Some("5550001111"));
        user.issue_otp("123456".to_string(), Utc::now());

        let response = UserResponse::from(&user);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(json.get("otp").is_none());
        assert_eq!(json["id"], "u-1");
        assert_eq!(json["createdAt"], serde_json::to_value(user.created_at).unwrap());

        let profile = UserProfile::from(&user);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["phone"], "5550001111");
        assert!(json.get("otp").is_none());
    }
}
