use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::auth::{check_record, hash_password};
use crate::error::{HabitError, HabitResult};
use crate::habits::default_habits;
use crate::models::{Theme, UserRecord};

/// All known accounts, keyed by username.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct UserDirectory {
    users: BTreeMap<String, UserRecord>,
}

impl UserDirectory {
    pub fn new() -> UserDirectory {
        UserDirectory::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    pub fn get_mut(&mut self, username: &str) -> Option<&mut UserRecord> {
        self.users.get_mut(username)
    }

    /// Creates an account with the starter habits and a light theme.
    ///
    /// Fails on a blank field or when the username is taken; the existing
    /// record is never touched.
    pub fn register(
        &mut self,
        username: &str,
        password: &str,
        iterations: u32,
    ) -> HabitResult<&mut UserRecord> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(HabitError::EmptyField);
        }
        if self.users.contains_key(username) {
            return Err(HabitError::DuplicateUsername(username.to_string()));
        }
        let record = UserRecord {
            username: username.to_string(),
            credential: Some(hash_password(password, iterations)),
            password: None,
            habits: default_habits(),
            daily_history: BTreeMap::new(),
            theme: Theme::Light,
        };
        Ok(self.users.entry(username.to_string()).or_insert(record))
    }

    /// Returns the record when `password` verifies for `username`.
    ///
    /// A legacy plaintext record that matches is upgraded in place.
    pub fn authenticate(
        &mut self,
        username: &str,
        password: &str,
        iterations: u32,
    ) -> HabitResult<&mut UserRecord> {
        let record = self
            .users
            .get_mut(username)
            .ok_or(HabitError::InvalidCredentials)?;
        if check_record(record, password, iterations) {
            Ok(record)
        } else {
            Err(HabitError::InvalidCredentials)
        }
    }
}
