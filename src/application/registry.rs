//! # Account Registry
//!
//! The set of monitored handles, kept in insertion order for display.

#[derive(Debug, Default, Clone)]
pub struct AccountRegistry {
    accounts: Vec<String>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.accounts.iter().any(|a| a == handle)
    }

    /// Appends `handle`; returns false if it is already present.
    pub fn insert(&mut self, handle: &str) -> bool {
        if self.contains(handle) {
            return false;
        }
        self.accounts.push(handle.to_string());
        true
    }

    pub fn remove(&mut self, handle: &str) -> bool {
        match self.accounts.iter().position(|a| a == handle) {
            Some(pos) => {
                self.accounts.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn list(&self) -> &[String] {
        &self.accounts
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.accounts.clone()
    }
}
