//! Profile lookup port
//!
//! Backs the `get_customer_profile` capability. The input is ignored by the
//! standard implementations; the service returns one fixed record.

use async_trait::async_trait;
use finadvisor_domain::CustomerProfile;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Profile source unavailable: {0}")]
    Unavailable(String),
}

impl ProfileError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProfileError::Unavailable(_))
    }
}

/// Port for the Profile Lookup Service
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    async fn lookup(&self, name: &str) -> Result<CustomerProfile, ProfileError>;
}

/// Returns the same record for every lookup
#[derive(Debug, Clone, Default)]
pub struct FixedProfileLookup {
    profile: CustomerProfile,
}

impl FixedProfileLookup {
    pub fn new(profile: CustomerProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl ProfileLookup for FixedProfileLookup {
    async fn lookup(&self, _name: &str) -> Result<CustomerProfile, ProfileError> {
        Ok(self.profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_lookup_ignores_name() {
        let lookup = FixedProfileLookup::default();
        let a = lookup.lookup("").await.unwrap();
        let b = lookup.lookup("Alice").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.monthly_income, "50000HKD");
    }
}
