use crate::error::{CoreError, Result};
use crate::models::user_account::UserAccount;

use std::collections::BTreeMap;
use std::panic::Location;

use error_location::ErrorLocation;

/// Collapse a raw email into its grouping key: trimmed, lowercased,
/// blank mapped to `None`. This is the single sentinel for "no email":
/// NULL and empty-string storage rows both end up here.
pub fn normalize_email(raw: &str) -> Option<String> {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Normalize and shape-check an email supplied by an operator.
///
/// Accepts anything with a non-empty local part and domain around a single
/// `@`. Full RFC validation belongs to the registration path, not a
/// remediation tool.
#[track_caller]
pub fn validate_email(raw: &str) -> Result<String> {
    let invalid = || CoreError::InvalidEmail {
        value: raw.to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    let normalized = normalize_email(raw).ok_or_else(|| invalid())?;

    let well_formed = match normalized.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };

    if well_formed { Ok(normalized) } else { Err(invalid()) }
}

/// A set of accounts sharing one normalized email, with the retention
/// decision baked in: the highest-id member is kept, the rest are doomed.
///
/// Ephemeral: recomputed on every analysis run, never persisted.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    pub email: String,
    doomed: Vec<UserAccount>,
    retained: UserAccount,
}

impl DuplicateGroup {
    /// The account that survives the migration (maximum id).
    pub fn retained(&self) -> &UserAccount {
        &self.retained
    }

    /// Accounts the migration would delete, ascending id.
    pub fn doomed(&self) -> &[UserAccount] {
        &self.doomed
    }

    /// All members in ascending id order, retained account last.
    pub fn members(&self) -> impl Iterator<Item = &UserAccount> {
        self.doomed.iter().chain(std::iter::once(&self.retained))
    }

    pub fn member_count(&self) -> usize {
        self.doomed.len() + 1
    }
}

/// Group accounts by normalized email and keep only the groups with more
/// than one member. Accounts without an email never form a group. Output
/// is sorted by email, members within a group by ascending id.
pub fn group_duplicates(accounts: Vec<UserAccount>) -> Vec<DuplicateGroup> {
    let mut by_email: BTreeMap<String, Vec<UserAccount>> = BTreeMap::new();

    for account in accounts {
        if let Some(email) = account.normalized_email() {
            by_email.entry(email).or_default().push(account);
        }
    }

    by_email
        .into_iter()
        .filter_map(|(email, mut members)| {
            if members.len() < 2 {
                return None;
            }
            members.sort_by_key(|account| account.id);
            let retained = members.pop()?;
            Some(DuplicateGroup {
                email,
                doomed: members,
                retained,
            })
        })
        .collect()
}
