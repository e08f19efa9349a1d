//! Lock-protected admin set.

use super::{AdminError, AdminResult};
use crate::address::Address;
use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

/// Concurrency-safe set of admin addresses.
///
/// Reads share the lock; every mutation takes it exclusively, and the
/// authorization check, the last-admin check and the mutation run inside
/// one critical section.
#[derive(Debug)]
pub struct AdminRegistry {
    admins: RwLock<BTreeSet<Address>>,
}

impl AdminRegistry {
    /// Creates a registry whose only member is `initial`.
    #[must_use]
    pub fn seeded(initial: Address) -> Self {
        tracing::info!(admin = %initial, "Seeded initial admin");
        Self {
            admins: RwLock::new(BTreeSet::from([initial])),
        }
    }

    /// Returns `true` when `address` is currently an admin.
    #[must_use]
    pub fn is_admin(&self, address: &str) -> bool {
        self.admins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(address)
    }

    /// Adds `new_admin` on behalf of `requestor`.
    ///
    /// Adding an existing admin succeeds without effect.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Unauthorized`] when `requestor` is not an admin.
    pub fn add_admin(&self, new_admin: Address, requestor: &str) -> AdminResult<()> {
        let mut admins = self.write_as(requestor)?;
        let added = admins.insert(new_admin.clone());
        if added {
            tracing::info!(admin = %new_admin, requestor, "Added admin");
        }
        Ok(())
    }

    /// Removes `target` on behalf of `requestor`.
    ///
    /// Removing an address that is not an admin succeeds without effect.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Unauthorized`] when `requestor` is not an admin,
    /// or [`AdminError::LastAdminProtected`] when `target` is the only
    /// remaining admin.
    pub fn remove_admin(&self, target: &str, requestor: &str) -> AdminResult<()> {
        let mut admins = self.write_as(requestor)?;
        let Some(member) = admins.get(target).cloned() else {
            return Ok(());
        };
        if admins.len() == 1 {
            tracing::warn!(admin = %member, "Refused to remove last admin");
            return Err(AdminError::LastAdminProtected(member));
        }
        admins.remove(target);
        tracing::info!(admin = %member, requestor, "Removed admin");
        Ok(())
    }

    /// Returns a sorted snapshot of the admin set.
    #[must_use]
    pub fn admins(&self) -> Vec<Address> {
        self.admins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Returns the number of admins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.admins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when the admin set is empty, which construction and
    /// removal rules never allow.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes the write lock after confirming `requestor` is an admin.
    fn write_as(&self, requestor: &str) -> AdminResult<RwLockWriteGuard<'_, BTreeSet<Address>>> {
        let admins = self.admins.write().unwrap_or_else(PoisonError::into_inner);
        if !admins.contains(requestor) {
            tracing::warn!(requestor, "Rejected admin mutation from non-admin");
            return Err(AdminError::Unauthorized(requestor.to_owned()));
        }
        Ok(admins)
    }
}
