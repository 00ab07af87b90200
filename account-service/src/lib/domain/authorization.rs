use thiserror::Error;

use crate::domain::account::models::UserId;

/// Resource that belongs to exactly one account.
pub trait Owned {
    fn owner_id(&self) -> UserId;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OwnershipError {
    #[error("User {actor} does not own this resource")]
    NotOwner { actor: UserId },
}

/// Check that `actor` owns `resource`.
///
/// The only ownership check in the service; profile edits and every content
/// mutation go through it.
///
/// # Errors
/// * `NotOwner` - `actor` is not the resource owner
pub fn ensure_owner<R: Owned + ?Sized>(actor: UserId, resource: &R) -> Result<(), OwnershipError> {
    if resource.owner_id() == actor {
        Ok(())
    } else {
        Err(OwnershipError::NotOwner { actor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Post(UserId);

    impl Owned for Post {
        fn owner_id(&self) -> UserId {
            self.0
        }
    }

    #[test]
    fn test_owner_passes() {
        assert_eq!(ensure_owner(UserId(1), &Post(UserId(1))), Ok(()));
    }

    #[test]
    fn test_non_owner_rejected() {
        assert_eq!(
            ensure_owner(UserId(2), &Post(UserId(1))),
            Err(OwnershipError::NotOwner { actor: UserId(2) })
        );
    }
}
