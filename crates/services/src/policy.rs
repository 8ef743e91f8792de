//! # Access Policy
//!
//! Pure predicates deciding who may perform which action. No side effects;
//! callers resolve the target resource first, so a missing resource is
//! reported as not-found before any rule here runs.

use domains::{AppError, Identity, Result};
use uuid::Uuid;

/// REST-style verbs the policy distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Delete,
}

impl Action {
    pub fn is_read(self) -> bool {
        matches!(self, Action::List | Action::Retrieve)
    }
}

/// Rejects anonymous callers.
pub fn require_account(actor: Option<&Identity>) -> Result<&Identity> {
    actor.ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))
}

/// Rejects everyone below [`Role::Admin`](domains::Role).
pub fn require_admin(actor: Option<&Identity>) -> Result<&Identity> {
    let actor = require_account(actor)?;
    if actor.role.is_admin() {
        Ok(actor)
    } else {
        Err(AppError::Forbidden(
            "administrator rights required".to_string(),
        ))
    }
}

/// The review/comment rule set, evaluated in order:
///
/// 1. reads are public, even anonymous;
/// 2. creation needs any authenticated account;
/// 3. update/partial-update/delete need the author, a moderator, or an admin.
pub fn author_or_privileged(
    actor: Option<&Identity>,
    action: Action,
    author_id: Uuid,
) -> Result<()> {
    if action.is_read() {
        return Ok(());
    }
    let actor = require_account(actor)?;
    if action == Action::Create {
        return Ok(());
    }
    if actor.id == author_id || actor.role.is_privileged() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "only the author or a moderator may modify this".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::Role;

    fn identity(role: Role) -> Identity {
        Identity {
            id: Uuid::now_v7(),
            role,
        }
    }

    #[test]
    fn reads_are_public() {
        let owner = Uuid::now_v7();
        for action in [Action::List, Action::Retrieve] {
            assert!(author_or_privileged(None, action, owner).is_ok());
        }
    }

    #[test]
    fn anonymous_may_not_mutate() {
        let owner = Uuid::now_v7();
        for action in [
            Action::Create,
            Action::Update,
            Action::PartialUpdate,
            Action::Delete,
        ] {
            let denied = author_or_privileged(None, action, owner);
            assert!(matches!(denied, Err(AppError::Unauthorized(_))));
        }
    }

    #[test]
    fn any_account_may_create() {
        let actor = identity(Role::User);
        assert!(author_or_privileged(Some(&actor), Action::Create, Uuid::now_v7()).is_ok());
    }

    #[test]
    fn author_may_modify_own() {
        let actor = identity(Role::User);
        for action in [Action::Update, Action::PartialUpdate, Action::Delete] {
            assert!(author_or_privileged(Some(&actor), action, actor.id).is_ok());
        }
    }

    #[test]
    fn plain_user_may_not_modify_others() {
        let actor = identity(Role::User);
        let other = Uuid::now_v7();
        for action in [Action::Update, Action::PartialUpdate, Action::Delete] {
            let denied = author_or_privileged(Some(&actor), action, other);
            assert!(matches!(denied, Err(AppError::Forbidden(_))));
        }
    }

    #[test]
    fn privileged_roles_override_ownership() {
        let other = Uuid::now_v7();
        for role in [Role::Moderator, Role::Admin] {
            let actor = identity(role);
            for action in [Action::Update, Action::PartialUpdate, Action::Delete] {
                assert!(author_or_privileged(Some(&actor), action, other).is_ok());
            }
        }
    }

    #[test]
    fn admin_gate() {
        assert!(matches!(
            require_admin(None),
            Err(AppError::Unauthorized(_))
        ));
        let user = identity(Role::User);
        assert!(matches!(
            require_admin(Some(&user)),
            Err(AppError::Forbidden(_))
        ));
        let moderator = identity(Role::Moderator);
        assert!(matches!(
            require_admin(Some(&moderator)),
            Err(AppError::Forbidden(_))
        ));
        let admin = identity(Role::Admin);
        assert!(require_admin(Some(&admin)).is_ok());
    }
}
