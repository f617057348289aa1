//! Caller identity passed explicitly into every service call.

use foodgram_sdk::models::UserId;
use foodgram_sdk::User;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Subject {
    id: UserId,
    is_admin: bool,
}

/// Who is making the request. Anonymous callers may only read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecurityContext {
    subject: Option<Subject>,
}

impl SecurityContext {
    #[must_use]
    pub fn anonymous() -> Self {
        Self { subject: None }
    }

    #[must_use]
    pub fn user(id: UserId, is_admin: bool) -> Self {
        Self {
            subject: Some(Subject { id, is_admin }),
        }
    }

    #[must_use]
    pub fn for_user(user: &User) -> Self {
        Self::user(user.id, user.is_admin())
    }

    #[must_use]
    pub fn subject_id(&self) -> Option<UserId> {
        self.subject.map(|s| s.id)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.subject.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.subject.is_some_and(|s| s.is_admin)
    }

    /// The caller's user id, or `Unauthorized` for anonymous callers.
    pub fn require_subject(&self) -> Result<UserId, DomainError> {
        self.subject_id().ok_or(DomainError::Unauthorized)
    }

    /// Authors and admins may modify a recipe.
    #[must_use]
    pub fn can_modify(&self, author_id: UserId) -> bool {
        self.subject
            .is_some_and(|s| s.is_admin || s.id == author_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_cannot_modify_anything() {
        let ctx = SecurityContext::anonymous();
        assert!(!ctx.is_authenticated());
        assert!(!ctx.can_modify(1));
        assert!(matches!(ctx.require_subject(), Err(DomainError::Unauthorized)));
    }

    #[test]
    fn author_and_admin_can_modify() {
        assert!(SecurityContext::user(7, false).can_modify(7));
        assert!(!SecurityContext::user(8, false).can_modify(7));
        assert!(SecurityContext::user(8, true).can_modify(7));
    }
}
