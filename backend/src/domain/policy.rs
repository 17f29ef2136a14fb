//! Authorization policy for contact access.
//!
//! A pure decision function: no store access, no side effects. The service
//! resolves the target first and consults the policy with it, so a denied
//! request looks the same whether or not the target id exists.

use super::contact::Contact;
use super::user::UserId;

/// Actions a caller can attempt against the contact resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactAction {
    /// Request the caller's own contact list.
    ViewAny,
    /// Create a new contact owned by the caller.
    Create,
    /// Read a single contact.
    View,
    /// Replace a contact's business fields.
    Update,
    /// Permanently remove a contact.
    Delete,
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Decide whether `user` may perform `action`, optionally against `target`.
///
/// Callers must only reach this with a resolved authenticated identity;
/// unauthenticated requests are rejected upstream.
pub fn decide(user: &UserId, action: ContactAction, target: Option<&Contact>) -> Decision {
    match (action, target) {
        (ContactAction::ViewAny | ContactAction::Create, _) => Decision::Allow,
        (ContactAction::View | ContactAction::Update | ContactAction::Delete, Some(contact)) => {
            if contact.owner == *user {
                Decision::Allow
            } else {
                Decision::Deny
            }
        }
        // Targeted actions without a target never happen through the service;
        // deny rather than guess.
        (ContactAction::View | ContactAction::Update | ContactAction::Delete, None) => {
            Decision::Deny
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contact::{ContactDraft, ContactId, ContactInput};
    use chrono::Utc;
    use rstest::rstest;

    fn contact_owned_by(owner: &UserId) -> Contact {
        let draft = ContactDraft::validate(&ContactInput {
            name: Some("Test Name".into()),
            email: Some("test@email.com".into()),
            birthday: Some("05/14/1988".into()),
            company: Some("ABC String".into()),
        })
        .expect("valid fixture input");
        let now = Utc::now();
        Contact {
            id: ContactId::new(1),
            owner: owner.clone(),
            name: draft.name,
            email: draft.email,
            birthday: draft.birthday,
            company: draft.company,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[case(ContactAction::ViewAny)]
    #[case(ContactAction::Create)]
    fn untargeted_actions_allow_any_authenticated_user(#[case] action: ContactAction) {
        let user = UserId::random();
        assert_eq!(decide(&user, action, None), Decision::Allow);
    }

    #[rstest]
    #[case(ContactAction::View)]
    #[case(ContactAction::Update)]
    #[case(ContactAction::Delete)]
    fn owner_may_act_on_own_contact(#[case] action: ContactAction) {
        let owner = UserId::random();
        let contact = contact_owned_by(&owner);
        assert_eq!(decide(&owner, action, Some(&contact)), Decision::Allow);
    }

    #[rstest]
    #[case(ContactAction::View)]
    #[case(ContactAction::Update)]
    #[case(ContactAction::Delete)]
    fn other_users_are_denied(#[case] action: ContactAction) {
        let owner = UserId::random();
        let intruder = UserId::random();
        let contact = contact_owned_by(&owner);
        assert_eq!(decide(&intruder, action, Some(&contact)), Decision::Deny);
    }

    #[rstest]
    #[case(ContactAction::View)]
    #[case(ContactAction::Update)]
    #[case(ContactAction::Delete)]
    fn targeted_actions_without_a_target_are_denied(#[case] action: ContactAction) {
        let user = UserId::random();
        assert_eq!(decide(&user, action, None), Decision::Deny);
    }
}
