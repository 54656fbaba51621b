use uuid::Uuid;

use crate::core::models::{membership::Membership, membership::Role, profile::Profile};
use crate::core::ports::authorizer::{Authorizer, Permission};
use crate::core::ports::repository::{MembershipCommon, OrganizationCommon, ProfileCommon, Store};
use crate::error::Error;

/// The current user as seen from one organization.
#[derive(Debug, Clone)]
pub struct Actor {
    pub profile: Profile,
    pub membership: Option<Membership>,
}

impl Actor {
    pub fn role(&self) -> Option<Role> {
        self.membership.as_ref().map(|m| m.role)
    }

    pub fn is_omega_admin(&self) -> bool {
        self.profile.is_omega_admin
    }
}

pub fn has_permission<A>(authorizer: &A, role: Option<Role>, is_omega_admin: bool, permission: Permission) -> Result<bool, Error>
where
    A: Authorizer,
{
    if is_omega_admin {
        return Ok(true);
    }
    match role {
        Some(role) => authorizer.allows(role, permission),
        None => Ok(false),
    }
}

pub async fn load_actor<S>(store: &mut S, uid: Uuid, organization_id: i32) -> Result<Actor, Error>
where
    S: Store,
{
    if !OrganizationCommon::exists(store, organization_id).await? {
        return Err(Error::NotFound(format!("organization(id: {})", organization_id)));
    }
    let profile = ProfileCommon::get(store, uid).await?;
    let membership = MembershipCommon::get(store, organization_id, uid).await?;
    Ok(Actor { profile, membership })
}

pub fn check<A>(authorizer: &A, actor: &Actor, permission: Permission) -> Result<bool, Error>
where
    A: Authorizer,
{
    has_permission(authorizer, actor.role(), actor.is_omega_admin(), permission)
}

pub fn ensure<A>(authorizer: &A, actor: &Actor, permission: Permission) -> Result<(), Error>
where
    A: Authorizer,
{
    if !check(authorizer, actor, permission)? {
        return Err(Error::Forbidden(permission.as_str().into()));
    }
    Ok(())
}

pub async fn require_permission<S, A>(store: &mut S, authorizer: &A, uid: Uuid, organization_id: i32, permission: Permission) -> Result<Actor, Error>
where
    S: Store,
    A: Authorizer,
{
    let actor = load_actor(store, uid, organization_id).await?;
    ensure(authorizer, &actor, permission)?;
    Ok(actor)
}
