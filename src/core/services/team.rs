use itertools::Itertools;
use uuid::Uuid;

use crate::core::models::membership::{Insert, MemberAdd, MemberDetail, Membership, Role, TeamCategory, TeamGroup};
use crate::core::ports::authorizer::{Authorizer, Permission};
use crate::core::ports::repository::{MembershipCommon, OrganizationCommon, ProfileCommon, Store, TxStore};
use crate::core::services::permission::{ensure, load_actor, require_permission, Actor};
use crate::error::Error;

const LEADERSHIP_KEYWORDS: [&str; 6] = ["founder", "ceo", "chief", "president", "director", "executive"];
const BOARD_KEYWORDS: [&str; 3] = ["board", "trustee", "chair"];

fn is_volunteer_title(title: &str) -> bool {
    title
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word.starts_with("volunteer") || word == "intern" || word == "interns")
}

/// Leadership keywords win over board ones, so "Board President" is leadership.
pub fn categorize(member: &MemberDetail) -> TeamCategory {
    if member.role == Role::SuperAdmin {
        return TeamCategory::Leadership;
    }
    let title = match member.title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => return TeamCategory::Members,
    };
    let has = |keywords: &[&str]| keywords.iter().any(|k| title.contains(k));
    if has(&LEADERSHIP_KEYWORDS) {
        TeamCategory::Leadership
    } else if has(&BOARD_KEYWORDS) {
        TeamCategory::Board
    } else if is_volunteer_title(&title) {
        TeamCategory::Volunteers
    } else {
        TeamCategory::Staff
    }
}

pub fn group_members(members: Vec<MemberDetail>) -> Vec<TeamGroup> {
    let grouped = members
        .into_iter()
        .sorted_by_key(|m| (categorize(m), m.full_name.to_lowercase()))
        .group_by(|m| categorize(m));
    let mut groups = Vec::new();
    for (category, members) in &grouped {
        groups.push(TeamGroup {
            category,
            members: members.collect(),
        });
    }
    groups
}

fn can_see_private(actor: &Actor) -> bool {
    actor.membership.is_some() || actor.is_omega_admin()
}

pub async fn list_members<D>(db: &mut D, uid: Uuid, organization_id: i32) -> Result<Vec<MemberDetail>, Error>
where
    D: Store,
{
    let actor = load_actor(db, uid, organization_id).await?;
    let members = MembershipCommon::query(db, organization_id).await?;
    if can_see_private(&actor) {
        return Ok(members);
    }
    Ok(members.into_iter().filter(|m| m.is_public).collect())
}

pub async fn team<D>(db: &mut D, uid: Uuid, organization_id: i32) -> Result<Vec<TeamGroup>, Error>
where
    D: Store,
{
    let members = list_members(db, uid, organization_id).await?;
    Ok(group_members(members))
}

pub async fn add_member<T, A>(mut store: T, authorizer: &A, uid: Uuid, organization_id: i32, data: MemberAdd) -> Result<(), Error>
where
    T: TxStore,
    A: Authorizer,
{
    let actor = require_permission(&mut store, authorizer, uid, organization_id, Permission::ManageMembers).await?;
    if data.role.is_privileged() {
        ensure(authorizer, &actor, Permission::ManageAdmins)?;
    }
    if !ProfileCommon::exists(&mut store, data.profile_id).await? {
        return Err(Error::NotFound(format!("profile(id: {})", data.profile_id)));
    }
    if MembershipCommon::get(&mut store, organization_id, data.profile_id).await?.is_some() {
        return Err(Error::BusinessError("profile is already a member of the organization".into()));
    }
    MembershipCommon::insert(
        &mut store,
        Insert {
            organization_id,
            profile_id: data.profile_id,
            role: data.role,
            is_public: data.is_public,
        },
    )
    .await?;
    store.commit().await?;
    Ok(())
}

async fn target_membership<S>(store: &mut S, organization_id: i32, profile_id: Uuid) -> Result<Membership, Error>
where
    S: Store,
{
    MembershipCommon::get(store, organization_id, profile_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("membership(profile: {})", profile_id)))
}

async fn ensure_not_last_super_admin<S>(store: &mut S, target: &Membership) -> Result<(), Error>
where
    S: Store,
{
    if target.role == Role::SuperAdmin && MembershipCommon::count_role(store, target.organization_id, Role::SuperAdmin).await? <= 1 {
        return Err(Error::BusinessError("an organization must keep at least one super admin".into()));
    }
    Ok(())
}

pub async fn change_role<T, A>(mut store: T, authorizer: &A, uid: Uuid, organization_id: i32, profile_id: Uuid, role: Role) -> Result<(), Error>
where
    T: TxStore,
    A: Authorizer,
{
    OrganizationCommon::get_for_update(&mut store, organization_id).await?;
    let actor = require_permission(&mut store, authorizer, uid, organization_id, Permission::ManageMembers).await?;
    let target = target_membership(&mut store, organization_id, profile_id).await?;
    if target.role == role {
        return Ok(());
    }
    if target.role.is_privileged() || role.is_privileged() {
        ensure(authorizer, &actor, Permission::ManageAdmins)?;
    }
    ensure_not_last_super_admin(&mut store, &target).await?;
    MembershipCommon::update_role(&mut store, organization_id, profile_id, role).await?;
    store.commit().await?;
    log::info!("{} changed role of {} in organization {} to {}", uid, profile_id, organization_id, role.as_str());
    Ok(())
}

pub async fn remove_member<T, A>(mut store: T, authorizer: &A, uid: Uuid, organization_id: i32, profile_id: Uuid) -> Result<(), Error>
where
    T: TxStore,
    A: Authorizer,
{
    OrganizationCommon::get_for_update(&mut store, organization_id).await?;
    let target = if uid == profile_id {
        load_actor(&mut store, uid, organization_id).await?;
        target_membership(&mut store, organization_id, profile_id).await?
    } else {
        let actor = require_permission(&mut store, authorizer, uid, organization_id, Permission::ManageMembers).await?;
        let target = target_membership(&mut store, organization_id, profile_id).await?;
        if target.role.is_privileged() {
            ensure(authorizer, &actor, Permission::ManageAdmins)?;
        }
        target
    };
    ensure_not_last_super_admin(&mut store, &target).await?;
    MembershipCommon::delete(&mut store, organization_id, profile_id).await?;
    store.commit().await?;
    Ok(())
}

pub async fn set_member_visibility<T, A>(mut store: T, authorizer: &A, uid: Uuid, organization_id: i32, profile_id: Uuid, is_public: bool) -> Result<(), Error>
where
    T: TxStore,
    A: Authorizer,
{
    if uid == profile_id {
        load_actor(&mut store, uid, organization_id).await?;
    } else {
        require_permission(&mut store, authorizer, uid, organization_id, Permission::ManageMembers).await?;
    }
    target_membership(&mut store, organization_id, profile_id).await?;
    MembershipCommon::update_visibility(&mut store, organization_id, profile_id, is_public).await?;
    store.commit().await?;
    Ok(())
}
