use chrono::{Datelike, Utc};
use itertools::Itertools;
use uuid::Uuid;

use crate::core::models::{
    common::{blank_to_none, patch_text},
    membership::{Insert as MembershipInsert, Role},
    organization::{Block, Create, ImpactDocument, Insert, MissionUpdate, NorthStarDocument, Organization, OrganizationDetail, Patch, Update},
    social::{FollowEdge, FollowTarget},
};
use crate::core::ports::authorizer::{Authorizer, Permission};
use crate::core::ports::repository::{BookmarkCommon, DocumentCommon, FollowCommon, MembershipCommon, OrganizationCommon, Store, TxStore};
use crate::core::services::permission::require_permission;
use crate::error::Error;

const MAX_FOCUS_AREAS: usize = 10;
const MAX_SPOTLIGHTS: usize = 12;
const MAX_TESTIMONIALS: usize = 12;
const MAX_BLOCKS: usize = 50;
const EARLIEST_FOUNDING_YEAR: i32 = 1800;

pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .join("-")
}

/// Trims, drops blanks and case-insensitive duplicates, keeps first spelling.
pub fn normalize_focus_areas(areas: Vec<String>) -> Result<Vec<String>, Error> {
    let areas: Vec<String> = areas
        .into_iter()
        .map(|a| a.trim().to_owned())
        .filter(|a| !a.is_empty())
        .unique_by(|a| a.to_lowercase())
        .collect();
    if areas.len() > MAX_FOCUS_AREAS {
        return Err(Error::BusinessError(format!("at most {} focus areas are allowed", MAX_FOCUS_AREAS)));
    }
    Ok(areas)
}

pub async fn create_organization<T>(mut store: T, uid: Uuid, data: Create) -> Result<i32, Error>
where
    T: TxStore,
{
    let name = blank_to_none(Some(data.name)).ok_or_else(|| Error::BusinessError("organization name cannot be empty".into()))?;
    let slug = slugify(data.slug.as_deref().unwrap_or(&name));
    if slug.is_empty() {
        return Err(Error::BusinessError(format!("cannot derive a slug from {:?}", name)));
    }
    if OrganizationCommon::slug_exists(&mut store, &slug).await? {
        return Err(Error::BusinessError(format!("organization which has the same slug already exists(slug: {})", slug)));
    }
    let focus_areas = normalize_focus_areas(data.focus_areas)?;
    let id = OrganizationCommon::insert(
        &mut store,
        Insert {
            slug,
            name,
            org_type: data.org_type.as_str().into(),
            description: blank_to_none(data.description),
            location: blank_to_none(data.location),
            website: blank_to_none(data.website),
        },
    )
    .await?;
    OrganizationCommon::replace_focus_areas(&mut store, id, focus_areas).await?;
    MembershipCommon::insert(
        &mut store,
        MembershipInsert {
            organization_id: id,
            profile_id: uid,
            role: Role::SuperAdmin,
            is_public: true,
        },
    )
    .await?;
    store.commit().await?;
    log::info!("organization {} created by {}", id, uid);
    Ok(id)
}

async fn detail<D>(db: &mut D, viewer: Uuid, organization: Organization) -> Result<OrganizationDetail, Error>
where
    D: Store,
{
    let id = organization.id;
    let focus_areas = OrganizationCommon::focus_areas(db, id).await?;
    let members_count = MembershipCommon::count(db, id).await?;
    let followers_count = FollowCommon::count_followers(db, FollowTarget::Organization(id)).await?;
    let is_following = FollowCommon::exists(
        db,
        &FollowEdge {
            follower_id: viewer,
            target: FollowTarget::Organization(id),
        },
    )
    .await?;
    let is_bookmarked = BookmarkCommon::exists(db, viewer, id).await?;
    let my_role = MembershipCommon::get(db, id, viewer).await?.map(|m| m.role);
    Ok(OrganizationDetail {
        organization,
        focus_areas,
        members_count,
        followers_count,
        is_following,
        is_bookmarked,
        my_role,
    })
}

pub async fn organization_detail<D>(db: &mut D, viewer: Uuid, id: i32) -> Result<OrganizationDetail, Error>
where
    D: Store,
{
    let organization = OrganizationCommon::get(db, id).await?;
    detail(db, viewer, organization).await
}

pub async fn organization_detail_by_slug<D>(db: &mut D, viewer: Uuid, slug: &str) -> Result<OrganizationDetail, Error>
where
    D: Store,
{
    let organization = OrganizationCommon::get_by_slug(db, slug)
        .await?
        .ok_or_else(|| Error::NotFound(format!("organization(slug: {})", slug)))?;
    detail(db, viewer, organization).await
}

pub async fn update_organization<T, A>(mut store: T, authorizer: &A, uid: Uuid, id: i32, patch: Patch) -> Result<Organization, Error>
where
    T: TxStore,
    A: Authorizer,
{
    require_permission(&mut store, authorizer, uid, id, Permission::EditOrganization).await?;
    let org = OrganizationCommon::get_for_update(&mut store, id).await?;
    let mut update = Update::from(&org);
    if let Some(name) = patch.name {
        update.name = blank_to_none(Some(name)).ok_or_else(|| Error::BusinessError("organization name cannot be empty".into()))?;
    }
    if let Some(org_type) = patch.org_type {
        update.org_type = org_type.as_str().into();
    }
    match patch.year_founded {
        Some(Some(year)) => {
            let this_year = Utc::now().year();
            if !(EARLIEST_FOUNDING_YEAR..=this_year).contains(&year) {
                return Err(Error::BusinessError(format!("invalid founding year({})", year)));
            }
            update.year_founded = Some(year);
        }
        Some(None) => update.year_founded = None,
        None => {}
    }
    update.description = patch_text(update.description, patch.description);
    update.image_url = patch_text(update.image_url, patch.image_url);
    update.banner_image_url = patch_text(update.banner_image_url, patch.banner_image_url);
    update.location = patch_text(update.location, patch.location);
    update.website = patch_text(update.website, patch.website);
    update.ein = patch_text(update.ein, patch.ein);
    OrganizationCommon::update(&mut store, id, update).await?;
    if let Some(areas) = patch.focus_areas {
        OrganizationCommon::replace_focus_areas(&mut store, id, normalize_focus_areas(areas)?).await?;
    }
    let org = OrganizationCommon::get(&mut store, id).await?;
    store.commit().await?;
    Ok(org)
}

pub async fn update_mission<T, A>(mut store: T, authorizer: &A, uid: Uuid, id: i32, data: MissionUpdate) -> Result<Organization, Error>
where
    T: TxStore,
    A: Authorizer,
{
    require_permission(&mut store, authorizer, uid, id, Permission::EditOrganization).await?;
    let org = OrganizationCommon::get_for_update(&mut store, id).await?;
    let mut update = Update::from(&org);
    update.mission = patch_text(update.mission, data.mission);
    update.mission_image_url = patch_text(update.mission_image_url, data.mission_image_url);
    OrganizationCommon::update(&mut store, id, update).await?;
    let org = OrganizationCommon::get(&mut store, id).await?;
    store.commit().await?;
    Ok(org)
}

pub async fn delete_organization<T, A>(mut store: T, authorizer: &A, uid: Uuid, id: i32) -> Result<(), Error>
where
    T: TxStore,
    A: Authorizer,
{
    require_permission(&mut store, authorizer, uid, id, Permission::DeleteOrganization).await?;
    OrganizationCommon::delete(&mut store, id).await?;
    store.commit().await?;
    log::warn!("organization {} deleted by {}", id, uid);
    Ok(())
}

fn required(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::BusinessError(format!("{} cannot be empty", field)));
    }
    Ok(())
}

pub fn validate_impact(doc: &ImpactDocument) -> Result<(), Error> {
    if doc.spotlights.len() > MAX_SPOTLIGHTS || doc.testimonials.len() > MAX_TESTIMONIALS {
        return Err(Error::BusinessError("too many impact entries".into()));
    }
    for s in &doc.spotlights {
        required("spotlight title", &s.title)?;
        required("spotlight description", &s.description)?;
    }
    for t in &doc.testimonials {
        required("testimonial quote", &t.quote)?;
        required("testimonial author", &t.author)?;
    }
    Ok(())
}

pub fn validate_north_star(doc: &NorthStarDocument) -> Result<(), Error> {
    if doc.blocks.len() > MAX_BLOCKS {
        return Err(Error::BusinessError(format!("at most {} blocks are allowed", MAX_BLOCKS)));
    }
    for block in &doc.blocks {
        match block {
            Block::Heading { text } | Block::Paragraph { text } | Block::Quote { text, .. } => required("block text", text)?,
            Block::Image { url, .. } => required("image url", url)?,
            Block::Stat { label, value } => {
                required("stat label", label)?;
                required("stat value", value)?;
            }
        }
    }
    Ok(())
}

pub async fn impact<D>(db: &mut D, id: i32) -> Result<ImpactDocument, Error>
where
    D: Store,
{
    if !OrganizationCommon::exists(db, id).await? {
        return Err(Error::NotFound(format!("organization(id: {})", id)));
    }
    Ok(DocumentCommon::get_impact(db, id).await?.unwrap_or_default())
}

pub async fn put_impact<T, A>(mut store: T, authorizer: &A, uid: Uuid, id: i32, doc: ImpactDocument) -> Result<ImpactDocument, Error>
where
    T: TxStore,
    A: Authorizer,
{
    require_permission(&mut store, authorizer, uid, id, Permission::EditOrganization).await?;
    validate_impact(&doc)?;
    DocumentCommon::put_impact(&mut store, id, doc.clone()).await?;
    store.commit().await?;
    Ok(doc)
}

pub async fn north_star<D>(db: &mut D, id: i32) -> Result<NorthStarDocument, Error>
where
    D: Store,
{
    if !OrganizationCommon::exists(db, id).await? {
        return Err(Error::NotFound(format!("organization(id: {})", id)));
    }
    Ok(DocumentCommon::get_north_star(db, id).await?.unwrap_or_default())
}

pub async fn put_north_star<T, A>(mut store: T, authorizer: &A, uid: Uuid, id: i32, doc: NorthStarDocument) -> Result<NorthStarDocument, Error>
where
    T: TxStore,
    A: Authorizer,
{
    require_permission(&mut store, authorizer, uid, id, Permission::EditOrganization).await?;
    validate_north_star(&doc)?;
    DocumentCommon::put_north_star(&mut store, id, doc.clone()).await?;
    store.commit().await?;
    Ok(doc)
}
