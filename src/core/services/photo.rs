use std::collections::HashSet;

use uuid::Uuid;

use crate::core::models::common::{blank_to_none, patch_text};
use crate::core::models::photo::{Create, Insert, Patch, Photo, Update};
use crate::core::ports::authorizer::{Authorizer, Permission};
use crate::core::ports::repository::{OrganizationCommon, PhotoCommon, Store, TxStore};
use crate::core::services::permission::require_permission;
use crate::error::Error;

/// Featured photo first, then by display order.
pub async fn list_photos<D>(db: &mut D, organization_id: i32) -> Result<Vec<Photo>, Error>
where
    D: Store,
{
    if !OrganizationCommon::exists(db, organization_id).await? {
        return Err(Error::NotFound(format!("organization(id: {})", organization_id)));
    }
    let mut photos = PhotoCommon::query(db, organization_id).await?;
    photos.sort_by_key(|p| (!p.is_featured, p.display_order, p.id));
    Ok(photos)
}

async fn owned_photo<S>(store: &mut S, organization_id: i32, photo_id: i32) -> Result<Photo, Error>
where
    S: Store,
{
    let photo = PhotoCommon::get(store, photo_id).await?;
    if photo.organization_id != organization_id {
        return Err(Error::NotFound(format!("photo(id: {})", photo_id)));
    }
    Ok(photo)
}

pub async fn add_photo<T, A>(mut store: T, authorizer: &A, uid: Uuid, organization_id: i32, data: Create) -> Result<i32, Error>
where
    T: TxStore,
    A: Authorizer,
{
    require_permission(&mut store, authorizer, uid, organization_id, Permission::ManagePhotos).await?;
    let image_url = blank_to_none(Some(data.image_url)).ok_or_else(|| Error::BusinessError("image url cannot be empty".into()))?;
    if data.is_featured {
        PhotoCommon::clear_featured(&mut store, organization_id).await?;
    }
    let display_order = PhotoCommon::next_display_order(&mut store, organization_id).await?;
    let id = PhotoCommon::insert(
        &mut store,
        Insert {
            organization_id,
            image_url,
            caption: blank_to_none(data.caption),
            alt_text: blank_to_none(data.alt_text),
            is_featured: data.is_featured,
            display_order,
        },
    )
    .await?;
    store.commit().await?;
    Ok(id)
}

pub async fn update_photo<T, A>(mut store: T, authorizer: &A, uid: Uuid, organization_id: i32, photo_id: i32, patch: Patch) -> Result<Photo, Error>
where
    T: TxStore,
    A: Authorizer,
{
    require_permission(&mut store, authorizer, uid, organization_id, Permission::ManagePhotos).await?;
    let photo = owned_photo(&mut store, organization_id, photo_id).await?;
    let is_featured = patch.is_featured.unwrap_or(photo.is_featured);
    if is_featured && !photo.is_featured {
        PhotoCommon::clear_featured(&mut store, organization_id).await?;
    }
    PhotoCommon::update(
        &mut store,
        photo_id,
        Update {
            caption: patch_text(photo.caption, patch.caption),
            alt_text: patch_text(photo.alt_text, patch.alt_text),
            is_featured,
        },
    )
    .await?;
    let photo = PhotoCommon::get(&mut store, photo_id).await?;
    store.commit().await?;
    Ok(photo)
}

pub async fn delete_photo<T, A>(mut store: T, authorizer: &A, uid: Uuid, organization_id: i32, photo_id: i32) -> Result<(), Error>
where
    T: TxStore,
    A: Authorizer,
{
    require_permission(&mut store, authorizer, uid, organization_id, Permission::ManagePhotos).await?;
    owned_photo(&mut store, organization_id, photo_id).await?;
    PhotoCommon::delete(&mut store, photo_id).await?;
    store.commit().await?;
    Ok(())
}

/// `ids` must list every photo of the organization exactly once; each photo
/// takes its position as display order.
pub async fn reorder_photos<T, A>(mut store: T, authorizer: &A, uid: Uuid, organization_id: i32, ids: Vec<i32>) -> Result<Vec<Photo>, Error>
where
    T: TxStore,
    A: Authorizer,
{
    require_permission(&mut store, authorizer, uid, organization_id, Permission::ManagePhotos).await?;
    let existing: HashSet<i32> = PhotoCommon::query(&mut store, organization_id).await?.into_iter().map(|p| p.id).collect();
    let requested: HashSet<i32> = ids.iter().copied().collect();
    if requested.len() != ids.len() || requested != existing {
        return Err(Error::BusinessError("photo order must list every photo of the organization exactly once".into()));
    }
    for (order, id) in ids.into_iter().enumerate() {
        PhotoCommon::set_display_order(&mut store, id, order as i32).await?;
    }
    let mut photos = PhotoCommon::query(&mut store, organization_id).await?;
    store.commit().await?;
    photos.sort_by_key(|p| p.display_order);
    Ok(photos)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::membership::Role;
    use crate::core::ports::memory::MemoryStore;
    use crate::impls::authorizer::casbin::CasbinAuthorizer;

    fn photo(url: &str, featured: bool) -> Create {
        Create {
            image_url: url.into(),
            caption: Some("Volunteers at the river".into()),
            alt_text: None,
            is_featured: featured,
        }
    }

    #[tokio::test]
    async fn test_single_featured_photo() {
        let authorizer = CasbinAuthorizer::new().await.unwrap();
        let db = MemoryStore::new();
        let owner = db.seed_profile("Owner", false);
        let org = db.seed_organization("River Keepers", owner);
        let a = add_photo(db.tx(), &authorizer, owner, org, photo("https://cdn/a.jpg", true)).await.unwrap();
        let b = add_photo(db.tx(), &authorizer, owner, org, photo("https://cdn/b.jpg", true)).await.unwrap();
        let photos = list_photos(&mut db.tx(), org).await.unwrap();
        assert_eq!(photos.iter().filter(|p| p.is_featured).count(), 1);
        assert_eq!(photos[0].id, b);

        update_photo(
            db.tx(),
            &authorizer,
            owner,
            org,
            a,
            Patch {
                is_featured: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let photos = list_photos(&mut db.tx(), org).await.unwrap();
        assert_eq!(photos[0].id, a);
        assert_eq!(photos.iter().filter(|p| p.is_featured).count(), 1);
    }

    #[tokio::test]
    async fn test_reorder_requires_exact_permutation() {
        let authorizer = CasbinAuthorizer::new().await.unwrap();
        let db = MemoryStore::new();
        let owner = db.seed_profile("Owner", false);
        let org = db.seed_organization("River Keepers", owner);
        let a = add_photo(db.tx(), &authorizer, owner, org, photo("https://cdn/a.jpg", false)).await.unwrap();
        let b = add_photo(db.tx(), &authorizer, owner, org, photo("https://cdn/b.jpg", false)).await.unwrap();
        let c = add_photo(db.tx(), &authorizer, owner, org, photo("https://cdn/c.jpg", false)).await.unwrap();

        let bad = reorder_photos(db.tx(), &authorizer, owner, org, vec![c, a]).await;
        assert!(matches!(bad, Err(Error::BusinessError(_))));
        let dup = reorder_photos(db.tx(), &authorizer, owner, org, vec![c, a, a]).await;
        assert!(matches!(dup, Err(Error::BusinessError(_))));

        let photos = reorder_photos(db.tx(), &authorizer, owner, org, vec![c, a, b]).await.unwrap();
        let ids: Vec<i32> = photos.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![c, a, b]);
    }

    #[tokio::test]
    async fn test_members_cannot_manage_photos() {
        let authorizer = CasbinAuthorizer::new().await.unwrap();
        let db = MemoryStore::new();
        let owner = db.seed_profile("Owner", false);
        let member = db.seed_profile("Member", false);
        let org = db.seed_organization("River Keepers", owner);
        db.seed_membership(org, member, Role::Member);
        let id = add_photo(db.tx(), &authorizer, owner, org, photo("https://cdn/a.jpg", false)).await.unwrap();
        let res = add_photo(db.tx(), &authorizer, member, org, photo("https://cdn/b.jpg", false)).await;
        assert!(matches!(res, Err(Error::Forbidden(_))));
        let res = delete_photo(db.tx(), &authorizer, member, org, id).await;
        assert!(matches!(res, Err(Error::Forbidden(_))));
        delete_photo(db.tx(), &authorizer, owner, org, id).await.unwrap();
        assert!(list_photos(&mut db.tx(), org).await.unwrap().is_empty());
    }
}
