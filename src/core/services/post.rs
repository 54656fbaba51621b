use itertools::Itertools;
use uuid::Uuid;

use crate::core::models::{
    common::Pagination,
    post::{Create, Insert, Post, PostOwner, PostScope, PostView, Update},
    reaction::ReactionTarget,
};
use crate::core::ports::authorizer::{Authorizer, Permission};
use crate::core::ports::repository::{PostCommon, ProfileCommon, Store, TxStore};
use crate::core::services::permission::{check, load_actor, require_permission};
use crate::core::services::reaction::reaction_state;
use crate::error::Error;

const MAX_IMAGES: usize = 10;
const MAX_TAGS: usize = 10;

/// Drops markup and entities so an editor's empty `<p><br></p>` counts as empty.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut chars = html.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '<' if !in_tag && chars.peek().map_or(false, |n| n.is_ascii_alphabetic() || *n == '/' || *n == '!') => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&nbsp;", " ").split_whitespace().join(" ")
}

pub fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>, Error> {
    let tags: Vec<String> = tags
        .into_iter()
        .map(|t| t.trim().trim_start_matches('#').to_lowercase())
        .filter(|t| !t.is_empty())
        .unique()
        .collect();
    if tags.len() > MAX_TAGS {
        return Err(Error::BusinessError(format!("at most {} tags are allowed", MAX_TAGS)));
    }
    Ok(tags)
}

pub(crate) fn validate_body(content: &str, image_urls: &[String]) -> Result<(), Error> {
    if image_urls.len() > MAX_IMAGES {
        return Err(Error::BusinessError(format!("at most {} images are allowed", MAX_IMAGES)));
    }
    if image_urls.iter().any(|u| u.trim().is_empty()) {
        return Err(Error::BusinessError("image url cannot be empty".into()));
    }
    if strip_html(content).is_empty() && image_urls.is_empty() {
        return Err(Error::BusinessError("content cannot be empty".into()));
    }
    Ok(())
}

pub async fn create_post<T, A>(mut store: T, authorizer: &A, uid: Uuid, owner: PostOwner, data: Create) -> Result<i32, Error>
where
    T: TxStore,
    A: Authorizer,
{
    match owner {
        PostOwner::Profile(id) if id != uid => return Err(Error::Forbidden("cannot post as another user".into())),
        PostOwner::Profile(_) => {}
        PostOwner::Organization(org_id) => {
            require_permission(&mut store, authorizer, uid, org_id, Permission::CreatePost).await?;
        }
    }
    validate_body(&data.content, &data.image_urls)?;
    let id = PostCommon::insert(
        &mut store,
        Insert {
            owner,
            author_id: uid,
            content: data.content,
            image_urls: data.image_urls,
            tags: normalize_tags(data.tags)?,
        },
    )
    .await?;
    store.commit().await?;
    Ok(id)
}

async fn view<D>(db: &mut D, viewer: Uuid, scope: PostScope, post: Post) -> Result<PostView, Error>
where
    D: Store,
{
    let state = reaction_state(db, viewer, ReactionTarget::post(scope, post.id)).await?;
    Ok(PostView {
        post,
        scope,
        my_reaction: state.my_reaction,
        reaction_summary: state.summary,
    })
}

pub async fn list_posts<D>(db: &mut D, viewer: Uuid, owner: PostOwner, pagination: Pagination) -> Result<(Vec<PostView>, i64), Error>
where
    D: Store,
{
    let total = PostCommon::count(db, owner).await?;
    let posts = PostCommon::query(db, owner, pagination).await?;
    let mut list = Vec::with_capacity(posts.len());
    for post in posts {
        list.push(view(db, viewer, owner.scope(), post).await?);
    }
    Ok((list, total))
}

pub async fn get_post<D>(db: &mut D, viewer: Uuid, scope: PostScope, id: i32) -> Result<PostView, Error>
where
    D: Store,
{
    let post = PostCommon::get(db, scope, id).await?;
    view(db, viewer, scope, post).await
}

pub async fn update_post<T>(mut store: T, uid: Uuid, scope: PostScope, id: i32, data: Update) -> Result<Post, Error>
where
    T: TxStore,
{
    let post = PostCommon::get(&mut store, scope, id).await?;
    if post.author_id != uid {
        return Err(Error::Forbidden("only the author can edit a post".into()));
    }
    validate_body(&data.content, &data.image_urls)?;
    PostCommon::update(
        &mut store,
        scope,
        id,
        Update {
            tags: normalize_tags(data.tags)?,
            ..data
        },
    )
    .await?;
    let post = PostCommon::get(&mut store, scope, id).await?;
    store.commit().await?;
    Ok(post)
}

/// Whether `uid` may remove content attached to `post` that it did not write.
pub(crate) async fn can_moderate<S, A>(store: &mut S, authorizer: &A, uid: Uuid, post: &Post) -> Result<bool, Error>
where
    S: Store,
    A: Authorizer,
{
    match post.organization_id {
        Some(org_id) => {
            let actor = load_actor(store, uid, org_id).await?;
            check(authorizer, &actor, Permission::ModeratePosts)
        }
        None => Ok(ProfileCommon::get(store, uid).await?.is_omega_admin),
    }
}

pub async fn delete_post<T, A>(mut store: T, authorizer: &A, uid: Uuid, scope: PostScope, id: i32) -> Result<(), Error>
where
    T: TxStore,
    A: Authorizer,
{
    let post = PostCommon::get(&mut store, scope, id).await?;
    if post.author_id != uid && !can_moderate(&mut store, authorizer, uid, &post).await? {
        return Err(Error::Forbidden("cannot delete this post".into()));
    }
    PostCommon::delete(&mut store, scope, id).await?;
    store.commit().await?;
    log::info!("{:?} post {} deleted by {}", scope, id, uid);
    Ok(())
}
