use itertools::Itertools;
use uuid::Uuid;

use crate::core::models::comment::{Comment, Create, Insert, Mention, Update};
use crate::core::models::post::PostScope;
use crate::core::ports::authorizer::Authorizer;
use crate::core::ports::repository::{CommentCommon, OrganizationCommon, PostCommon, ProfileCommon, Store, TxStore};
use crate::core::services::post::{can_moderate, validate_body};
use crate::error::Error;

const MAX_MENTIONS: usize = 20;

/// Drops repeated mentions and rejects ones pointing at nothing.
pub async fn validate_mentions<S>(store: &mut S, mentions: Vec<Mention>) -> Result<Vec<Mention>, Error>
where
    S: Store,
{
    let mentions: Vec<Mention> = mentions
        .into_iter()
        .unique_by(|m| match m {
            Mention::Profile { id, .. } => id.to_string(),
            Mention::Organization { id, .. } => id.to_string(),
        })
        .collect();
    if mentions.len() > MAX_MENTIONS {
        return Err(Error::BusinessError(format!("at most {} mentions are allowed", MAX_MENTIONS)));
    }
    for m in &mentions {
        let exists = match m {
            Mention::Profile { id, .. } => ProfileCommon::exists(store, *id).await?,
            Mention::Organization { id, .. } => OrganizationCommon::exists(store, *id).await?,
        };
        if !exists {
            return Err(Error::BusinessError(format!("mentioned entity does not exist({:?})", m)));
        }
    }
    Ok(mentions)
}

pub async fn list_comments<D>(db: &mut D, scope: PostScope, post_id: i32) -> Result<Vec<Comment>, Error>
where
    D: Store,
{
    PostCommon::get(db, scope, post_id).await?;
    CommentCommon::query(db, scope, post_id).await
}

pub async fn add_comment<T>(mut store: T, uid: Uuid, scope: PostScope, post_id: i32, data: Create) -> Result<Comment, Error>
where
    T: TxStore,
{
    PostCommon::get_for_update(&mut store, scope, post_id).await?;
    validate_body(&data.content, &data.image_urls)?;
    let mentions = validate_mentions(&mut store, data.mentions).await?;
    let id = CommentCommon::insert(
        &mut store,
        scope,
        Insert {
            post_id,
            author_id: uid,
            content: data.content,
            image_urls: data.image_urls,
            mentions,
        },
    )
    .await?;
    PostCommon::refresh_comments_count(&mut store, scope, post_id).await?;
    let comment = CommentCommon::get(&mut store, scope, id).await?;
    store.commit().await?;
    Ok(comment)
}

pub async fn edit_comment<T>(mut store: T, uid: Uuid, scope: PostScope, id: i32, data: Update) -> Result<Comment, Error>
where
    T: TxStore,
{
    let comment = CommentCommon::get(&mut store, scope, id).await?;
    if comment.author_id != uid {
        return Err(Error::Forbidden("only the author can edit a comment".into()));
    }
    validate_body(&data.content, &data.image_urls)?;
    let mentions = validate_mentions(&mut store, data.mentions).await?;
    CommentCommon::update(&mut store, scope, id, Update { mentions, ..data }).await?;
    let comment = CommentCommon::get(&mut store, scope, id).await?;
    store.commit().await?;
    Ok(comment)
}

pub async fn delete_comment<T, A>(mut store: T, authorizer: &A, uid: Uuid, scope: PostScope, id: i32) -> Result<(), Error>
where
    T: TxStore,
    A: Authorizer,
{
    let comment = CommentCommon::get(&mut store, scope, id).await?;
    let post = PostCommon::get_for_update(&mut store, scope, comment.post_id).await?;
    if comment.author_id != uid && post.author_id != uid && !can_moderate(&mut store, authorizer, uid, &post).await? {
        return Err(Error::Forbidden("cannot delete this comment".into()));
    }
    CommentCommon::delete(&mut store, scope, id).await?;
    let count = PostCommon::refresh_comments_count(&mut store, scope, post.id).await?;
    store.commit().await?;
    log::debug!("{:?} post {} has {} comments", scope, post.id, count);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::membership::Role;
    use crate::core::models::post::{Create as PostCreate, PostOwner};
    use crate::core::ports::memory::MemoryStore;
    use crate::core::services::post::create_post;
    use crate::impls::authorizer::casbin::CasbinAuthorizer;

    fn text(content: &str) -> Create {
        Create {
            content: content.into(),
            image_urls: vec![],
            mentions: vec![],
        }
    }

    async fn org_post(db: &MemoryStore, authorizer: &CasbinAuthorizer) -> (Uuid, i32, i32) {
        let owner = db.seed_profile("Owner", false);
        let org = db.seed_organization("River Keepers", owner);
        let post = PostCreate {
            content: "Volunteer day Saturday".into(),
            image_urls: vec![],
            tags: vec![],
        };
        let id = create_post(db.tx(), authorizer, owner, PostOwner::Organization(org), post).await.unwrap();
        (owner, org, id)
    }

    #[tokio::test]
    async fn test_delete_comment_refreshes_count_once() {
        let authorizer = CasbinAuthorizer::new().await.unwrap();
        let db = MemoryStore::new();
        let (_, _, post_id) = org_post(&db, &authorizer).await;
        let me = db.seed_profile("Commenter", false);
        let scope = PostScope::Organization;

        let first = add_comment(db.tx(), me, scope, post_id, text("<p>Count me in</p>")).await.unwrap();
        add_comment(db.tx(), me, scope, post_id, text("Bringing gloves")).await.unwrap();
        assert_eq!(PostCommon::get(&mut db.tx(), scope, post_id).await.unwrap().comments_count, 2);

        let before = db.snapshot().comment_count_refreshes;
        delete_comment(db.tx(), &authorizer, me, scope, first.id).await.unwrap();
        assert_eq!(db.snapshot().comment_count_refreshes, before + 1);

        let comments = list_comments(&mut db.tx(), scope, post_id).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, "Bringing gloves");
        assert_eq!(comments[0].author_name, "Commenter");
        assert_eq!(PostCommon::get(&mut db.tx(), scope, post_id).await.unwrap().comments_count, 1);
    }

    #[tokio::test]
    async fn test_comment_mutations_lock_post() {
        let authorizer = CasbinAuthorizer::new().await.unwrap();
        let db = MemoryStore::new();
        let (_, _, post_id) = org_post(&db, &authorizer).await;
        let me = db.seed_profile("Commenter", false);
        let scope = PostScope::Organization;

        let comment = add_comment(db.tx(), me, scope, post_id, text("On my way")).await.unwrap();
        assert_eq!(db.snapshot().post_locks, vec![(scope, post_id)]);
        delete_comment(db.tx(), &authorizer, me, scope, comment.id).await.unwrap();
        assert_eq!(db.snapshot().post_locks, vec![(scope, post_id), (scope, post_id)]);
        assert_eq!(PostCommon::get(&mut db.tx(), scope, post_id).await.unwrap().comments_count, 0);
    }

    #[tokio::test]
    async fn test_comment_permissions() {
        let authorizer = CasbinAuthorizer::new().await.unwrap();
        let db = MemoryStore::new();
        let (owner, org, post_id) = org_post(&db, &authorizer).await;
        let author = db.seed_profile("Commenter", false);
        let member = db.seed_profile("Member", false);
        db.seed_membership(org, member, Role::Member);
        let scope = PostScope::Organization;

        let comment = add_comment(db.tx(), author, scope, post_id, text("first!")).await.unwrap();
        let res = edit_comment(db.tx(), member, scope, comment.id, Update { content: "x".into(), image_urls: vec![], mentions: vec![] }).await;
        assert!(matches!(res, Err(Error::Forbidden(_))));
        let edited = edit_comment(db.tx(), author, scope, comment.id, Update { content: "second".into(), image_urls: vec![], mentions: vec![] })
            .await
            .unwrap();
        assert_eq!(edited.content, "second");

        let res = delete_comment(db.tx(), &authorizer, member, scope, comment.id).await;
        assert!(matches!(res, Err(Error::Forbidden(_))));
        delete_comment(db.tx(), &authorizer, owner, scope, comment.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_mentions_validated() {
        let authorizer = CasbinAuthorizer::new().await.unwrap();
        let db = MemoryStore::new();
        let (owner, org, post_id) = org_post(&db, &authorizer).await;
        let scope = PostScope::Organization;
        let mention = Mention::Profile {
            id: owner,
            name: "Owner".into(),
        };
        let data = Create {
            content: "thanks @Owner and @River Keepers".into(),
            image_urls: vec![],
            mentions: vec![
                mention.clone(),
                mention.clone(),
                Mention::Organization {
                    id: org,
                    name: "River Keepers".into(),
                },
            ],
        };
        let comment = add_comment(db.tx(), owner, scope, post_id, data).await.unwrap();
        assert_eq!(comment.mentions.0.len(), 2);

        let data = Create {
            content: "hello @ghost".into(),
            image_urls: vec![],
            mentions: vec![Mention::Profile {
                id: Uuid::new_v4(),
                name: "ghost".into(),
            }],
        };
        let res = add_comment(db.tx(), owner, scope, post_id, data).await;
        assert!(matches!(res, Err(Error::BusinessError(_))));
    }
}
