use uuid::Uuid;

use crate::core::models::reaction::{ReactionCount, ReactionEntity, ReactionState, ReactionTarget, ReactionType, Reactor};
use crate::core::ports::repository::{CommentCommon, PostCommon, ReactionCommon, Store, TxStore};
use crate::error::Error;

/// Tallies reaction rows into non-zero counts, most frequent first; ties
/// follow the declaration order of `ReactionType`.
pub fn summarize<I>(reactions: I) -> Vec<ReactionCount>
where
    I: IntoIterator<Item = ReactionType>,
{
    let mut counts = [0i64; 4];
    for r in reactions {
        counts[r as usize] += 1;
    }
    let mut summary: Vec<ReactionCount> = ReactionType::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(reaction_type, count)| ReactionCount {
            reaction_type: *reaction_type,
            count,
        })
        .collect();
    summary.sort_by(|a, b| b.count.cmp(&a.count).then(a.reaction_type.cmp(&b.reaction_type)));
    summary
}

async fn ensure_target<S>(store: &mut S, target: ReactionTarget) -> Result<(), Error>
where
    S: Store,
{
    match target.entity {
        ReactionEntity::Post => PostCommon::get(store, target.scope, target.id).await.map(|_| ()),
        ReactionEntity::Comment => CommentCommon::get(store, target.scope, target.id).await.map(|_| ()),
    }
}

/// Posts carry `likes_count`, so their row is locked before the reaction
/// rows change.
async fn lock_target<S>(store: &mut S, target: ReactionTarget) -> Result<(), Error>
where
    S: Store,
{
    match target.entity {
        ReactionEntity::Post => PostCommon::get_for_update(store, target.scope, target.id).await.map(|_| ()),
        ReactionEntity::Comment => ensure_target(store, target).await,
    }
}

pub async fn reaction_state<D>(db: &mut D, viewer: Uuid, target: ReactionTarget) -> Result<ReactionState, Error>
where
    D: Store,
{
    let rows = ReactionCommon::query(db, target).await?;
    let my_reaction = rows.iter().find(|r| r.user_id == viewer).map(|r| r.reaction_type);
    Ok(ReactionState {
        total: rows.len() as i64,
        summary: summarize(rows.iter().map(|r| r.reaction_type)),
        my_reaction,
    })
}

async fn refresh_counter<S>(store: &mut S, target: ReactionTarget) -> Result<(), Error>
where
    S: Store,
{
    if target.entity == ReactionEntity::Post {
        PostCommon::refresh_likes_count(store, target.scope, target.id).await?;
    }
    Ok(())
}

pub async fn react<T>(mut store: T, uid: Uuid, target: ReactionTarget, reaction_type: ReactionType) -> Result<ReactionState, Error>
where
    T: TxStore,
{
    lock_target(&mut store, target).await?;
    ReactionCommon::upsert(&mut store, target, uid, reaction_type).await?;
    refresh_counter(&mut store, target).await?;
    let state = reaction_state(&mut store, uid, target).await?;
    store.commit().await?;
    Ok(state)
}

pub async fn remove_reaction<T>(mut store: T, uid: Uuid, target: ReactionTarget) -> Result<ReactionState, Error>
where
    T: TxStore,
{
    lock_target(&mut store, target).await?;
    if ReactionCommon::delete(&mut store, target, uid).await? {
        refresh_counter(&mut store, target).await?;
    }
    let state = reaction_state(&mut store, uid, target).await?;
    store.commit().await?;
    Ok(state)
}

pub async fn reactors<D>(db: &mut D, target: ReactionTarget, filter: Option<ReactionType>) -> Result<Vec<Reactor>, Error>
where
    D: Store,
{
    ensure_target(db, target).await?;
    let rows = ReactionCommon::query(db, target).await?;
    Ok(rows.into_iter().filter(|r| filter.map_or(true, |f| r.reaction_type == f)).collect())
}
