use crate::core::models::mention::MentionCandidate;
use crate::core::ports::repository::{OrganizationCommon, ProfileCommon, Store};
use crate::error::Error;

const MIN_QUERY_LEN: usize = 2;
const PER_KIND_LIMIT: i64 = 5;

/// Escapes `%`, `_` and `\` so the term matches literally inside a LIKE pattern.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Profiles first, then organizations.
pub async fn search_mentions<D>(db: &mut D, query: &str) -> Result<Vec<MentionCandidate>, Error>
where
    D: Store,
{
    let term = query.trim();
    if term.chars().count() < MIN_QUERY_LEN {
        return Ok(Vec::new());
    }
    let profiles = ProfileCommon::search(db, term, PER_KIND_LIMIT).await?;
    let organizations = OrganizationCommon::search(db, term, PER_KIND_LIMIT).await?;
    Ok(profiles
        .into_iter()
        .map(|p| MentionCandidate::Profile {
            id: p.id,
            name: p.full_name,
            avatar_url: p.avatar_url,
        })
        .chain(organizations.into_iter().map(|o| MentionCandidate::Organization {
            id: o.id,
            name: o.name,
            slug: o.slug,
            image_url: o.image_url,
        }))
        .collect())
}
