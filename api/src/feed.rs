//! Feed composition: picks posts for a scope, orders them newest first and
//! cuts out one page.

use crate::{
    dto::{PaginatedResponse, PostView},
    models::Post,
    store::Store,
};
use uuid::Uuid;

/// Which posts a feed shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Group(Uuid),
    Author(Uuid),
    /// Posts by every author the viewer follows
    Followed(Uuid),
}

impl Scope {
    fn posts(self, store: &Store) -> Vec<Post> {
        match self {
            Scope::All => store.posts_all(),
            Scope::Group(id) => store.posts_by_group(id),
            Scope::Author(id) => store.posts_by_author(id),
            Scope::Followed(viewer) => store.posts_by_followed(viewer),
        }
    }
}

/// Resolves the raw `page` query value against `num_pages`.
///
/// Anything that is not an integer means the first page; integers are
/// clamped into `1..=num_pages`.
pub fn page_number(raw: Option<&str>, num_pages: usize) -> usize {
    let last = num_pages.max(1);
    match raw.map(str::trim).and_then(|s| s.parse::<i64>().ok()) {
        None => 1,
        Some(n) if n < 1 => 1,
        Some(n) => usize::try_from(n).map_or(last, |n| n.min(last)),
    }
}

/// Slices `items` into the requested page. An empty list still has one page.
pub fn paginate<T>(items: Vec<T>, raw_page: Option<&str>, per_page: usize) -> PaginatedResponse<T> {
    let per_page = per_page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page).max(1);
    let page = page_number(raw_page, total_pages);

    let data: Vec<T> = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    PaginatedResponse {
        data,
        page,
        limit: per_page,
        total,
        total_pages,
        has_next: page < total_pages,
        has_previous: page > 1,
    }
}

/// Builds one page of `scope`, joining author and group details onto the
/// posts of that page only.
pub fn compose(
    store: &Store,
    scope: Scope,
    raw_page: Option<&str>,
    per_page: usize,
) -> PaginatedResponse<PostView> {
    let page = paginate(scope.posts(store), raw_page, per_page);
    page.map(|post| PostView::build(store, post))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_number_clamps() {
        assert_eq!(page_number(None, 3), 1);
        assert_eq!(page_number(Some("2"), 3), 2);
        assert_eq!(page_number(Some("0"), 3), 1);
        assert_eq!(page_number(Some("-4"), 3), 1);
        assert_eq!(page_number(Some("99"), 3), 3);
        assert_eq!(page_number(Some("abc"), 3), 1);
        assert_eq!(page_number(Some(""), 3), 1);
        assert_eq!(page_number(Some("5"), 0), 1);
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let items: Vec<u32> = (0..23).collect();

        let first = paginate(items.clone(), Some("1"), 10);
        assert_eq!(first.data, (0..10).collect::<Vec<_>>());
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next);
        assert!(!first.has_previous);

        let last = paginate(items, Some("3"), 10);
        assert_eq!(last.data, vec![20, 21, 22]);
        assert!(!last.has_next);
        assert!(last.has_previous);
    }

    #[test]
    fn empty_feed_has_one_empty_page() {
        let page = paginate(Vec::<u32>::new(), Some("4"), 10);

        assert!(page.data.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next && !page.has_previous);
    }

    #[test]
    fn compose_hydrates_author_and_group() {
        let store = Store::new();
        let author = store
            .create_author("t@example.com".into(), "Test-User".into(), "h".into())
            .unwrap();
        let group = store
            .create_group("Test".into(), "test-slug".into(), String::new())
            .unwrap();
        store.create_post(author.id, "with group".into(), Some(group.id), None);
        store.create_post(author.id, "no group".into(), None, None);

        let page = compose(&store, Scope::Group(group.id), None, 10);
        assert_eq!(page.total, 1);
        let view = &page.data[0];
        assert_eq!(view.text, "with group");
        assert_eq!(view.author.username, "Test-User");
        assert_eq!(view.group.as_ref().map(|g| g.slug.as_str()), Some("test-slug"));

        let all = compose(&store, Scope::All, None, 10);
        assert_eq!(all.data[0].text, "no group");
        assert!(all.data[0].group.is_none());
    }
}
