//! Feed pagination primitives shared by every paginated query.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::Post;

/// One page of a timeline, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    pub has_more: bool,
}

impl FeedPage {
    /// Build a page from rows fetched with a `page_size + 1` limit.
    /// The extra row, when present, only signals that another page exists.
    pub fn from_rows(mut rows: Vec<Post>, page_size: u64) -> Self {
        let has_more = rows.len() as u64 > page_size;
        rows.truncate(page_size as usize);
        Self {
            posts: rows,
            has_more,
        }
    }
}

/// Offset and fetch limit for a page. The limit asks for one row beyond the
/// page so `has_more` never needs a second count query.
pub fn page_window(page: u64, page_size: u64) -> (u64, u64) {
    (page.saturating_mul(page_size), page_size.saturating_add(1))
}

/// Timeline order: descending timestamp, ties broken by descending post id
/// so pagination is deterministic across requests.
pub fn feed_ordering(a: &Post, b: &Post) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;

    fn post_at(secs_ago: i64) -> Post {
        Post {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            body: "x".to_string(),
            created_at: Utc::now() - Duration::seconds(secs_ago),
        }
    }

    #[test]
    fn page_without_extra_row_has_no_more() {
        let page = FeedPage::from_rows(vec![post_at(1), post_at(2)], 2);
        assert_eq!(page.posts.len(), 2);
        assert!(!page.has_more);
    }

    #[test]
    fn extra_row_is_dropped_and_flags_more() {
        let page = FeedPage::from_rows(vec![post_at(1), post_at(2), post_at(3)], 2);
        assert_eq!(page.posts.len(), 2);
        assert!(page.has_more);
    }

    #[test]
    fn empty_rows_make_an_empty_page() {
        let page = FeedPage::from_rows(Vec::new(), 10);
        assert!(page.posts.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn window_is_offset_and_one_extra() {
        assert_eq!(page_window(0, 10), (0, 11));
        assert_eq!(page_window(3, 25), (75, 26));
    }

    #[test]
    fn ordering_is_newest_first_with_id_tiebreak() {
        let newer = post_at(1);
        let older = post_at(60);
        assert_eq!(feed_ordering(&newer, &older), Ordering::Less);

        let ts = Utc::now();
        let mut a = post_at(0);
        let mut b = post_at(0);
        a.created_at = ts;
        b.created_at = ts;
        // Equal timestamps: the larger id sorts first.
        let expected = b.id.cmp(&a.id);
        assert_eq!(feed_ordering(&a, &b), expected);
    }
}
