pub mod create;
pub mod get;
pub mod like;
pub mod moderate;
pub mod routes;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::comment::Comment;

// The model that will be returned to the client
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CommentTree {
    pub id: i32,
    pub author_name: String,
    pub content: String,
    pub parent_id: Option<i32>,
    pub created_at: chrono::NaiveDateTime,
    pub children: Option<Vec<CommentTree>>,
    pub likes: i64,
    pub depth: usize,
}

impl CommentTree {
    fn from_comment(comment: Comment, depth: usize) -> Self {
        CommentTree {
            id: comment.id,
            author_name: comment.author_name,
            content: comment.content,
            parent_id: comment.parent_id,
            created_at: comment.created_at,
            children: None,
            likes: comment.likes,
            depth,
        }
    }
}

/// Flat rows into a nested thread, most-liked first on every level, ties
/// broken by age. A reply whose parent isn't part of the input (e.g. the
/// parent is still pending) is dropped from the thread.
pub fn thread_comments(comments: Vec<Comment>) -> Vec<CommentTree> {
    let mut by_parent: HashMap<Option<i32>, Vec<Comment>> = HashMap::new();
    for comment in comments {
        by_parent.entry(comment.parent_id).or_default().push(comment);
    }

    build_level(None, 0, &mut by_parent)
}

fn build_level(
    parent_id: Option<i32>,
    depth: usize,
    by_parent: &mut HashMap<Option<i32>, Vec<Comment>>,
) -> Vec<CommentTree> {
    let mut level: Vec<CommentTree> = by_parent
        .remove(&parent_id)
        .unwrap_or_default()
        .into_iter()
        .map(|comment| {
            let mut node = CommentTree::from_comment(comment, depth);
            let children = build_level(Some(node.id), depth + 1, by_parent);
            if !children.is_empty() {
                node.children = Some(children);
            }
            node
        })
        .collect();

    level.sort_unstable_by_key(|k| (-k.likes, k.created_at));
    level
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::comment::status;
    use chrono::NaiveDate;

    fn mock_comment(id: i32, parent_id: Option<i32>, likes: i64, days_ago: i64) -> Comment {
        Comment {
            id,
            article_id: 1,
            parent_id,
            author_name: format!("Author {id}"),
            author_email: format!("author{id}@example.com"),
            author_ip: "203.0.113.7".into(),
            content: format!("Content for comment {id}"),
            status: status::APPROVED.into(),
            likes,
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                - chrono::Duration::try_days(days_ago).unwrap(),
        }
    }

    #[test]
    fn test_thread_comments_with_no_comments() {
        assert!(thread_comments(vec![]).is_empty());
    }

    #[test]
    fn test_thread_comments_nests_children_with_depth() {
        let comments = vec![
            mock_comment(1, None, 0, 5),
            mock_comment(2, Some(1), 0, 4),
            mock_comment(3, Some(2), 0, 3),
        ];

        let thread = thread_comments(comments);
        assert_eq!(thread.len(), 1, "Expected one root comment");

        let child = &thread[0].children.as_ref().unwrap()[0];
        assert_eq!(child.depth, 1);

        let grandchild = &child.children.as_ref().unwrap()[0];
        assert_eq!(grandchild.depth, 2);
    }

    #[test]
    fn test_thread_comments_sorts_by_likes_then_age() {
        let comments = vec![
            mock_comment(1, None, 5, 5),
            mock_comment(2, None, 10, 4),
            mock_comment(3, None, 5, 10),
        ];

        let thread = thread_comments(comments);
        let ids: Vec<i32> = thread.iter().map(|c| c.id).collect();
        // most likes first, then the older of the tied pair
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_replies_are_sorted_within_their_level() {
        let comments = vec![
            mock_comment(1, None, 0, 5),
            mock_comment(2, Some(1), 1, 4),
            mock_comment(3, Some(1), 7, 3),
        ];

        let thread = thread_comments(comments);
        let children = thread[0].children.as_ref().unwrap();
        assert_eq!(children[0].id, 3);
        assert_eq!(children[1].id, 2);
    }

    #[test]
    fn test_thread_comments_drops_orphaned_replies() {
        // parent 7 is not part of the input (not approved)
        let comments = vec![mock_comment(1, None, 0, 1), mock_comment(2, Some(7), 0, 0)];

        let thread = thread_comments(comments);
        assert_eq!(thread.len(), 1);
        assert!(thread[0].children.is_none());
    }
}
