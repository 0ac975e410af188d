use crate::{
    errors::ApiError,
    models::{Author, Comment, CommentId, Follow, Group, Post, PostId},
};
use chrono::Utc;
use dashmap::{DashMap, mapref::entry::Entry};
use std::{
    cmp::Reverse,
    sync::atomic::{AtomicU64, Ordering},
};
use tracing::info;
use uuid::Uuid;

// ============================================================================
// DATA STORE - In-memory tables with unique indexes
// ============================================================================
/// Every table is a `DashMap`; secondary maps enforce uniqueness through the
/// entry API so a racing insert sees the conflict instead of overwriting.
#[derive(Default)]
pub struct Store {
    authors: DashMap<Uuid, Author>,
    email_index: DashMap<String, Uuid>, // Quick Lookup by Email
    username_index: DashMap<String, Uuid>,
    groups: DashMap<Uuid, Group>,
    slug_index: DashMap<String, Uuid>,
    posts: DashMap<PostId, Post>,
    comments: DashMap<CommentId, Comment>,
    follows: DashMap<(Uuid, Uuid), Follow>,
    last_post_id: AtomicU64,
    last_comment_id: AtomicU64,
}

/// Changes an owner may apply to a post
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub text: String,
    pub group_id: Option<Uuid>,
    /// `None` keeps the stored image
    pub image: Option<String>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------- authors

    pub fn create_author(
        &self,
        email: String,
        username: String,
        hashed_password: String,
    ) -> Result<Author, ApiError> {
        let id = Uuid::new_v4();

        match self.username_index.entry(username.clone()) {
            Entry::Occupied(_) => return Err(ApiError::UserAlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        match self.email_index.entry(email.clone()) {
            Entry::Occupied(_) => {
                self.username_index.remove(&username);
                return Err(ApiError::UserAlreadyExists);
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let author = Author {
            id,
            email,
            username,
            hashed_password,
            created_at: Utc::now().timestamp(),
        };
        self.authors.insert(id, author.clone());

        Ok(author)
    }

    pub fn author(&self, id: &Uuid) -> Option<Author> {
        self.authors.get(id).map(|a| a.clone())
    }

    pub fn author_by_username(&self, username: &str) -> Option<Author> {
        let id = *self.username_index.get(username)?;
        self.author(&id)
    }

    pub fn author_by_email(&self, email: &str) -> Option<Author> {
        let id = *self.email_index.get(email)?;
        self.author(&id)
    }

    // ----------------------------------------------------------------- groups

    pub fn create_group(
        &self,
        title: String,
        slug: String,
        description: String,
    ) -> Result<Group, ApiError> {
        let id = Uuid::new_v4();

        match self.slug_index.entry(slug.clone()) {
            Entry::Occupied(_) => {
                return Err(ApiError::Conflict(format!("Group slug '{}' is taken", slug)));
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let group = Group {
            id,
            title,
            slug,
            description,
        };
        self.groups.insert(id, group.clone());

        info!("Group created: {} ({})", group.slug, group.id);

        Ok(group)
    }

    pub fn group(&self, id: &Uuid) -> Option<Group> {
        self.groups.get(id).map(|g| g.clone())
    }

    pub fn group_by_slug(&self, slug: &str) -> Option<Group> {
        let id = *self.slug_index.get(slug)?;
        self.group(&id)
    }

    /// All groups, alphabetical by title
    pub fn groups(&self) -> Vec<Group> {
        let mut groups: Vec<Group> = self.groups.iter().map(|g| g.value().clone()).collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.slug.cmp(&b.slug)));
        groups
    }

    // ------------------------------------------------------------------ posts

    pub fn create_post(
        &self,
        author_id: Uuid,
        text: String,
        group_id: Option<Uuid>,
        image: Option<String>,
    ) -> Post {
        let post = Post {
            id: self.last_post_id.fetch_add(1, Ordering::SeqCst) + 1,
            author_id,
            group_id,
            text,
            image,
            created_at: Utc::now().timestamp(),
        };
        self.posts.insert(post.id, post.clone());
        post
    }

    pub fn post(&self, id: PostId) -> Option<Post> {
        self.posts.get(&id).map(|p| p.clone())
    }

    /// Applies `update` in place; id, author and creation time never change
    pub fn update_post(&self, id: PostId, update: PostUpdate) -> Result<Post, ApiError> {
        let mut post = self.posts.get_mut(&id).ok_or(ApiError::NotFound)?;

        post.text = update.text;
        post.group_id = update.group_id;
        if let Some(image) = update.image {
            post.image = Some(image);
        }

        Ok(post.clone())
    }

    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    pub fn posts_all(&self) -> Vec<Post> {
        self.posts_where(|_| true)
    }

    pub fn posts_by_group(&self, group_id: Uuid) -> Vec<Post> {
        self.posts_where(|p| p.group_id == Some(group_id))
    }

    pub fn posts_by_author(&self, author_id: Uuid) -> Vec<Post> {
        self.posts_where(|p| p.author_id == author_id)
    }

    /// Posts written by anyone `viewer` follows
    pub fn posts_by_followed(&self, viewer: Uuid) -> Vec<Post> {
        let followed = self.followed_authors(viewer);
        self.posts_where(|p| followed.contains(&p.author_id))
    }

    pub fn count_posts_by_author(&self, author_id: Uuid) -> usize {
        self.posts
            .iter()
            .filter(|p| p.author_id == author_id)
            .count()
    }

    /// Matching posts, newest first; equal timestamps fall back to id
    fn posts_where(&self, pred: impl Fn(&Post) -> bool) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|entry| pred(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        posts.sort_by_key(|p| Reverse((p.created_at, p.id)));
        posts
    }

    // --------------------------------------------------------------- comments

    pub fn create_comment(
        &self,
        post_id: PostId,
        author_id: Uuid,
        text: String,
    ) -> Result<Comment, ApiError> {
        if !self.posts.contains_key(&post_id) {
            return Err(ApiError::NotFound);
        }

        let comment = Comment {
            id: self.last_comment_id.fetch_add(1, Ordering::SeqCst) + 1,
            post_id,
            author_id,
            text,
            created_at: Utc::now().timestamp(),
        };
        self.comments.insert(comment.id, comment.clone());

        Ok(comment)
    }

    /// Comments on a post in the order they were written
    pub fn comments_for_post(&self, post_id: PostId) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| c.value().clone())
            .collect();

        comments.sort_by_key(|c| (c.created_at, c.id));
        comments
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    // ---------------------------------------------------------------- follows

    /// Get-or-create of the `(follower, author)` edge; `true` when created
    pub(crate) fn insert_follow(&self, follower_id: Uuid, author_id: Uuid) -> bool {
        match self.follows.entry((follower_id, author_id)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Follow {
                    follower_id,
                    author_id,
                    created_at: Utc::now().timestamp(),
                });
                true
            }
        }
    }

    pub(crate) fn remove_follow(&self, follower_id: Uuid, author_id: Uuid) -> Option<Follow> {
        self.follows
            .remove(&(follower_id, author_id))
            .map(|(_, edge)| edge)
    }

    pub fn follow_exists(&self, follower_id: Uuid, author_id: Uuid) -> bool {
        self.follows.contains_key(&(follower_id, author_id))
    }

    pub fn followed_authors(&self, follower_id: Uuid) -> Vec<Uuid> {
        self.follows
            .iter()
            .filter(|f| f.follower_id == follower_id)
            .map(|f| f.author_id)
            .collect()
    }

    pub fn follower_count(&self, author_id: Uuid) -> usize {
        self.follows
            .iter()
            .filter(|f| f.author_id == author_id)
            .count()
    }

    pub fn follow_count(&self) -> usize {
        self.follows.len()
    }
}
