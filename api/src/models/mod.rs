mod author;
mod comment;
mod follow;
mod group;
mod post;

pub use author::Author;
pub use comment::{Comment, CommentId};
pub use follow::Follow;
pub use group::Group;
pub use post::{Post, PostId};
