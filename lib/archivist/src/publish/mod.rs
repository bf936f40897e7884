pub mod git;

pub use git::{GitPublisher, DEFAULT_AUTHOR_EMAIL, DEFAULT_AUTHOR_NAME, DEFAULT_DEST_SUBDIR};
