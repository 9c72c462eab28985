//! Repositories for database operations

mod chapter;
mod comment;
mod novel;
mod order;
mod reading;
mod user;

pub use chapter::ChapterRepository;
pub use comment::CommentRepository;
pub use novel::{CategoryStat, CreatorStat, NovelRepository};
pub use order::OrderRepository;
pub use reading::ReadingRecordRepository;
pub use user::{RoleStat, UserRepository};
