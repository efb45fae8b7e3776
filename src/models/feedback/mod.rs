mod queries;
mod types;
mod view;

pub use queries::{create, find_all};
pub use types::{FeedbackForm, FeedbackItem};
pub use view::{FeedbackSnapshot, SortOrder};
