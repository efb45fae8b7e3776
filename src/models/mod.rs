pub mod feedback;
pub mod member;
pub mod pulse;
