pub mod comment_repository;
pub mod issue_repository;
pub mod point_award_repository;
pub mod profile_repository;
pub mod user_repository;
