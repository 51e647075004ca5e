pub mod category_repo;
pub mod error;
pub mod question_repo;
