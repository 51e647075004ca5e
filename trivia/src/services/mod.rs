pub mod pagination;
pub mod quiz;
