pub mod article;
pub mod candidate;
pub mod comment;
pub mod counter;
pub mod embedding;
pub mod quiz;
pub mod site;
pub mod subscriber;
