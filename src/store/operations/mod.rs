pub mod achievements;
pub mod merge;
pub mod phrases;
pub mod profile;
pub mod vocabulary;
