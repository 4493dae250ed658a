pub mod accounts;
pub mod attempts;
pub mod cutoffs;
pub mod profiles;
pub mod user_ratings;
pub mod word_ratings;
