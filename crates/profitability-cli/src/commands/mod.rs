pub mod assumptions;
pub mod book;
pub mod coverage;
pub mod rules;
