pub mod build;
pub mod statute;
pub mod terms;
