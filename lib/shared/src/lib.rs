pub mod catalog;
pub mod track;
