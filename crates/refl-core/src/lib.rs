pub mod domain;
pub mod modules;
