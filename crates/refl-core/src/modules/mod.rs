pub mod convert;
pub mod genx;
pub mod lsfit;
