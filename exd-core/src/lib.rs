pub mod catalog;
pub mod observation;
pub mod periodicity;
