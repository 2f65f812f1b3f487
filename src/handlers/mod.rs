pub mod common;
pub mod pages;
pub mod products;
