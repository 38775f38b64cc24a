pub mod auth;
pub mod cart;
pub mod catalog;
pub mod products;
pub mod remote;
pub mod seed;
