pub mod auth;
pub mod basket;
pub mod branch;
pub mod cleanup;
pub mod company;
pub mod menu;
pub mod menu_item;
pub mod order;
pub mod payment;
pub mod user;

mod router;
pub use router::get_router;
