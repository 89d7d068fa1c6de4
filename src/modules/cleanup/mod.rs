pub mod job;
pub mod repository;
pub mod routes;
pub mod service;

pub use routes::get_router;
