// src/profile/mod.rs
//
// Profile Store and Editor: single-slot persistence for the candidate
// profile being reviewed, plus region-by-region edit operations that
// replace the whole stored object on every save.

pub mod editor;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;


pub use routes::profile_routes;
