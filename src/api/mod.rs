/*
 * Responsibility
 * - public surface of the /api tree (routes() re-export)
 */
pub mod dto;
pub mod handlers;
mod routes;

pub use routes::routes;
