pub mod access;
mod ctx;

pub use ctx::AuthCtx;
