mod argon2_hasher;
mod user_service_impl;

pub use argon2_hasher::*;
pub use user_service_impl::*;
