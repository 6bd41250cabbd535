//! Credential adapters: bcrypt password hashing and HS256 bearer tokens.

mod bcrypt_hasher;
mod jwt;

pub use bcrypt_hasher::BcryptPasswordHasher;
pub use jwt::JwtTokenService;
