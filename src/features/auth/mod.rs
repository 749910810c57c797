//! Local username/password authentication.
//!
//! Passwords are stored as Argon2id hashes. A successful login returns an
//! HS256 bearer token carrying the user's id, username and role; the auth
//! middleware turns it into an [`model::AuthenticatedUser`] request extension
//! and [`guards`] enforce the role permissions.

mod validator;

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use validator::JwtValidator;
