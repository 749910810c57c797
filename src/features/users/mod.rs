//! User account management.
//!
//! Accounts live in the local `users` table. Listing, creating, editing and
//! deleting accounts is reserved for super admins; every signed-in user may
//! edit their own profile.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/users` | List users with report counts (`q` searches name, username, email) |
//! | POST | `/api/users` | Create a user with a role |
//! | GET | `/api/users/{id}` | Get a user |
//! | PUT | `/api/users/{id}` | Overwrite a user, empty password keeps the current one |
//! | DELETE | `/api/users/{id}` | Delete a user, never the caller's own account |
//! | PUT | `/api/users/me` | Update own profile |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
