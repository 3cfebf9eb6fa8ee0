//! # Drinks server
//! This crate hosts the HTTP server for the drinks menu. It is responsible for:
//! * Serving the menu, with recipes in short form for everyone and in full for authorised staff.
//! * Verifying the bearer tokens issued by the identity provider, and checking the permission each protected route
//!   requires.
//! * Adding, editing and removing drinks via the [`drinks_engine`] API.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `GET /drinks`: The public menu.
//! * `GET /drinks-detail`: The menu with full recipes. Requires `get:drinks-detail`.
//! * `POST /drinks`: Adds a drink. Requires `post:drinks`.
//! * `PATCH /drinks/{id}`: Edits a drink. Requires `patch:drinks`.
//! * `DELETE /drinks/{id}`: Removes a drink. Requires `delete:drinks`.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod key_set;
pub mod middleware;
pub mod routes;
pub mod server;
