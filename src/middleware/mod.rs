/*
 * Responsibility
 * - Router-level layers every service applies (request authenticator, HTTP plumbing, CORS)
 */
pub mod auth;
pub mod cors;
pub mod http;
