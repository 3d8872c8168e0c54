/*
 * Responsibility
 * - Trust and propagation core shared by every GeekPlay service
 * - Token codec / issuer, request authenticator, authorization guard,
 *   profile enrichment cache, notification dispatcher
 *
 * Notes
 * - Services own their routes and storage; they only wire these pieces together
 */
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod policy;
pub mod services;
pub mod shutdown;
pub mod telemetry;
pub mod token;
