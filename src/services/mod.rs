/*
 * Responsibility
 * - Calls to collaborator services and the best-effort rules around them
 */
pub mod notify;
pub mod profile;
pub mod upstream;
