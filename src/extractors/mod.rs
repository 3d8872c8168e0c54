pub mod principal;

pub use principal::{AuthRole, AuthUserId, Authenticated, MaybeAuthenticated, Principal};
