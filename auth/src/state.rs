/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Clone is cheap (Arc inside)
 */
use std::sync::Arc;

use crate::services::{accounts::AccountService, admin::AdminService};

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub admin: Arc<AdminService>,
}

impl AppState {
    pub fn new(accounts: AccountService, admin: AdminService) -> Self {
        Self {
            accounts: Arc::new(accounts),
            admin: Arc::new(admin),
        }
    }
}
