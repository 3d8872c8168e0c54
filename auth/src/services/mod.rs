pub mod accounts;
pub mod admin;
pub mod password;
pub mod provisioning;
