pub mod lock_statuses;
pub mod memberships;
pub mod triggers;
