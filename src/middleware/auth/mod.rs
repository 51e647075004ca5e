/*
 * Responsibility
 * - 認可 middleware の re-export
 */
mod permission;

pub use permission::{PermissionGate, guarded};
