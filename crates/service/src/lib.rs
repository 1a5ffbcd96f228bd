//! Service layer for subscriptions.
//! - `subscription::repository` is the storage seam (SQL lives behind it).
//! - `subscription::service` is the application layer the HTTP handlers call.
//! - Errors keep their kind (validation / not found / database) across layers.

pub mod errors;
pub mod subscription;
#[cfg(test)]
pub mod test_support;
