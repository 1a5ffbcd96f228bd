//! Subscription module: three-layer architecture (domain, repository, service).
//!
//! `repo::seaorm` talks to PostgreSQL; `repo::memory` keeps rows in process for tests.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{SpendQuery, Subscription, SubscriptionInput};
pub use repository::SubscriptionRepository;
pub use service::SubscriptionService;
