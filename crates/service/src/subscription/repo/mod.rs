pub mod memory;
pub mod seaorm;

pub use memory::InMemorySubscriptionRepository;
pub use seaorm::SeaOrmSubscriptionRepository;
