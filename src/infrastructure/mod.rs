pub mod memory;
pub mod models;
pub mod order_repo;

pub use memory::InMemoryStore;
pub use order_repo::DieselOrderRepository;
