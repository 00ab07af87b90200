pub mod account;
pub mod content;
pub mod in_memory;

pub use account::PostgresAccountRepository;
pub use content::PostgresContentRepository;
pub use in_memory::InMemoryAccountRepository;
pub use in_memory::InMemoryContentRepository;
