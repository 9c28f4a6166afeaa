mod memory;
mod postgres;

pub use memory::MemoryVoteStore;
pub use postgres::PgVoteStore;
