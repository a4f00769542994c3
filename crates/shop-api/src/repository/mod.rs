//! 저장소 구현.
//!
//! - [`PgUserRepository`], [`PgOrderRepository`]: Postgres 구현
//! - [`MemoryStore`]: 데이터베이스 없이 동작하는 메모리 구현 (개발/테스트용)

pub mod memory;
pub mod orders;
pub mod users;

pub use memory::MemoryStore;
pub use orders::PgOrderRepository;
pub use users::PgUserRepository;
