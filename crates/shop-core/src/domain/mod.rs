//! 도메인 모델.
//!
//! - [`user`]: 사용자, 역할
//! - [`order`]: 주문, 주문 상태
//! - [`store`]: 저장소 trait

pub mod order;
pub mod store;
pub mod user;

pub use order::{NewOrder, Order, OrderChanges, OrderStatus};
pub use store::{OrderStore, UserStore};
pub use user::{NewUser, Role, User, UserChanges};
