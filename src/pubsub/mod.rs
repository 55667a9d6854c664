//! Шина событий (publish–subscribe) внутри процесса.
//!
//! - `broker`: реестр тем, публикация и подписка ([`EventBus`]).
//! - `subscriber`: сырая подписка на тему ([`Subscription`]).
//! - `filter`: подписка, сужённая до одного идентификатора корреляции
//!   ([`FilteredSubscription`]).
//!
//! Шина создаётся явно при старте и передаётся в диспетчер и транспортный
//! слой; глобального экземпляра нет.

pub mod broker;
pub mod filter;
pub mod subscriber;

pub use broker::*;
pub use filter::*;
pub use subscriber::*;
