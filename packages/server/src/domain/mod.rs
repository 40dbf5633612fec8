//! ドメイン層
//!
//! チャットハブの中核となる概念を定義します。値オブジェクト、Session
//! エンティティ、そしてデータアクセス／メッセージ配送のインターフェース
//! （trait）はこの層が所有し、具体的な実装は Infrastructure 層が提供します
//! （依存性の逆転）。

pub mod error;
pub mod pusher;
pub mod registry;
pub mod session;
pub mod value_object;

pub use error::{EmptyUsername, PushError, ServerError, SessionError};
pub use pusher::{MessagePusher, PusherChannel};
pub use registry::SessionRegistry;
pub use session::Session;
pub use value_object::{SessionId, Timestamp, Username};
