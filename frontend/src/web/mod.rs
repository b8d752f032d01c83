//! 浏览器平台封装模块
//!
//! 路由、HTTP 传输和会话存储对浏览器 API 的依赖都收在
//! 这一层，上层业务代码只面对信号和 trait。

pub mod http;
pub mod route;
pub mod router;
pub mod storage;

pub use storage::{BrowserStore, SessionStore};

#[cfg(test)]
pub use storage::MemoryStore;
