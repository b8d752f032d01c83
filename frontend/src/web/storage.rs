//! 会话持久化模块。
//!
//! 登录会话落在浏览器 LocalStorage 的三个键上，刷新页面后
//! 由启动逻辑读回。存储动作抽象成 [`SessionStore`] trait，
//! 测试里用内存实现替换。

use bloodlink_shared::{Role, Session};

/// 令牌键
const KEY_TOKEN: &str = "bloodlink_token";
/// 用户名键
const KEY_USERNAME: &str = "bloodlink_user";
/// 角色键
const KEY_ROLE: &str = "bloodlink_role";

/// 会话的保存 / 读取 / 清除
///
/// 实现不允许 panic：存储不可用（隐私模式、容量满）时
/// `save` 返回 `false`，`load` 返回 `None`，调用方自行降级
pub trait SessionStore {
    /// 写入会话三元组，全部写成功才算成功
    fn save(&self, session: &Session) -> bool;

    /// 读回会话，任何一个键缺失或损坏都视为没有会话
    fn load(&self) -> Option<Session>;

    /// 清除会话的所有键
    fn clear(&self);
}

/// 生产实现：浏览器 LocalStorage
#[derive(Clone, Copy, Default)]
pub struct BrowserStore;

impl SessionStore for BrowserStore {
    fn save(&self, session: &Session) -> bool {
        use gloo_storage::{LocalStorage, Storage};

        let token_ok = LocalStorage::set(KEY_TOKEN, &session.token).is_ok();
        let user_ok = LocalStorage::set(KEY_USERNAME, &session.username).is_ok();
        let role_ok = LocalStorage::set(KEY_ROLE, session.role.as_str()).is_ok();
        token_ok && user_ok && role_ok
    }

    fn load(&self) -> Option<Session> {
        use gloo_storage::{LocalStorage, Storage};

        let token: String = LocalStorage::get(KEY_TOKEN).ok()?;
        let username: String = LocalStorage::get(KEY_USERNAME).ok()?;
        let role_raw: String = LocalStorage::get(KEY_ROLE).ok()?;
        let role = Role::parse(&role_raw)?;

        Some(Session {
            token,
            username,
            role,
        })
    }

    fn clear(&self) {
        use gloo_storage::{LocalStorage, Storage};

        LocalStorage::delete(KEY_TOKEN);
        LocalStorage::delete(KEY_USERNAME);
        LocalStorage::delete(KEY_ROLE);
    }
}

/// 测试用内存实现，可模拟存储不可用
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    slot: std::cell::RefCell<Option<Session>>,
    pub fail_saves: std::cell::Cell<bool>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn preloaded(session: Session) -> Self {
        let store = MemoryStore::default();
        *store.slot.borrow_mut() = Some(session);
        store
    }
}

#[cfg(test)]
impl SessionStore for MemoryStore {
    fn save(&self, session: &Session) -> bool {
        if self.fail_saves.get() {
            return false;
        }
        *self.slot.borrow_mut() = Some(session.clone());
        true
    }

    fn load(&self) -> Option<Session> {
        self.slot.borrow().clone()
    }

    fn clear(&self) {
        *self.slot.borrow_mut() = None;
    }
}
