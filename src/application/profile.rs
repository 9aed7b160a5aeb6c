use serde::{Deserialize, Serialize};

use crate::ports::KeyValueStore;

use super::borrowing::LoanLedger;

/// ログイン中の利用者を保存しているキー（認証側が管理する）
pub const CURRENT_USER_KEY: &str = "currentUser";

/// セッショントークンを保存しているキー（認証側が管理する）
pub const USER_TOKEN_KEY: &str = "userToken";

/// ログイン中の利用者
///
/// 認証側が書き込む外部の記録。この crate は読むだけで変更しない。
/// 未知のフィールドはそのまま保持する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(rename = "fullName", default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// プロフィール画面の表示内容
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSummary {
    pub user: Option<CurrentUser>,
    /// セッショントークンが存在するか
    pub signed_in: bool,
    pub borrowed_count: usize,
    pub history_count: usize,
}

impl ProfileSummary {
    /// 利用者情報と台帳の件数をまとめる
    ///
    /// 利用者情報は台帳と同じストアから読む。
    /// 読み込みに失敗した場合は `None` として続行する。
    pub async fn load(ledger: &LoanLedger) -> Self {
        let store = &**ledger.store();
        let stats = ledger.stats();

        Self {
            user: read_current_user(store).await,
            signed_in: has_session(store).await,
            borrowed_count: stats.borrowed,
            history_count: stats.returned,
        }
    }
}

/// `currentUser` を読む。ない・読めない・壊れている場合は `None`
pub async fn read_current_user(store: &dyn KeyValueStore) -> Option<CurrentUser> {
    let raw = match store.get(CURRENT_USER_KEY).await {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(key = CURRENT_USER_KEY, error = %e, "failed to read current user");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!(key = CURRENT_USER_KEY, error = %e, "malformed current user record");
            None
        }
    }
}

/// セッショントークンの有無。中身は解釈しない
pub async fn has_session(store: &dyn KeyValueStore) -> bool {
    match store.get(USER_TOKEN_KEY).await {
        Ok(token) => token.is_some_and(|t| !t.is_empty()),
        Err(e) => {
            tracing::warn!(key = USER_TOKEN_KEY, error = %e, "failed to read session token");
            false
        }
    }
}
