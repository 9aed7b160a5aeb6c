use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// キーバリューストアポート
///
/// 端末ローカルの永続化ストレージを抽象化する。
/// 値は文字列（JSONにシリアライズされた構造化データ）。
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// キーの値を取得する
    ///
    /// 値が存在しない場合は `None` を返す。
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// キーに値を書き込む（既存の値は上書き）
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// キーを削除する
    ///
    /// 存在しないキーの削除は成功として扱う。
    async fn remove(&self, key: &str) -> Result<()>;

    /// 複数のキーを書き込む
    ///
    /// デフォルト実装は与えられた順に1件ずつ書き込むため、
    /// 途中で失敗すると前半だけが反映された状態になる。
    /// 原子的な複数キー書き込みができるバックエンドはオーバーライドすること。
    async fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value).await?;
        }
        Ok(())
    }
}
