use crate::domain::model::{RawEntry, Rejection, SubmitOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn file_path(&self) -> &str;
    fn data_type(&self) -> &str;
    fn api_base_url(&self) -> &str;
    fn buffer_size(&self) -> usize;
    fn request_timeout(&self) -> Option<Duration>;
}

/// 將一筆原始資料轉成特定領域的記錄，或拒絕它
///
/// 實作必須是純函式：除了預先編譯好的唯讀比對器之外，不得在呼叫之間共享可變狀態。
pub trait EntryTransformer: Send + Sync {
    type Output: Send + Sync;

    fn name(&self) -> &'static str;

    fn transform(&self, entry: &RawEntry) -> std::result::Result<Self::Output, Rejection>;
}

/// 將整批記錄以一次請求送往遠端；失敗以 `SubmitOutcome::Failure` 回報，不會往外拋錯
#[async_trait]
pub trait BatchSubmitter: Send + Sync {
    type Record: Send + Sync;

    async fn submit(&self, batch: &[Self::Record]) -> SubmitOutcome;
}
