use crate::adapters::http::BulkInsertClient;
use crate::app::Uploader;
use crate::core::{ConfigProvider, DataType, RunCounters, Storage};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// 依設定組出對應領域的上傳流程並執行，最後回報計數
pub struct Runner<S: Storage> {
    storage: S,
    monitor: SystemMonitor,
}

impl<S: Storage> Runner<S> {
    pub fn new(storage: S) -> Self {
        Self::new_with_monitoring(storage, false)
    }

    pub fn new_with_monitoring(storage: S, monitor_enabled: bool) -> Self {
        Self {
            storage,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run<C: ConfigProvider>(&self, config: &C) -> Result<RunCounters> {
        // 未知的資料類型在建立任何流程之前就回報錯誤
        let data_type: DataType = config.data_type().parse()?;
        let client = BulkInsertClient::new(config.api_base_url(), config.request_timeout())?;
        let uploader = Uploader::for_data_type(data_type, client, config.buffer_size());

        tracing::info!(
            "🚀 uploading {} data using {}...",
            data_type,
            uploader.parser_name()
        );
        self.monitor.log_phase("Start");

        let counters = uploader.run(&self.storage, config.file_path()).await?;

        self.monitor.log_phase("Upload");
        tracing::info!("completed upload");
        self.monitor.log_final_stats();

        Ok(counters)
    }
}
