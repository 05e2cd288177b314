use crate::core::source::FeatureSource;
use crate::core::{BatchSubmitter, EntryTransformer, RawEntry, RunCounters, Storage, SubmitOutcome};
use crate::utils::error::Result;
use std::ops::RangeInclusive;

pub const DEFAULT_BUFFER_SIZE: usize = 50;

/// 待送出的記錄緩衝區，同時記下這批記錄涵蓋的來源索引範圍
#[derive(Debug)]
pub struct Buffer<R> {
    records: Vec<R>,
    capacity: usize,
    first_entry: Option<usize>,
    last_entry: Option<usize>,
}

impl<R> Buffer<R> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            capacity,
            first_entry: None,
            last_entry: None,
        }
    }

    pub fn push(&mut self, entry_index: usize, record: R) {
        debug_assert!(self.records.len() < self.capacity, "buffer overflow");
        self.first_entry.get_or_insert(entry_index);
        self.last_entry = Some(entry_index);
        self.records.push(record);
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    /// 1-based、包含兩端的來源索引範圍
    pub fn entry_range(&self) -> Option<RangeInclusive<usize>> {
        Some(self.first_entry?..=self.last_entry?)
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.first_entry = None;
        self.last_entry = None;
    }
}

/// 串流轉換並分批送出的核心流程
///
/// 每筆原始資料依來源順序交給 `EntryTransformer`；被接受的記錄放入緩衝區，
/// 緩衝區滿了或來源結束時整批交給 `BatchSubmitter`。單筆拒絕與批次失敗只會被計數與記錄，
/// 不會中斷流程。失敗的批次不會重送，其記錄直接丟棄並計入 `dropped_record_count`。
pub struct BatchingPipeline<T, S>
where
    T: EntryTransformer,
    S: BatchSubmitter<Record = T::Output>,
{
    transformer: T,
    submitter: S,
    buffer_size: usize,
}

impl<T, S> BatchingPipeline<T, S>
where
    T: EntryTransformer,
    S: BatchSubmitter<Record = T::Output>,
{
    pub fn new(transformer: T, submitter: S, buffer_size: usize) -> Self {
        if buffer_size == 0 {
            tracing::warn!("⚠️ Buffer size 0 is not usable, falling back to 1");
        }

        Self {
            transformer,
            submitter,
            buffer_size: buffer_size.max(1),
        }
    }

    pub fn transformer_name(&self) -> &'static str {
        self.transformer.name()
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// 讀取來源檔並處理所有 feature；只有來源檔無法讀取或缺少 `features` 時回傳錯誤
    pub async fn run<St: Storage>(&self, storage: &St, path: &str) -> Result<RunCounters> {
        let source = FeatureSource::open(storage, path).await?;
        tracing::info!("📥 Loaded {} entries from {}", source.len(), path);
        Ok(self.process(source).await)
    }

    pub async fn process<I>(&self, entries: I) -> RunCounters
    where
        I: IntoIterator<Item = RawEntry>,
    {
        let mut counters = RunCounters::default();
        let mut buffer = Buffer::with_capacity(self.buffer_size);

        for (offset, entry) in entries.into_iter().enumerate() {
            let entry_index = offset + 1;
            counters.entry_count += 1;

            let record = match self.transformer.transform(&entry) {
                Ok(record) => record,
                Err(rejection) => {
                    counters.rejected_count += 1;
                    tracing::warn!(
                        "Error: unable to parse entry #{} ({}): {}",
                        entry_index,
                        rejection,
                        entry
                    );
                    continue;
                }
            };

            counters.accepted_count += 1;
            buffer.push(entry_index, record);

            if buffer.is_full() {
                self.flush(&mut buffer, &mut counters).await;
            }
        }

        // 來源結束時，剩下未滿一批的記錄也要送出
        if !buffer.is_empty() {
            self.flush(&mut buffer, &mut counters).await;
        }

        tracing::info!("✅ {}", counters);
        counters
    }

    async fn flush(&self, buffer: &mut Buffer<T::Output>, counters: &mut RunCounters) {
        counters.batch_count += 1;
        let range = buffer.entry_range();
        tracing::debug!(
            "Submitting batch #{} with {} records (entries {:?})",
            counters.batch_count,
            buffer.len(),
            range
        );

        match self.submitter.submit(buffer.records()).await {
            SubmitOutcome::Success => {
                tracing::debug!("Batch #{} submitted", counters.batch_count);
            }
            SubmitOutcome::Failure(failure) => {
                counters.batch_failure_count += 1;
                counters.dropped_record_count += buffer.len();
                match range {
                    Some(range) => tracing::error!(
                        "❌ Error: unable to handle the batch of data entries {} - {}: {}",
                        range.start(),
                        range.end(),
                        failure
                    ),
                    None => tracing::error!("❌ Error: unable to handle batch: {}", failure),
                }
            }
        }

        // 不論成功與否都清空，失敗的批次不重送
        buffer.clear();
    }
}
