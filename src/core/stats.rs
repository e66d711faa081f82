use crate::core::sequence::format_id;
use crate::domain::model::StatsReport;
use crate::domain::ports::RecordStore;
use crate::utils::error::Result;
use std::sync::Arc;

/// 統計彙整：集合總筆數、price 欄位的最小/最大/平均值，
/// 以及由目前計數值推導的最後/下一個識別碼
///
/// 缺席或非數值的 price 以 0 計入，與原始統計行為一致。
pub struct StatsCollector<S: RecordStore> {
    store: Arc<S>,
    collection: String,
    counter_key: String,
}

impl<S: RecordStore> StatsCollector<S> {
    pub fn new(
        store: Arc<S>,
        collection: impl Into<String>,
        counter_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            collection: collection.into(),
            counter_key: counter_key.into(),
        }
    }

    pub async fn collect(&self, id_prefix: &str) -> Result<StatsReport> {
        let records = self.store.find_all(&self.collection).await?;
        let total = records.len();

        let prices: Vec<f64> = records
            .iter()
            .map(|record| {
                record
                    .data
                    .get("price")
                    .and_then(|value| value.as_f64())
                    .unwrap_or(0.0)
            })
            .collect();

        let (price_min, price_max, price_avg) = if prices.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let avg = prices.iter().sum::<f64>() / prices.len() as f64;
            (min, max, avg)
        };

        let current = self.store.counter_current(&self.counter_key).await?;
        let last_id = (current > 0).then(|| format_id(id_prefix, current));
        let next_id = format_id(id_prefix, current + 1);

        Ok(StatsReport {
            total,
            price_min,
            price_max,
            price_avg,
            last_id,
            next_id,
        })
    }
}
