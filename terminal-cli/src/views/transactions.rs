use bitcli_client::{types::TransactionEntry, RpcClient};
use chrono::{DateTime, Local};
use tracing::{info, warn};

pub const EMPTY_PLACEHOLDER: &str = "No transactions found";

/// Newest first; entries with equal timestamps keep the daemon's order.
pub fn sort_newest_first(txs: &mut [TransactionEntry]) {
    txs.sort_by(|a, b| b.time.cmp(&a.time));
}

pub fn format_time(ts: i64) -> String {
    if ts == 0 {
        return "Unknown".to_string();
    }
    DateTime::from_timestamp(ts, 0)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

pub fn format_transaction(tx: &TransactionEntry) -> String {
    let mut lines = vec![
        format!("Category: {}", tx.category),
        format!("Amount: {} BTC", tx.amount),
        format!("Date: {}", format_time(tx.time)),
        format!("Confirmations: {}", tx.confirmations),
    ];
    if let Some(address) = &tx.address {
        lines.push(format!("Address: {address}"));
    }
    if let Some(fee) = tx.fee.filter(|fee| *fee != 0.0) {
        lines.push(format!("Fee: {fee} BTC"));
    }
    lines.push(format!("Transaction ID: {}", tx.txid));
    lines.join("\n")
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Listing {
    #[default]
    Unmounted,
    Loading,
    Loaded(Vec<TransactionEntry>),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct TransactionsView {
    pub listing: Listing,
    pub selected: usize,
}

impl TransactionsView {
    pub fn mount(&mut self) {
        if self.listing == Listing::Unmounted {
            self.refresh();
        }
    }

    /// Drop whatever is shown and schedule a reload.
    pub fn refresh(&mut self) {
        if !self.is_busy() {
            self.listing = Listing::Loading;
            self.selected = 0;
        }
    }

    pub fn is_busy(&self) -> bool {
        self.listing == Listing::Loading
    }

    pub async fn load(&mut self, client: &RpcClient) {
        info!("loading transactions");
        self.listing = match client.list_transactions().await {
            Ok(mut txs) => {
                sort_newest_first(&mut txs);
                info!(count = txs.len(), "loaded transactions");
                Listing::Loaded(txs)
            }
            Err(err) => {
                warn!(error = %err, "error loading transactions");
                Listing::Failed(err.to_string())
            }
        };
        self.selected = 0;
    }

    /// One display string per list row.
    pub fn entries(&self) -> Vec<String> {
        match &self.listing {
            Listing::Unmounted => Vec::new(),
            Listing::Loading => vec!["Loading transactions…".to_string()],
            Listing::Loaded(txs) if txs.is_empty() => vec![EMPTY_PLACEHOLDER.to_string()],
            Listing::Loaded(txs) => txs.iter().map(format_transaction).collect(),
            Listing::Failed(err) => vec![format!("Error: {err}")],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.listing, Listing::Failed(_))
    }

    pub fn select_next(&mut self) {
        let len = self.entries().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcli_client::mocks::{MockDaemon, Reply};
    use serde_json::json;

    fn entry(txid: &str, time: i64) -> TransactionEntry {
        TransactionEntry {
            txid: txid.to_string(),
            category: "receive".to_string(),
            amount: 1.0,
            time,
            confirmations: 1,
            fee: None,
            address: Some("bcrt1qexample".to_string()),
        }
    }

    #[test]
    fn test_sort_newest_first() {
        let mut txs = vec![entry("a", 100), entry("b", 300), entry("c", 200)];
        sort_newest_first(&mut txs);
        let times: Vec<i64> = txs.iter().map(|tx| tx.time).collect();
        assert_eq!(times, vec![300, 200, 100]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut txs = vec![entry("first", 5), entry("later", 9), entry("second", 5)];
        sort_newest_first(&mut txs);
        let ids: Vec<&str> = txs.iter().map(|tx| tx.txid.as_str()).collect();
        assert_eq!(ids, vec!["later", "first", "second"]);
    }

    #[test]
    fn test_format_transaction() {
        let mut tx = entry("cafe", 0);
        tx.category = "send".to_string();
        tx.amount = -0.5;
        tx.fee = Some(-0.0001);
        assert_eq!(
            format_transaction(&tx),
            "Category: send\nAmount: -0.5 BTC\nDate: Unknown\nConfirmations: 1\nAddress: bcrt1qexample\nFee: -0.0001 BTC\nTransaction ID: cafe"
        );

        tx.fee = Some(0.0);
        tx.address = None;
        let text = format_transaction(&tx);
        assert!(!text.contains("Fee"));
        assert!(!text.contains("Address"));
    }

    #[test]
    fn test_format_time_uses_local_clock() {
        let expected = DateTime::from_timestamp(1_700_000_000, 0)
            .unwrap()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        assert_eq!(format_time(1_700_000_000), expected);
        assert_eq!(format_time(0), "Unknown");
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut view = TransactionsView {
            listing: Listing::Loaded(vec![entry("a", 1), entry("b", 2)]),
            selected: 0,
        };
        view.select_prev();
        assert_eq!(view.selected, 0);
        view.select_next();
        view.select_next();
        assert_eq!(view.selected, 1);
    }

    #[tokio::test]
    async fn test_load_renders_newest_first() {
        let daemon = MockDaemon::start().await.unwrap();
        daemon.reply(
            "listtransactions",
            Reply::result(json!([
                { "txid": "t100", "category": "receive", "amount": 1.0, "time": 100, "confirmations": 3 },
                { "txid": "t300", "category": "send", "amount": -1.0, "time": 300, "confirmations": 1, "fee": -0.001 },
                { "txid": "t200", "category": "receive", "amount": 2.0, "time": 200, "confirmations": 2 },
            ])),
        );

        let mut view = TransactionsView::default();
        view.mount();
        assert!(view.is_busy());
        view.load(&daemon.client()).await;

        let entries = view.entries();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].ends_with("Transaction ID: t300"));
        assert!(entries[0].contains("Fee: -0.001 BTC"));
        assert!(entries[1].ends_with("Transaction ID: t200"));
        assert!(entries[2].ends_with("Transaction ID: t100"));
    }

    #[tokio::test]
    async fn test_empty_listing_placeholder() {
        let daemon = MockDaemon::start().await.unwrap();
        daemon.reply("listtransactions", Reply::result(json!([])));

        let mut view = TransactionsView::default();
        view.mount();
        view.load(&daemon.client()).await;
        assert_eq!(view.entries(), vec!["No transactions found".to_string()]);
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_list() {
        let daemon = MockDaemon::start().await.unwrap();
        daemon.reply(
            "listtransactions",
            Reply::result(json!([
                { "txid": "t1", "category": "receive", "amount": 1.0, "time": 1, "confirmations": 1 },
            ])),
        );
        let client = daemon.client();

        let mut view = TransactionsView::default();
        view.mount();
        view.load(&client).await;
        assert_eq!(view.entries().len(), 1);

        daemon.reply("listtransactions", Reply::raw(500, "daemon exploded"));
        view.refresh();
        view.load(&client).await;

        let entries = view.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].starts_with("Error: "));
        assert!(entries[0].contains("daemon exploded"));
        assert!(view.is_error());
        assert_eq!(daemon.methods(), vec!["listtransactions", "listtransactions"]);
    }
}
