use bitcli_client::RpcClient;
use tracing::{info, warn};

/// Wallet and chain status shown on the Overview tab.
#[derive(Clone, Debug, PartialEq)]
pub struct WalletSummary {
    pub wallet_name: String,
    pub network: String,
    pub blocks_synced: u64,
    pub headers_total: u64,
    pub balance: f64,
    pub tx_count: u64,
}

impl WalletSummary {
    /// Issues `getwalletinfo`, `getbalance` and `getblockchaininfo` one after another.
    pub async fn fetch(client: &RpcClient) -> bitcli_client::Result<Self> {
        let wallet = client.get_wallet_info().await?;
        let balance = client.get_balance().await?;
        let chain = client.get_blockchain_info().await?;
        Ok(Self {
            wallet_name: wallet.walletname,
            network: chain.chain,
            blocks_synced: chain.blocks,
            headers_total: chain.headers,
            balance,
            tx_count: wallet.txcount,
        })
    }

    pub fn render(&self) -> String {
        format!(
            "Wallet Status: Active\n\
             Wallet Name: {}\n\
             Network: {}\n\
             Sync Status: {}/{} blocks\n\
             Balance: {} BTC\n\
             Transaction Count: {}",
            self.wallet_name,
            self.network,
            self.blocks_synced,
            self.headers_total,
            self.balance,
            self.tx_count,
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum OverviewView {
    #[default]
    Unmounted,
    Loading,
    Ready(WalletSummary),
    Failed(String),
}

impl OverviewView {
    pub fn mount(&mut self) {
        if *self == OverviewView::Unmounted {
            *self = OverviewView::Loading;
        }
    }

    pub fn is_busy(&self) -> bool {
        *self == OverviewView::Loading
    }

    pub async fn load(&mut self, client: &RpcClient) {
        info!("loading wallet overview");
        *self = match WalletSummary::fetch(client).await {
            Ok(summary) => OverviewView::Ready(summary),
            Err(err) => {
                warn!(error = %err, "failed to load wallet overview");
                OverviewView::Failed(err.to_string())
            }
        };
    }

    pub fn body(&self) -> String {
        match self {
            OverviewView::Unmounted => String::new(),
            OverviewView::Loading => "Loading wallet summary…".to_string(),
            OverviewView::Ready(summary) => summary.render(),
            OverviewView::Failed(err) => format!("Error: {err}"),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, OverviewView::Failed(_))
    }
}
