use bitcli_client::RpcClient;
use tracing::{info, warn};

const NO_WALLET_MARKER: &str = "No wallet loaded";
const NO_WALLET_GUIDANCE: &str = "Please create a wallet first!";

/// What the Receive tab ended up with after asking for an address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressOutcome {
    Address(String),
    /// The daemon has no wallet to derive an address from.
    NoWallet,
    Failed(String),
}

impl AddressOutcome {
    pub fn from_result(result: bitcli_client::Result<String>) -> Self {
        match result {
            Ok(address) => AddressOutcome::Address(address),
            Err(err) => {
                let message = err.to_string();
                if message.contains(NO_WALLET_MARKER) {
                    AddressOutcome::NoWallet
                } else {
                    AddressOutcome::Failed(message)
                }
            }
        }
    }

    pub fn text(&self) -> String {
        match self {
            AddressOutcome::Address(address) => format!("New Address:\n{address}"),
            AddressOutcome::NoWallet => NO_WALLET_GUIDANCE.to_string(),
            AddressOutcome::Failed(message) => format!("Error fetching address: {message}"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ReceiveView {
    #[default]
    Unmounted,
    Loading,
    Done(AddressOutcome),
}

impl ReceiveView {
    pub fn mount(&mut self) {
        if *self == ReceiveView::Unmounted {
            *self = ReceiveView::Loading;
        }
    }

    pub fn is_busy(&self) -> bool {
        *self == ReceiveView::Loading
    }

    pub async fn load(&mut self, client: &RpcClient) {
        info!("requesting new address");
        let result = client.get_new_address().await;
        if let Err(err) = &result {
            warn!(error = %err, "failed to fetch address");
        }
        *self = ReceiveView::Done(AddressOutcome::from_result(result));
    }

    pub fn body(&self) -> String {
        match self {
            ReceiveView::Unmounted => String::new(),
            ReceiveView::Loading => "Requesting a new address…".to_string(),
            ReceiveView::Done(outcome) => outcome.text(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ReceiveView::Done(AddressOutcome::Failed(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcli_client::mocks::{MockDaemon, Reply};
    use bitcli_client::Error;
    use serde_json::json;

    #[test]
    fn test_error_mapping() {
        let outcome =
            AddressOutcome::from_result(Err(Error::Rpc("No wallet loaded (code -18)".to_string())));
        assert_eq!(outcome, AddressOutcome::NoWallet);
        assert_eq!(outcome.text(), "Please create a wallet first!");

        let outcome = AddressOutcome::from_result(Err(Error::Rpc("keypool ran out".to_string())));
        assert_eq!(
            outcome.text(),
            "Error fetching address: rpc error: keypool ran out"
        );

        let outcome = AddressOutcome::from_result(Ok("bcrt1qnew".to_string()));
        assert_eq!(outcome.text(), "New Address:\nbcrt1qnew");
    }

    #[tokio::test]
    async fn test_load_address() {
        let daemon = MockDaemon::start().await.unwrap();
        daemon.reply("getnewaddress", Reply::result(json!("bcrt1qfresh")));

        let mut view = ReceiveView::default();
        view.mount();
        assert!(view.is_busy());
        view.load(&daemon.client()).await;
        assert_eq!(view.body(), "New Address:\nbcrt1qfresh");
        assert!(!view.is_error());
    }

    #[tokio::test]
    async fn test_missing_wallet_guidance() {
        let daemon = MockDaemon::start().await.unwrap();
        daemon.reply(
            "getnewaddress",
            Reply::rpc_error(-18, "No wallet loaded. Load a wallet using loadwallet."),
        );

        let mut view = ReceiveView::Loading;
        view.load(&daemon.client()).await;
        assert_eq!(view.body(), "Please create a wallet first!");
        assert!(!view.is_error());
    }

    #[tokio::test]
    async fn test_other_errors_are_verbatim() {
        let daemon = MockDaemon::start().await.unwrap();
        daemon.reply("getnewaddress", Reply::raw(403, "forbidden"));

        let mut view = ReceiveView::Loading;
        view.load(&daemon.client()).await;
        assert_eq!(
            view.body(),
            "Error fetching address: failed: 403 Forbidden: forbidden"
        );
        assert!(view.is_error());
    }
}
