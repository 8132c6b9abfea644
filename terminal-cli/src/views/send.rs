use bitcli_client::RpcClient;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;
use tracing::{info, warn};

/// Input rejected before anything is sent to the daemon.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing address")]
    MissingAddress,
    #[error("No amount entered")]
    MissingAmount,
    #[error("Amount should be a number")]
    NotANumber,
    #[error("Amount must be > 0")]
    NotPositive,
    #[error("Not enough funds. You have {balance} BTC")]
    InsufficientFunds { balance: f64 },
}

/// Local checks, in order; the first failure wins.
///
/// Surrounding whitespace is ignored. Non-finite values (`inf`, `NaN`) are not
/// amounts.
pub fn validate_form(address: &str, amount_text: &str) -> Result<f64, ValidationError> {
    if address.trim().is_empty() {
        return Err(ValidationError::MissingAddress);
    }
    let amount_text = amount_text.trim();
    if amount_text.is_empty() {
        return Err(ValidationError::MissingAmount);
    }
    let amount: f64 = amount_text
        .parse()
        .map_err(|_| ValidationError::NotANumber)?;
    if !amount.is_finite() {
        return Err(ValidationError::NotANumber);
    }
    if amount <= 0.0 {
        return Err(ValidationError::NotPositive);
    }
    Ok(amount)
}

pub fn check_funds(amount: f64, balance: f64) -> Result<(), ValidationError> {
    if amount > balance {
        return Err(ValidationError::InsufficientFunds { balance });
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Field {
    #[default]
    Address,
    Amount,
    SendButton,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Address => Field::Amount,
            Field::Amount => Field::SendButton,
            Field::SendButton => Field::Address,
        }
    }

    fn prev(self) -> Self {
        match self {
            Field::Address => Field::SendButton,
            Field::Amount => Field::Address,
            Field::SendButton => Field::Amount,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SendState {
    /// Form shown, no feedback yet.
    #[default]
    Idle,
    Validating,
    Rejected(ValidationError),
    Submitting { address: String, amount: f64 },
    Succeeded(String),
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Pending,
    Success,
    Error,
}

#[derive(Debug, Default)]
pub struct SendView {
    pub address: String,
    pub amount: String,
    pub focus: Field,
    pub state: SendState,
}

impl SendView {
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            SendState::Validating | SendState::Submitting { .. }
        )
    }

    pub fn submit(&mut self) {
        if !self.is_busy() {
            self.state = SendState::Validating;
        }
    }

    /// Run the network step for the current state, if any.
    pub async fn advance(&mut self, client: &RpcClient) {
        self.state = match std::mem::take(&mut self.state) {
            SendState::Validating => self.validate(client).await,
            SendState::Submitting { address, amount } => {
                info!(%address, amount, "sending funds");
                match client.send_to_address(&address, amount).await {
                    Ok(txid) => {
                        info!(%txid, "send succeeded");
                        SendState::Succeeded(txid)
                    }
                    Err(err) => {
                        warn!(error = %err, "send failed");
                        SendState::Failed(err.to_string())
                    }
                }
            }
            other => other,
        };
    }

    async fn validate(&self, client: &RpcClient) -> SendState {
        let amount = match validate_form(&self.address, &self.amount) {
            Ok(amount) => amount,
            Err(reason) => return SendState::Rejected(reason),
        };
        let balance = match client.get_balance().await {
            Ok(balance) => balance,
            Err(err) => {
                warn!(error = %err, "balance check failed");
                return SendState::Failed(err.to_string());
            }
        };
        match check_funds(amount, balance) {
            Ok(()) => SendState::Submitting {
                address: self.address.trim().to_string(),
                amount,
            },
            Err(reason) => SendState::Rejected(reason),
        }
    }

    /// Feedback line; `None` until the first submission.
    pub fn feedback(&self) -> Option<(String, Tone)> {
        match &self.state {
            SendState::Idle => None,
            SendState::Validating => Some(("Checking…".to_string(), Tone::Pending)),
            SendState::Submitting { .. } => Some(("Sending…".to_string(), Tone::Pending)),
            SendState::Rejected(reason) => Some((reason.to_string(), Tone::Error)),
            SendState::Succeeded(txid) => Some((format!("Sent! TXID: {txid}"), Tone::Success)),
            SendState::Failed(err) => Some((format!("Failed to send: {err}"), Tone::Error)),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Tab, _) | (KeyCode::Down, _) => self.focus = self.focus.next(),
            (KeyCode::BackTab, _) | (KeyCode::Up, _) => self.focus = self.focus.prev(),
            (KeyCode::Enter, _) => match self.focus {
                Field::Address => self.focus = Field::Amount,
                Field::Amount | Field::SendButton => self.submit(),
            },
            (KeyCode::Char(c), m) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                if let Some(field) = self.focused_text() {
                    field.push(c);
                }
            }
            (KeyCode::Backspace, _) => {
                if let Some(field) = self.focused_text() {
                    field.pop();
                }
            }
            (KeyCode::Esc, _) => {
                if let Some(field) = self.focused_text() {
                    field.clear();
                }
            }
            _ => {}
        }
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Address => Some(&mut self.address),
            Field::Amount => Some(&mut self.amount),
            Field::SendButton => None,
        }
    }
}
