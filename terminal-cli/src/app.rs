use bitcli_client::RpcClient;
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::views::{OverviewView, ReceiveView, SendView, TransactionsView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Send,
    Receive,
    Transactions,
}

pub const TAB_ORDER: [Tab; 4] = [Tab::Overview, Tab::Send, Tab::Receive, Tab::Transactions];

impl Tab {
    pub fn name(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Send => "Send",
            Tab::Receive => "Receive",
            Tab::Transactions => "Transactions",
        }
    }

    pub fn index(&self) -> usize {
        TAB_ORDER.iter().position(|t| t == self).unwrap_or(0)
    }
}

pub struct AppState {
    pub active: Tab,
    pub overview: OverviewView,
    pub send: SendView,
    pub receive: ReceiveView,
    pub transactions: TransactionsView,
}

impl AppState {
    /// Starts on Overview, which is mounted right away.
    pub fn new() -> Self {
        let mut app = Self {
            active: Tab::Overview,
            overview: OverviewView::default(),
            send: SendView::default(),
            receive: ReceiveView::default(),
            transactions: TransactionsView::default(),
        };
        app.activate(Tab::Overview);
        app
    }

    /// Show `tab`, mounting its view the first time.
    pub fn activate(&mut self, tab: Tab) {
        if tab != self.active {
            debug!(tab = tab.name(), "switching tab");
        }
        self.active = tab;
        match tab {
            Tab::Overview => self.overview.mount(),
            Tab::Send => {}
            Tab::Receive => self.receive.mount(),
            Tab::Transactions => self.transactions.mount(),
        }
    }

    fn cycle(&mut self, forward: bool) {
        let len = TAB_ORDER.len();
        let idx = self.active.index();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        self.activate(TAB_ORDER[next]);
    }

    /// The active view has an RPC step waiting to run.
    pub fn is_busy(&self) -> bool {
        match self.active {
            Tab::Overview => self.overview.is_busy(),
            Tab::Send => self.send.is_busy(),
            Tab::Receive => self.receive.is_busy(),
            Tab::Transactions => self.transactions.is_busy(),
        }
    }

    /// Run the pending step of the active view to completion.
    pub async fn advance(&mut self, client: &RpcClient) {
        match self.active {
            Tab::Overview => self.overview.load(client).await,
            Tab::Send => self.send.advance(client).await,
            Tab::Receive => self.receive.load(client).await,
            Tab::Transactions => self.transactions.load(client).await,
        }
    }

    /// Returns `true` when the user asked to quit.
    pub fn handle_event(&mut self, ev: CEvent) -> bool {
        match ev {
            CEvent::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            _ => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let KeyEvent { code, modifiers, .. } = key;
        match (code, modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Char(c @ '1'..='4'), m)
                if m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.activate(TAB_ORDER[(c as u8 - b'1') as usize]);
            }
            (KeyCode::F(n @ 1..=4), _) => self.activate(TAB_ORDER[(n - 1) as usize]),
            (KeyCode::Right, KeyModifiers::CONTROL) => self.cycle(true),
            (KeyCode::Left, KeyModifiers::CONTROL) => self.cycle(false),
            _ => match self.active {
                // The form takes every other key, including 'q'.
                Tab::Send => self.send.handle_key(key),
                Tab::Transactions => match code {
                    KeyCode::Char('q') => return true,
                    KeyCode::Char('r') | KeyCode::Enter => self.transactions.refresh(),
                    KeyCode::Down => self.transactions.select_next(),
                    KeyCode::Up => self.transactions.select_prev(),
                    _ => {}
                },
                Tab::Overview | Tab::Receive => {
                    if code == KeyCode::Char('q') {
                        return true;
                    }
                }
            },
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::send::SendState;
    use crate::views::transactions::Listing;
    use bitcli_client::mocks::{MockDaemon, Reply};
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_starts_on_overview_and_mounts_it() {
        let app = AppState::new();
        assert_eq!(app.active, Tab::Overview);
        assert!(app.is_busy());
        assert_eq!(app.receive, ReceiveView::Unmounted);
        assert_eq!(app.transactions.listing, Listing::Unmounted);
    }

    #[test]
    fn test_tab_switching() {
        let mut app = AppState::new();
        app.overview = OverviewView::Failed("down".to_string());

        assert!(!app.handle_key(ctrl('3')));
        assert_eq!(app.active, Tab::Receive);
        assert!(app.is_busy());

        app.handle_key(key(KeyCode::F(4)));
        assert_eq!(app.active, Tab::Transactions);
        assert!(app.is_busy());

        app.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::CONTROL));
        assert_eq!(app.active, Tab::Overview);
        app.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL));
        assert_eq!(app.active, Tab::Transactions);

        app.handle_key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::ALT));
        assert_eq!(app.active, Tab::Send);
        assert!(!app.is_busy());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = AppState::new();
        assert!(app.handle_key(ctrl('c')));
        assert!(app.handle_key(ctrl('d')));
        assert!(app.handle_key(key(KeyCode::Char('q'))));

        // 'q' is just a character in the send form.
        app.activate(Tab::Send);
        assert!(!app.handle_key(key(KeyCode::Char('q'))));
        assert_eq!(app.send.address, "q");
        assert!(app.handle_key(ctrl('c')));
    }

    #[test]
    fn test_send_form_receives_keys() {
        let mut app = AppState::new();
        app.activate(Tab::Send);
        app.handle_key(key(KeyCode::Char('m')));
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.send.address, "m");
        assert_eq!(app.send.amount, "1");
        assert_eq!(app.active, Tab::Send);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.send.state, SendState::Validating);
        assert!(app.is_busy());
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut app = AppState::new();
        let mut release = ctrl('c');
        release.kind = KeyEventKind::Release;
        assert!(!app.handle_event(CEvent::Key(release)));
        assert!(app.handle_event(CEvent::Key(ctrl('c'))));
    }

    #[tokio::test]
    async fn test_refresh_reloads_transactions() {
        let daemon = MockDaemon::start().await.unwrap();
        daemon.reply("listtransactions", Reply::result(json!([])));
        let client = daemon.client();

        let mut app = AppState::new();
        app.overview = OverviewView::Failed("skip".to_string());
        app.activate(Tab::Transactions);
        while app.is_busy() {
            app.advance(&client).await;
        }
        assert_eq!(app.transactions.entries(), vec!["No transactions found"]);

        app.handle_key(key(KeyCode::Char('r')));
        assert!(app.is_busy());
        app.advance(&client).await;
        assert!(!app.is_busy());
        assert_eq!(daemon.methods(), vec!["listtransactions", "listtransactions"]);
    }

    #[tokio::test]
    async fn test_views_mount_once() {
        let daemon = MockDaemon::start().await.unwrap();
        daemon.reply("getnewaddress", Reply::result(json!("bcrt1qonce")));
        let client = daemon.client();

        let mut app = AppState::new();
        app.overview = OverviewView::Failed("skip".to_string());
        app.activate(Tab::Receive);
        app.advance(&client).await;
        app.activate(Tab::Overview);
        app.activate(Tab::Receive);
        assert!(!app.is_busy());
        assert_eq!(app.receive.body(), "New Address:\nbcrt1qonce");
        assert_eq!(daemon.methods(), vec!["getnewaddress"]);
    }
}
