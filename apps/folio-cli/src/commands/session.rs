//! # Session Commands
//!
//! Sets and clears the persisted authenticated flag. No credentials are
//! checked.

use tracing::debug;

use crate::state::LedgerState;

pub fn login(state: &mut LedgerState) -> String {
    debug!("login command");
    state.ledger_mut().login();
    "Signed in".to_string()
}

pub fn logout(state: &mut LedgerState) -> String {
    debug!("logout command");
    state.ledger_mut().logout();
    "Signed out".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;

    #[tokio::test]
    async fn test_login_then_logout() {
        let mut state = testing::state().await;
        assert!(!state.ledger().ledger().store().is_authenticated());

        assert_eq!(login(&mut state), "Signed in");
        assert!(state.ledger().ledger().store().is_authenticated());

        logout(&mut state);
        assert!(!state.ledger().ledger().store().is_authenticated());
        state.close().await.unwrap();
    }
}
