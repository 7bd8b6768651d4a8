use crate::domain::account::AccountStatus;
use crate::domain::card::{Card, CardDetails, CardId};
use crate::domain::ports::{SharedAccountStore, SharedCardStore};
use crate::error::{BankError, Result};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{info, instrument};

/// Issuing, blocking and lookup of payment cards.
pub struct CardService {
    cards: SharedCardStore,
    accounts: SharedAccountStore,
    /// Serializes issuing and status changes.
    changes: Mutex<()>,
}

impl CardService {
    pub fn new(cards: SharedCardStore, accounts: SharedAccountStore) -> Self {
        Self {
            cards,
            accounts,
            changes: Mutex::new(()),
        }
    }

    pub async fn issue_debit_card(&self, details: CardDetails) -> Result<Card> {
        self.issue(Card::debit(0, details)?).await
    }

    pub async fn issue_credit_card(
        &self,
        details: CardDetails,
        credit_limit: Decimal,
        closing_day: u8,
        due_day: u8,
    ) -> Result<Card> {
        self.issue(Card::credit(0, details, credit_limit, closing_day, due_day)?)
            .await
    }

    /// Stores an already validated card under a fresh id. The linked account
    /// must be ACTIVE and the number unused.
    #[instrument(skip_all, fields(account = card.account, kind = card.kind.as_str()))]
    async fn issue(&self, mut card: Card) -> Result<Card> {
        let _change = self.changes.lock().await;

        let account = self
            .accounts
            .get(card.account)
            .await?
            .ok_or_else(|| BankError::not_found("Account", card.account))?;
        if account.status != AccountStatus::Active {
            return Err(BankError::validation(format!(
                "Cards can only be issued for active accounts; account {} is {}",
                account.id,
                account.status.as_str()
            )));
        }

        let taken = self
            .cards
            .get_all()
            .await?
            .iter()
            .any(|existing| existing.number == card.number);
        if taken {
            return Err(BankError::Duplicate(format!(
                "Card number {} already issued",
                card.masked_number()
            )));
        }

        card.id = self.cards.next_id().await?;
        self.cards.store(card.clone()).await?;
        info!(card = card.id, "Card issued");
        Ok(card)
    }

    pub async fn block_card(&self, id: CardId) -> Result<Card> {
        self.change(id, Card::block).await
    }

    pub async fn unblock_card(&self, id: CardId) -> Result<Card> {
        self.change(id, Card::unblock).await
    }

    async fn change(
        &self,
        id: CardId,
        apply: impl FnOnce(&mut Card) -> std::result::Result<(), BankError>,
    ) -> Result<Card> {
        let _change = self.changes.lock().await;
        let mut card = self.get_card(id).await?;
        apply(&mut card)?;
        self.cards.store(card.clone()).await?;
        info!(card = card.id, status = card.status.as_str(), "Card status changed");
        Ok(card)
    }

    pub async fn get_card(&self, id: CardId) -> Result<Card> {
        self.cards
            .get(id)
            .await?
            .ok_or_else(|| BankError::not_found("Card", id))
    }

    pub async fn list_cards(&self) -> Result<Vec<Card>> {
        self.cards.get_all().await
    }
}
