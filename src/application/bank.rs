use super::accounts::AccountService;
use super::cards::CardService;
use super::clients::ClientService;
use super::ledger::LedgerEngine;
use super::loans::LoanEngine;
use super::locks::AccountLocks;
use crate::config::BankConfig;
use crate::domain::ports::Stores;
use crate::infrastructure::in_memory::in_memory_stores;
use std::sync::Arc;

/// The main entry point for banking operations.
///
/// `Bank` owns the storage backends and hands out the services that operate
/// on them. It is `Send + Sync`; share it behind an `Arc` to serve concurrent
/// callers.
pub struct Bank {
    ledger: Arc<LedgerEngine>,
    loans: LoanEngine,
    accounts: AccountService,
    clients: ClientService,
    cards: CardService,
}

impl Bank {
    /// Creates a new `Bank` instance.
    ///
    /// # Arguments
    ///
    /// * `stores` - The entity stores every service reads and writes.
    /// * `config` - Behaviour switches, see [`BankConfig`].
    pub fn new(stores: Stores, config: BankConfig) -> Self {
        let locks = AccountLocks::new();
        let ledger = Arc::new(LedgerEngine::new(
            stores.accounts.clone(),
            stores.transactions.clone(),
            stores.commits.clone(),
            locks.clone(),
        ));
        let loans = LoanEngine::new(
            stores.loans.clone(),
            stores.clients.clone(),
            stores.accounts.clone(),
            Arc::clone(&ledger),
            config,
        );
        Self {
            ledger,
            loans,
            cards: CardService::new(stores.cards, stores.accounts.clone()),
            accounts: AccountService::new(stores.accounts, locks),
            clients: ClientService::new(stores.clients, stores.loans),
        }
    }

    /// A bank over fresh in-memory stores.
    pub fn in_memory(config: BankConfig) -> Self {
        Self::new(in_memory_stores(), config)
    }

    pub fn ledger(&self) -> &LedgerEngine {
        &self.ledger
    }

    pub fn loans(&self) -> &LoanEngine {
        &self.loans
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn clients(&self) -> &ClientService {
        &self.clients
    }

    pub fn cards(&self) -> &CardService {
        &self.cards
    }
}
