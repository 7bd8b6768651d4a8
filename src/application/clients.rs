use crate::domain::client::{Client, ClientId};
use crate::domain::ports::{SharedClientStore, SharedLoanStore};
use crate::error::{BankError, Result};
use tokio::sync::Mutex;
use tracing::info;

pub struct ClientService {
    clients: SharedClientStore,
    loans: SharedLoanStore,
    /// Serializes registrations, updates and deletions.
    registrations: Mutex<()>,
}

impl ClientService {
    pub fn new(clients: SharedClientStore, loans: SharedLoanStore) -> Self {
        Self {
            clients,
            loans,
            registrations: Mutex::new(()),
        }
    }

    /// Registers a client; the tax id must not belong to anyone else.
    pub async fn register_client(
        &self,
        name: &str,
        tax_id: &str,
        email: Option<&str>,
    ) -> Result<Client> {
        let _registration = self.registrations.lock().await;
        if self.clients.find_by_tax_id(tax_id.trim()).await?.is_some() {
            return Err(BankError::Duplicate(format!(
                "Client with tax id {} already exists",
                tax_id.trim()
            )));
        }

        let id = self.clients.next_id().await?;
        let client = Client::new(id, name, tax_id, email)?;
        self.clients.store(client.clone()).await?;
        info!(client = client.id, "Client registered");
        Ok(client)
    }

    pub async fn get_client(&self, id: ClientId) -> Result<Client> {
        self.clients
            .get(id)
            .await?
            .ok_or_else(|| BankError::not_found("Client", id))
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        self.clients.get_all().await
    }

    /// Changes name and/or email; see [`Client::update`].
    pub async fn update_client(
        &self,
        id: ClientId,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Client> {
        let _registration = self.registrations.lock().await;
        let mut client = self.get_client(id).await?;
        client.update(name, email)?;
        self.clients.store(client.clone()).await?;
        info!(client = client.id, "Client updated");
        Ok(client)
    }

    /// Removes a client nobody depends on. Clients referenced by a loan stay.
    pub async fn delete_client(&self, id: ClientId) -> Result<()> {
        let _registration = self.registrations.lock().await;
        self.get_client(id).await?;

        let borrowed = self
            .loans
            .get_all()
            .await?
            .iter()
            .any(|loan| loan.borrower == id);
        if borrowed {
            return Err(BankError::validation(format!(
                "Client {id} has loans and cannot be deleted"
            )));
        }

        if !self.clients.delete(id).await? {
            return Err(BankError::not_found("Client", id));
        }
        info!(client = id, "Client deleted");
        Ok(())
    }
}
