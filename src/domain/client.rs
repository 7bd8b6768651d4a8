use crate::error::BankError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ClientId = u64;

/// A bank customer. Loans reference clients but never own them.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    /// National taxpayer identifier, unique across clients.
    pub tax_id: String,
    pub email: Option<String>,
    pub registered_at: DateTime<Utc>,
}

impl Client {
    pub fn new(
        id: ClientId,
        name: &str,
        tax_id: &str,
        email: Option<&str>,
    ) -> Result<Self, BankError> {
        let name = name.trim();
        let tax_id = tax_id.trim();
        if name.is_empty() {
            return Err(BankError::validation("Client name must not be blank"));
        }
        if tax_id.is_empty() {
            return Err(BankError::validation("Client tax id must not be blank"));
        }
        Ok(Self {
            id,
            name: name.to_string(),
            tax_id: tax_id.to_string(),
            email: email
                .map(str::trim)
                .filter(|email| !email.is_empty())
                .map(str::to_string),
            registered_at: Utc::now(),
        })
    }

    /// Applies the given changes; `None` keeps a field, a blank email clears
    /// it. The tax id is immutable.
    pub fn update(&mut self, name: Option<&str>, email: Option<&str>) -> Result<(), BankError> {
        let name = match name.map(str::trim) {
            Some("") => return Err(BankError::validation("Client name must not be blank")),
            Some(name) => name.to_string(),
            None => self.name.clone(),
        };
        self.name = name;
        if let Some(email) = email.map(str::trim) {
            self.email = (!email.is_empty()).then(|| email.to_string());
        }
        Ok(())
    }
}
