use serde::{Deserialize, Serialize};

use petalflow_core::{AggregateId, AggregateRoot, DomainError, DomainResult, Entity};

/// Party identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(pub AggregateId);

impl PartyId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PartyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Party kind: what role the party plays in the order flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    Customer,
    Employee,
    Supplier,
}

/// Party status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyStatus {
    Active,
    Suspended,
}

/// Already-authenticated caller identity, handed in by the transport boundary.
///
/// The boundary performs capability checks before invoking core operations;
/// the core only re-validates ownership invariants it cannot delegate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: PartyId,
    pub kind: PartyKind,
}

impl Caller {
    pub fn new(id: PartyId, kind: PartyKind) -> Self {
        Self { id, kind }
    }

    pub fn is_employee(&self) -> bool {
        self.kind == PartyKind::Employee
    }
}

/// Aggregate root: Party (customer, employee or supplier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    id: PartyId,
    kind: PartyKind,
    name: String,
    email: String,
    status: PartyStatus,
    version: u64,
}

impl Party {
    /// Register a new party. Newly registered parties are active.
    pub fn register(
        id: PartyId,
        kind: PartyKind,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let email = email.into();

        if name.trim().is_empty() {
            return Err(DomainError::invalid_argument("name cannot be empty"));
        }
        if email.trim().is_empty() {
            return Err(DomainError::invalid_argument("email cannot be empty"));
        }

        Ok(Self {
            id,
            kind,
            name,
            email,
            status: PartyStatus::Active,
            version: 1,
        })
    }

    pub fn id_typed(&self) -> PartyId {
        self.id
    }

    pub fn kind(&self) -> PartyKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn status(&self) -> PartyStatus {
        self.status
    }

    /// Invariant helper: suspended parties cannot transact.
    pub fn can_transact(&self) -> bool {
        self.status == PartyStatus::Active
    }

    /// Update name and/or email; `None` keeps the existing value.
    pub fn update_details(
        &mut self,
        name: Option<String>,
        email: Option<String>,
    ) -> DomainResult<()> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(DomainError::invalid_argument("name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(email) = email {
            if email.trim().is_empty() {
                return Err(DomainError::invalid_argument("email cannot be empty"));
            }
            self.email = email;
        }
        self.version += 1;
        Ok(())
    }

    pub fn suspend(&mut self) -> DomainResult<()> {
        if self.status == PartyStatus::Suspended {
            return Err(DomainError::invalid_state("party is already suspended"));
        }
        self.status = PartyStatus::Suspended;
        self.version += 1;
        Ok(())
    }
}

impl Entity for Party {
    type Id = PartyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Party {
    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_party_id() -> PartyId {
        PartyId::new(AggregateId::new())
    }

    #[test]
    fn register_creates_active_party() {
        let party = Party::register(
            test_party_id(),
            PartyKind::Customer,
            "Flores del Valle",
            "compras@floresdelvalle.example",
        )
        .unwrap();

        assert_eq!(party.kind(), PartyKind::Customer);
        assert_eq!(party.status(), PartyStatus::Active);
        assert!(party.can_transact());
        assert_eq!(party.version(), 1);
    }

    #[test]
    fn register_rejects_blank_name() {
        let err = Party::register(test_party_id(), PartyKind::Supplier, "   ", "a@b.example")
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn register_rejects_blank_email() {
        let err =
            Party::register(test_party_id(), PartyKind::Supplier, "Vivero Sur", "").unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn update_details_keeps_unset_fields() {
        let mut party = Party::register(
            test_party_id(),
            PartyKind::Supplier,
            "Vivero Sur",
            "ventas@viverosur.example",
        )
        .unwrap();

        party
            .update_details(Some("Vivero Sur SA".to_string()), None)
            .unwrap();

        assert_eq!(party.name(), "Vivero Sur SA");
        assert_eq!(party.email(), "ventas@viverosur.example");
        assert_eq!(party.version(), 2);
    }

    #[test]
    fn suspended_party_cannot_transact_or_suspend_twice() {
        let mut party = Party::register(
            test_party_id(),
            PartyKind::Customer,
            "Eventos Lila",
            "lila@eventos.example",
        )
        .unwrap();

        party.suspend().unwrap();
        assert!(!party.can_transact());

        let err = party.suspend().unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn caller_employee_helper() {
        let employee = Caller::new(test_party_id(), PartyKind::Employee);
        let customer = Caller::new(test_party_id(), PartyKind::Customer);
        assert!(employee.is_employee());
        assert!(!customer.is_employee());
    }
}
