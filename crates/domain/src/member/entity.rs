use common::{Address, MemberId};
use serde::Serialize;
use store::{MemberRecord, NewMember};

use super::MemberError;

/// A registered shop member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    id: MemberId,
    name: String,
    address: Address,
}

impl Member {
    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Changes the member's name.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), MemberError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }
}

impl From<MemberRecord> for Member {
    fn from(record: MemberRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            address: record.address,
        }
    }
}

fn validate_name(name: &str) -> Result<(), MemberError> {
    if name.trim().is_empty() {
        return Err(MemberError::EmptyName);
    }
    Ok(())
}

/// Command to register a new member.
#[derive(Debug, Clone)]
pub struct JoinMember {
    pub name: String,
    pub address: Address,
}

impl JoinMember {
    /// Creates a new JoinMember command.
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }

    pub(crate) fn into_new_member(self) -> Result<NewMember, MemberError> {
        validate_name(&self.name)?;
        if !self.address.is_complete() {
            return Err(MemberError::IncompleteAddress);
        }
        Ok(NewMember {
            name: self.name,
            address: self.address,
        })
    }
}
