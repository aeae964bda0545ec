//! Member registration and lookup.

use common::MemberId;
use store::{MemberRepository, Store, StoreTx};

use crate::error::{DomainError, Result};

use super::{JoinMember, Member};

/// Service for registering and maintaining members.
pub struct MemberService<S: Store> {
    store: S,
}

impl<S: Store> MemberService<S> {
    /// Creates a new member service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a member and returns its id.
    ///
    /// Fails with [`DomainError::DuplicateMember`] if the name is taken. The
    /// lookup before the insert only short-circuits the common case; a
    /// concurrent join is caught by the unique constraint on insert.
    #[tracing::instrument(skip(self, cmd), fields(name = %cmd.name))]
    pub async fn join(&self, cmd: JoinMember) -> Result<MemberId> {
        let new_member = cmd.into_new_member()?;
        let mut tx = self.store.begin().await?;

        if !tx.find_members_by_name(&new_member.name).await?.is_empty() {
            return Err(DomainError::DuplicateMember {
                name: new_member.name,
            });
        }

        let id = tx
            .insert_member(&new_member)
            .await
            .map_err(|e| DomainError::duplicate_or_store(e, &new_member.name))?;
        tx.commit().await?;

        metrics::counter!("members_joined_total").increment(1);
        tracing::info!(member_id = %id, "member joined");
        Ok(id)
    }

    /// Returns every member ordered by id.
    #[tracing::instrument(skip(self))]
    pub async fn find_members(&self) -> Result<Vec<Member>> {
        let mut tx = self.store.begin().await?;
        let members = tx.find_all_members().await?;
        Ok(members.into_iter().map(Member::from).collect())
    }

    /// Loads a member by id.
    #[tracing::instrument(skip(self))]
    pub async fn find_one(&self, id: MemberId) -> Result<Member> {
        let mut tx = self.store.begin().await?;
        load_member(&mut tx, id).await
    }

    /// Renames a member.
    #[tracing::instrument(skip(self, name))]
    pub async fn update(&self, id: MemberId, name: &str) -> Result<()> {
        let mut tx = self.store.begin().await?;
        let mut member = load_member(&mut tx, id).await?;
        member.rename(name)?;

        tx.update_member_name(id, member.name())
            .await
            .map_err(|e| DomainError::duplicate_or_store(e, member.name()))?;
        tx.commit().await?;

        tracing::debug!(member_id = %id, "member renamed");
        Ok(())
    }
}

pub(crate) async fn load_member<T: MemberRepository + ?Sized>(
    tx: &mut T,
    id: MemberId,
) -> Result<Member> {
    tx.find_member(id)
        .await?
        .map(Member::from)
        .ok_or(DomainError::NotFound {
            entity: "Member",
            id: id.as_i64(),
        })
}
