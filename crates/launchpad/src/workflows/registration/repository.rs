use super::draft::WizardDraft;
use crate::profiles::{EntityKind, RepositoryError, UserId};

/// Draft persistence keyed by owner and entity kind; every wizard mutation is saved here.
pub trait DraftStore: Send + Sync {
    fn load(
        &self,
        owner: &UserId,
        kind: EntityKind,
    ) -> Result<Option<WizardDraft>, RepositoryError>;
    fn save(&self, draft: WizardDraft) -> Result<(), RepositoryError>;
    fn discard(&self, owner: &UserId, kind: EntityKind) -> Result<(), RepositoryError>;
}
