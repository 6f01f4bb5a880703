/// Rejection reasons for a scheduling submission. Invalid submissions are
/// refused synchronously; nothing is added to the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("update requests neither statistics nor news")]
    MissingDataFlags,

    #[error("an update titled '{0}' is already scheduled")]
    DuplicateTitle(String),
}
