/// Behaviour switches for a [`crate::application::bank::Bank`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BankConfig {
    /// Credit the approved amount to the loan's credit account on approval.
    pub credit_on_approval: bool,
}
