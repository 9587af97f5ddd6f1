//! Business-process precedence.
//!
//! Leaver outranks Joiner, which outranks Mover. Before a process may fire,
//! every strictly higher process is re-checked for the same transition.

/// Joiner business process.
pub const JOINER: &str = "joiner";

/// Mover business process.
pub const MOVER: &str = "mover";

/// Leaver business process.
pub const LEAVER: &str = "leaver";

/// Higher-precedence processes per process, highest first. Acyclic, and no
/// process lists itself.
const CHECK_FIRST: &[(&str, &[&str])] = &[
    (LEAVER, &[]),
    (JOINER, &[LEAVER]),
    (MOVER, &[LEAVER, JOINER]),
];

/// Immutable precedence table.
///
/// # Example
///
/// ```
/// use rapidsetup_constraint::TriggerPrecedence;
///
/// assert_eq!(TriggerPrecedence::ordered_check_first_list("mover"), &["leaver", "joiner"]);
/// assert!(TriggerPrecedence::ordered_check_first_list("leaver").is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TriggerPrecedence;

impl TriggerPrecedence {
    /// Processes that must be checked before `process`, in check order.
    /// Unknown processes have none.
    pub fn ordered_check_first_list(process: &str) -> &'static [&'static str] {
        CHECK_FIRST
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(process.trim()))
            .map(|(_, higher)| *higher)
            .unwrap_or(&[])
    }

    /// All processes named by the table.
    pub fn processes() -> impl Iterator<Item = &'static str> {
        CHECK_FIRST.iter().map(|(name, _)| *name)
    }

    /// Name of the identity trigger backing a process, e.g. `RapidSetup Joiner`.
    pub fn trigger_name(process: &str) -> String {
        let process = process.trim();
        let mut chars = process.chars();
        let title: String = match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        };
        format!("RapidSetup {}", title)
    }
}

/// Returns true when `process` names the Joiner.
pub fn is_joiner(process: &str) -> bool {
    process.trim().eq_ignore_ascii_case(JOINER)
}
