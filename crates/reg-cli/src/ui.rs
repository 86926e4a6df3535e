use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

/// Narrower `COLUMNS` values are ignored rather than squeezing every cell.
const MIN_TERM_WIDTH: usize = 40;

/// Terminal-dependent rendering choices, fixed once at startup.
#[derive(Clone, Copy, Debug, Default)]
pub struct UiPrefs {
    pub table_color: bool,
    pub term_width: Option<usize>,
}

impl UiPrefs {
    fn detect(flags: &GlobalFlags) -> Self {
        let wants_color = flags.format == OutputFormat::Table
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stdout().is_terminal();
        let term_width = std::env::var("COLUMNS")
            .ok()
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|width| *width >= MIN_TERM_WIDTH);
        Self {
            table_color: wants_color,
            term_width,
        }
    }
}

static PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    PREFS.get_or_init(|| UiPrefs::detect(flags));
}

/// Preferences from [`init`], or plain uncolored output when it never ran.
#[must_use]
pub fn prefs() -> UiPrefs {
    PREFS.get().copied().unwrap_or_default()
}
