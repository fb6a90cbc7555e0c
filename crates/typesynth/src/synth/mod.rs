//! Declaration synthesis
//!
//! - `universe`: merged FQN lookup and inheritance walks
//! - `names`: deterministic names of synthesized declarations
//! - `settings`: `$<Class>Settings` interfaces
//! - `events`: `<Class>$<Event>EventParameters` interfaces and event aliases
//! - `retype`: rewrites of the attach/detach/fire methods and settings handlers
//! - `driver`: the two-pass run over dependencies and the primary library

pub mod driver;
pub mod events;
pub mod names;
pub mod retype;
pub mod settings;
pub mod universe;

pub use driver::{KindCounts, SynthesisPass, SynthesisReport, SynthesizedKind, Synthesizer};
pub use events::{synthesize_events, EventSynthesis};
pub use names::{settings_names, EventMethodNames, EventNames};
pub use retype::{plan_event_rewrites, Rewrite, RewriteTable, RewriteTarget};
pub use settings::synthesize_settings;
pub use universe::{Ancestors, SymbolUniverse};

/// How much detail a pass produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynthesisMode {
    /// Identity-only stubs, enough to be referenced and extended
    Shallow,
    /// Members, `extends` and inheritance de-duplication
    Full,
}

impl SynthesisMode {
    /// Map the `addDetails` flag of a pass
    pub fn from_add_details(add_details: bool) -> Self {
        if add_details {
            SynthesisMode::Full
        } else {
            SynthesisMode::Shallow
        }
    }
}
