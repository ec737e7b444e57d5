/// Prefix marking internal framework hooks; such commands are never
/// instrumented.
pub const INTERNAL_COMMAND_PREFIX: &str = "_";

/// Options for the instrumentation pass.
#[derive(Debug, Clone, Default)]
pub struct InstrumentOptions {
    /// Additional command names to leave uninstrumented, on top of the
    /// internal-prefix rule.
    pub exclude: Vec<String>,
}

impl InstrumentOptions {
    /// Options excluding the given command names.
    pub fn excluding<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude: names.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn is_excluded(&self, name: &str) -> bool {
        name.starts_with(INTERNAL_COMMAND_PREFIX) || self.exclude.iter().any(|n| n == name)
    }
}
