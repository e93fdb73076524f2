//! Adapter between the projector and the external script minifier.
//!
//! Raw script text from headers, actions and tags is wrapped as an object
//! literal bound to a synthetic name and handed to a [`Minifier`]. A failure
//! never aborts the run: the error carries the synthetic name, the caller
//! reports it and keeps whatever the field held before.

mod minifier;

pub use minifier::{CompactMinifier, Minifier, MinifyError};

/// A script that the minifier rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("script `{name}` failed to compile: {source}")]
pub struct ScriptError {
    pub name: String,
    #[source]
    pub source: MinifyError,
}

pub struct ScriptCompiler {
    minifier: Box<dyn Minifier>,
}

impl Default for ScriptCompiler {
    fn default() -> Self {
        Self::new(CompactMinifier)
    }
}

impl std::fmt::Debug for ScriptCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptCompiler").finish_non_exhaustive()
    }
}

impl ScriptCompiler {
    pub fn new(minifier: impl Minifier + 'static) -> Self {
        Self {
            minifier: Box::new(minifier),
        }
    }

    /// Compile `source` as the body of an object literal named `name`:
    /// `var <name> = {<source>};`
    pub fn compile(&self, source: &str, name: &str) -> Result<String, ScriptError> {
        let wrapped = format!("var {name} = {{{source}}};");
        self.run(&wrapped, name)
    }

    /// Compile a bare expression (if-tag conditions)
    pub fn compile_expression(&self, source: &str, name: &str) -> Result<String, ScriptError> {
        self.run(source.trim(), name)
    }

    fn run(&self, source: &str, name: &str) -> Result<String, ScriptError> {
        self.minifier.minify(source).map_err(|source| ScriptError {
            name: name.to_string(),
            source,
        })
    }
}
