//! Domain constants shared by the parser, the projector and the driver.

/// Extension of gamebook source files (without the dot).
pub const GAMEBOOK_EXT: &str = "gbook";

/// Default file name of the compiled store.
pub const DEFAULT_OUTPUT: &str = "gamebook.db";

/// Name given to the Module of a file that has no Module header.
pub const DEFAULT_MODULE_NAME: &str = "main";

/// Word index sentinel for a line break inside a paragraph. No word or
/// punctuation token can spell it.
pub const LINE_BREAK_WORD: &str = "<NL>";

/// Word index sentinel for a paragraph break.
pub const PARAGRAPH_BREAK_WORD: &str = "<NP>";

/// Row id of the singleton root node.
pub const ROOT_NODE_ID: i64 = 1;

// Synthetic script name prefixes
pub const MODULE_PREFIX: &str = "m";
pub const SCENE_PREFIX: &str = "s";
pub const PASSAGE_PREFIX: &str = "p";
pub const ITEM_PREFIX: &str = "i";
pub const NODE_SCRIPT_PREFIX: &str = "o";
