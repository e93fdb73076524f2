//! Common gamebook sources for tests.

/// A scene with one passage, a forward link and its action
pub const FOREST: &str = "\
# Module: Lands \"The lands\"
# Scene: Forest (dark) \"Tall trees\" { visited: false }
## Passage: Clearing
You stand in a clearing. A [[door|open]] waits.

Birds sing.
open { opened: true }
";

pub const DOOR: &str = "\
# Scene: Hall
## Passage: Entrance
Go to the [[door]].
";

/// "lantern" five times, one of them inside a link
pub const LANTERNS: &str = "\
# Scene: Cellar
## Passage: Stairs
A lantern hangs here. Another lantern, and a lantern.
Take the [[lantern]].
## Passage: Vault
The last lantern is dark.
";

pub const FOREST_PART_ONE: &str = "\
# Scene: Forest
## Passage: Edge
The trees begin here.
";

pub const FOREST_PART_TWO: &str = "\
# Scene: Forest (misty) \"Ignored on reuse\"
## Passage: Heart
Deep in the woods.
";

pub const DANGLING: &str = "\
# Scene: Hall
## Passage: Waiting
Nothing happens.
wait { turns: 1 }
";

pub const AMBIGUOUS: &str = "\
# Scene: Hall
## Passage: Gate
Open the [[wooden door]].
";

pub const EMPTY_LINK: &str = "\
# Scene: Hall
## Passage: Gate
Nowhere to go [[]].
";

pub const BAD_ACTION_SCRIPT: &str = "\
# Scene: Hall
## Passage: Gate
Try the [[lever|pull]].
pull { go(]) }
";

pub const BAD_HEADER_SCRIPT: &str = "\
# Scene: Hall { x: (1 }
## Passage: Gate
Quiet.
";

pub const ITEM: &str = "\
# Item: Lamp (lit) \"A brass lamp\"
A brass [[lamp|take]].
take { taken: true }
";

pub const CONDITIONAL: &str = "\
# Scene: Cave
## Passage: Dark
<<if state.lit >>The [[lamp]] glows.<</if>> You hear <<= state.sound >>.
<<script>> state.seen = true; <</script>>
";
