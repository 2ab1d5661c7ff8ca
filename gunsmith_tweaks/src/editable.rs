//! The fixed set of quests this plugin is allowed to modify.
//!
//! Nothing outside this list is ever touched, whatever the override files say.

use std::collections::HashSet;

use gunsmith_data::QuestId;

/// Gunsmith quest line, parts 1 through 25.
pub const GUNSMITH_QUESTS: [&str; 25] = [
    "5ac23c6186f7741247042bad", // Gunsmith 1
    "5ac2426c86f774138762edfe", // Gunsmith 2
    "5ac2428686f77412450b42bf", // Gunsmith 3
    "639872f9decada40426d3447", // Gunsmith 4
    "5ae3267986f7742a413592fe", // Gunsmith 5
    "5ae3270f86f77445ba41d4dd", // Gunsmith 6
    "5ac244eb86f7741356335af1", // Gunsmith 7
    "5ae3277186f7745973054106", // Gunsmith 8
    "639872fa9b4fb827b200d8e5", // Gunsmith 9
    "5ae327c886f7745c7b3f2f3f", // Gunsmith 10
    "639872fc93ae507d5858c3a6", // Gunsmith 11
    "5b47799d86f7746c5d6a5fd8", // Gunsmith 12
    "5ac244c486f77413e12cf945", // Gunsmith 13
    "639872fe8871e1272b10ccf6", // Gunsmith 14
    "5ae3280386f7742a41359364", // Gunsmith 15
    "5ac242ab86f77412464f68b4", // Gunsmith 16
    "5b47749f86f7746c5d6a5fd4", // Gunsmith 17
    "5b477b6f86f7747290681823", // Gunsmith 18
    "639873003693c63d86328f25", // Gunsmith 19
    "5b477f7686f7744d1b23c4d2", // Gunsmith 20
    "63987301e11ec11ff5504036", // Gunsmith 21
    "5b47825886f77468074618d3", // Gunsmith 22
    "64f83bb69878a0569d6ecfbe", // Gunsmith 23
    "64f83bcdde58fc437700d8fa", // Gunsmith 24
    "64f83bd983cfca080a362c82", // Gunsmith 25
];

/// Immutable allow-list of quest ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableSet {
    ids: HashSet<&'static str>,
}

impl EditableSet {
    /// The Gunsmith quest line.
    pub fn gunsmith() -> Self {
        Self {
            ids: GUNSMITH_QUESTS.into_iter().collect(),
        }
    }

    pub fn contains(&self, id: &QuestId) -> bool {
        self.ids.contains(id.as_str())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
