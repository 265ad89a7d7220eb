//! Statement classification
//!
//! Global invariants enforced:
//! - Pure function of the statement shape, no per-file or global state
//! - Every statement gets at most one category
//! - Groups keep source order

use crate::ast::{InitializerKind, Statement, StatementKind};
use serde::{Deserialize, Serialize};

/// Application-level hooks
const APP_HOOKS: &[&str] = &[
    "onLaunch",
    "onShow",
    "onHide",
    "onError",
    "onUniNViewMessage",
    "onUnhandledRejection",
    "onPageNotFound",
    "onThemeChange",
];

/// Page-level hooks
const PAGE_HOOKS: &[&str] = &[
    "onLoad",
    "onShow",
    "onReady",
    "onHide",
    "onUnload",
    "onPullDownRefresh",
    "onReachBottom",
    "onTabItemTap",
    "onShareAppMessage",
    "onPageScroll",
    "onNavigationBarButtonTap",
    "onBackPress",
    "onNavigationBarSearchInputChanged",
    "onNavigationBarSearchInputConfirmed",
    "onNavigationBarSearchInputClicked",
    "onResize",
];

/// Component lifecycle hooks
const COMPONENT_HOOKS: &[&str] = &[
    "onBeforeCreate",
    "onCreated",
    "onBeforeMount",
    "onMounted",
    "onBeforeUpdate",
    "onUpdated",
    "onBeforeDestroy",
    "onDestroyed",
];

/// Statement category, declared in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Import,
    Declaration,
    Function,
    Lifecycle,
}

impl Category {
    /// All categories in canonical order
    pub const ALL: [Category; 4] = [
        Category::Import,
        Category::Declaration,
        Category::Function,
        Category::Lifecycle,
    ];

    /// Position in the canonical order
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Category directly before this one in the canonical order
    pub fn previous(self) -> Option<Category> {
        self.rank().checked_sub(1).map(|rank| Category::ALL[rank])
    }

    /// Singular noun used when this category is the offender
    pub fn label(self) -> &'static str {
        match self {
            Category::Import => "import",
            Category::Declaration => "declaration",
            Category::Function => "function",
            Category::Lifecycle => "lifecycle call",
        }
    }

    /// Plural noun used when this category must come first
    pub fn plural(self) -> &'static str {
        match self {
            Category::Import => "imports",
            Category::Declaration => "declarations",
            Category::Function => "functions",
            Category::Lifecycle => "lifecycle calls",
        }
    }
}

/// Check whether a callee name is a recognised lifecycle hook
///
/// Names shared between tiers (`onShow`, `onHide`) are the same category.
pub fn is_lifecycle_hook(name: &str) -> bool {
    APP_HOOKS
        .iter()
        .chain(PAGE_HOOKS)
        .chain(COMPONENT_HOOKS)
        .any(|hook| *hook == name)
}

/// Classify one top-level statement
///
/// Returns `None` for shapes the ordering check does not look at.
pub fn classify(statement: &Statement) -> Option<Category> {
    match &statement.kind {
        StatementKind::Import => Some(Category::Import),
        StatementKind::FunctionDecl => Some(Category::Function),
        StatementKind::Variable { first_initializer } => match first_initializer {
            InitializerKind::FunctionLike => Some(Category::Function),
            InitializerKind::Value | InitializerKind::Absent => Some(Category::Declaration),
        },
        StatementKind::Call {
            callee: Some(name),
        } if is_lifecycle_hook(name) => Some(Category::Lifecycle),
        StatementKind::Call { .. } | StatementKind::Other => None,
    }
}

/// Statement indices per category, each list in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedGroups {
    pub imports: Vec<usize>,
    pub declarations: Vec<usize>,
    pub functions: Vec<usize>,
    pub lifecycles: Vec<usize>,
}

impl ClassifiedGroups {
    pub fn get(&self, category: Category) -> &[usize] {
        match category {
            Category::Import => &self.imports,
            Category::Declaration => &self.declarations,
            Category::Function => &self.functions,
            Category::Lifecycle => &self.lifecycles,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut Vec<usize> {
        match category {
            Category::Import => &mut self.imports,
            Category::Declaration => &mut self.declarations,
            Category::Function => &mut self.functions,
            Category::Lifecycle => &mut self.lifecycles,
        }
    }

    /// Total number of classified statements
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify a statement list into ordered groups
pub fn group(statements: &[Statement]) -> ClassifiedGroups {
    let mut groups = ClassifiedGroups::default();
    for (index, statement) in statements.iter().enumerate() {
        if let Some(category) = classify(statement) {
            groups.get_mut(category).push(index);
        }
    }
    groups
}
