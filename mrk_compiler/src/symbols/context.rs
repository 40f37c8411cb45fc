//! Per-source parse context: includes, scope table and declared classes

use super::scope::{ScopeOwner, StructuralScope};
use crate::grammar::HostLanguage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Synthesized name of a constructor declared as `m .{ }`
pub const CONSTRUCTOR_NAME: &str = "cx";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseParam {
    pub index: usize,
    pub name: String,
    pub type_name: String,
    pub method_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseMethod {
    pub index: usize,
    pub name: String,
    /// Empty for constructors
    pub type_name: String,
    pub class_index: usize,
    pub scope_index: usize,
    pub params: Vec<ParseParam>,
}

impl ParseMethod {
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME && self.type_name.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseClass {
    pub index: usize,
    pub name: String,
    /// Lexically enclosing class, `None` at top level
    pub parent_index: Option<usize>,
    pub scope_index: usize,
    pub methods: Vec<ParseMethod>,
}

/// A `__cpp`/`__cs`/`__java` block whose body is kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageBlock {
    pub language: HostLanguage,
    pub scope_index: usize,
}

/// Everything the declaration parser learned about one source.
///
/// The scope table is indexed by closing order and only ever grows: a
/// reparse under the same name appends its scopes after the earlier ones,
/// so every stored `scope_index` keeps naming the scope it claimed.
/// `scope_by_open` maps opening token positions of the latest pass back to
/// table indices; older scopes hold positions into older token sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceParseContext {
    pub source_name: String,
    pub includes: Vec<String>,
    pub scopes: Vec<StructuralScope>,
    pub classes: Vec<ParseClass>,
    pub language_blocks: Vec<LanguageBlock>,
    #[serde(skip)]
    scope_by_open: BTreeMap<usize, usize>,
    #[serde(skip)]
    structurally_validated: bool,
}

impl SourceParseContext {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            ..Default::default()
        }
    }

    // ------------------------------------------------------------------
    // Scope table
    // ------------------------------------------------------------------

    /// Append one pass of scope-matcher output, renumbering it after the
    /// scopes already in the table. Position lookups see only this pass.
    pub fn append_scopes(&mut self, scopes: Vec<StructuralScope>) {
        let base = self.scopes.len();
        self.scope_by_open.clear();
        for mut scope in scopes {
            scope.index += base;
            self.scope_by_open.insert(scope.open, scope.index);
            self.scopes.push(scope);
        }
        self.structurally_validated = true;
    }

    pub fn is_structurally_validated(&self) -> bool {
        self.structurally_validated
    }

    /// Index of the scope whose `{` sits at `position`
    pub fn scope_opening_at(&self, position: usize) -> Option<usize> {
        self.scope_by_open.get(&position).copied()
    }

    pub fn scope(&self, index: usize) -> Option<&StructuralScope> {
        self.scopes.get(index)
    }

    fn claim_scope(&mut self, scope_index: usize, owner: ScopeOwner) {
        if let Some(scope) = self.scopes.get_mut(scope_index) {
            debug_assert!(!scope.owner.is_owned(), "scope claimed twice");
            scope.owner = owner;
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    pub fn add_include(&mut self, path: impl Into<String>) {
        self.includes.push(path.into());
    }

    /// Append a class and claim its body scope; returns the class index
    pub fn add_class(
        &mut self,
        name: impl Into<String>,
        parent_index: Option<usize>,
        scope_index: usize,
    ) -> usize {
        let index = self.classes.len();
        self.classes.push(ParseClass {
            index,
            name: name.into(),
            parent_index,
            scope_index,
            methods: Vec::new(),
        });
        self.claim_scope(scope_index, ScopeOwner::Class(index));
        index
    }

    /// Append a method to `class_index` and claim its body scope
    pub fn add_method(
        &mut self,
        class_index: usize,
        name: impl Into<String>,
        type_name: impl Into<String>,
        scope_index: usize,
    ) -> Option<usize> {
        let class = self.classes.get_mut(class_index)?;
        let index = class.methods.len();
        class.methods.push(ParseMethod {
            index,
            name: name.into(),
            type_name: type_name.into(),
            class_index,
            scope_index,
            params: Vec::new(),
        });
        self.claim_scope(scope_index, ScopeOwner::Method(class_index, index));
        Some(index)
    }

    pub fn add_param(
        &mut self,
        class_index: usize,
        method_index: usize,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Option<usize> {
        let method = self
            .classes
            .get_mut(class_index)?
            .methods
            .get_mut(method_index)?;
        let index = method.params.len();
        method.params.push(ParseParam {
            index,
            name: name.into(),
            type_name: type_name.into(),
            method_index,
        });
        Some(index)
    }

    pub fn add_language_block(&mut self, language: HostLanguage, scope_index: usize) {
        self.language_blocks.push(LanguageBlock {
            language,
            scope_index,
        });
    }

    pub fn class(&self, index: usize) -> Option<&ParseClass> {
        self.classes.get(index)
    }

    pub fn method(&self, class_index: usize, method_index: usize) -> Option<&ParseMethod> {
        self.classes.get(class_index)?.methods.get(method_index)
    }

    /// `Outer::Inner` style name built from the parent chain
    pub fn qualified_class_name(&self, index: usize) -> String {
        let mut parts = Vec::new();
        let mut current = self.classes.get(index);
        while let Some(class) = current {
            parts.push(class.name.as_str());
            current = class.parent_index.and_then(|p| self.classes.get(p));
        }
        parts.reverse();
        parts.join("::")
    }

    pub fn method_count(&self) -> usize {
        self.classes.iter().map(|c| c.methods.len()).sum()
    }

    // ------------------------------------------------------------------
    // Context recovery
    // ------------------------------------------------------------------

    /// Innermost class whose body contains `position`.
    ///
    /// Walks scope openings backward from `position`, skipping scopes that
    /// are unowned, owned by a method, or already closed.
    pub fn current_class(&self, position: usize) -> Option<usize> {
        self.find_owner(position, |owner| match owner {
            ScopeOwner::Class(class_index) => Some(class_index),
            _ => None,
        })
    }

    /// Innermost method whose body contains `position`
    pub fn current_method(&self, position: usize) -> Option<(usize, usize)> {
        self.find_owner(position, |owner| match owner {
            ScopeOwner::Method(class_index, method_index) => Some((class_index, method_index)),
            _ => None,
        })
    }

    fn find_owner<T>(&self, position: usize, select: impl Fn(ScopeOwner) -> Option<T>) -> Option<T> {
        self.scope_by_open
            .range(..=position)
            .rev()
            .filter_map(|(_, &scope_index)| self.scopes.get(scope_index))
            .filter(|scope| scope.is_open_at(position))
            .find_map(|scope| select(scope.owner))
    }
}
