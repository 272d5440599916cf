//! Collision-free local names for imported modules.

use rustc_hash::FxHashSet;

/// `module$` followed by the namespace segments joined with `$`.
///
/// Characters that cannot appear in an identifier become `_`.
pub fn module_name(namespace: &str) -> String {
    let mut name = String::with_capacity(namespace.len() + 7);
    name.push_str("module$");
    for ch in namespace.chars() {
        match ch {
            '.' => name.push('$'),
            c if c.is_ascii_alphanumeric() || c == '_' || c == '$' => name.push(c),
            _ => name.push('_'),
        }
    }
    name
}

/// Hands out names that clash neither with identifiers already in the file
/// nor with each other.
pub struct NameAllocator<'a> {
    taken: &'a FxHashSet<String>,
    generated: FxHashSet<String>,
}

impl<'a> NameAllocator<'a> {
    pub fn new(taken: &'a FxHashSet<String>) -> Self {
        Self {
            taken,
            generated: FxHashSet::default(),
        }
    }

    pub fn allocate(&mut self, namespace: &str) -> String {
        let base = module_name(namespace);
        let mut candidate = base.clone();
        let mut suffix = 1u32;
        while self.taken.contains(&candidate) || self.generated.contains(&candidate) {
            candidate = format!("{base}${suffix}");
            suffix += 1;
        }
        self.generated.insert(candidate.clone());
        candidate
    }
}
