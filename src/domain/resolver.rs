use crate::domain::node::SourceFileId;
use std::collections::HashMap;

/// Maps internal specifiers to known node ids by probing a fixed suffix list.
///
/// Lookup order for a normalized candidate `c` and extensions `[e1, e2, ..]`:
/// `c`, `c.e1`, `c.e2`, .., `c/index.e1`, `c/index.e2`, ..
/// The first candidate present in the node index wins, so when both `a.ts`
/// and `a.js` exist the earlier extension is always chosen.
pub struct ModuleResolver<'a> {
    index: &'a HashMap<SourceFileId, usize>,
    extensions: &'a [String],
}

impl<'a> ModuleResolver<'a> {
    pub fn new(index: &'a HashMap<SourceFileId, usize>, extensions: &'a [String]) -> Self {
        Self { index, extensions }
    }

    /// Resolve `specifier` imported from `importer` to a node position.
    pub fn resolve(&self, importer: &SourceFileId, specifier: &str) -> Option<usize> {
        self.candidates(importer, specifier)
            .iter()
            .find_map(|candidate| self.index.get(candidate.as_str()).copied())
    }

    /// Ordered candidate paths tried for `specifier`. Empty when the
    /// specifier escapes the analysis root.
    pub fn candidates(&self, importer: &SourceFileId, specifier: &str) -> Vec<String> {
        let Some(base) = normalize_candidate(importer.directory(), strip_query(specifier)) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(1 + self.extensions.len() * 2);

        if !base.is_empty() {
            out.push(base.clone());
            for ext in self.extensions {
                out.push(format!("{base}.{ext}"));
            }
        }
        for ext in self.extensions {
            if base.is_empty() {
                out.push(format!("index.{ext}"));
            } else {
                out.push(format!("{base}/index.{ext}"));
            }
        }
        out
    }
}

/// Drop bundler-style `?query` and `#fragment` suffixes.
fn strip_query(specifier: &str) -> &str {
    let end = specifier.find(['?', '#']).unwrap_or(specifier.len());
    &specifier[..end]
}

/// Join `specifier` onto `importer_dir` and fold `.`/`..` segments.
///
/// A leading `/` means the analysis root. Returns `None` when a `..` segment
/// climbs above the root.
pub fn normalize_candidate(importer_dir: &str, specifier: &str) -> Option<String> {
    let mut parts: Vec<&str> = if specifier.starts_with('/') {
        Vec::new()
    } else {
        importer_dir.split('/').filter(|s| !s.is_empty()).collect()
    };

    for segment in specifier.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }

    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(ids: &[&str]) -> HashMap<SourceFileId, usize> {
        let mut sorted: Vec<&str> = ids.to_vec();
        sorted.sort();
        sorted
            .into_iter()
            .enumerate()
            .map(|(i, id)| (SourceFileId::new(id), i))
            .collect()
    }

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn resolved(index: &HashMap<SourceFileId, usize>, pos: Option<usize>) -> Option<String> {
        let pos = pos?;
        index
            .iter()
            .find(|(_, p)| **p == pos)
            .map(|(id, _)| id.to_string())
    }

    #[test]
    fn test_normalize_candidate() {
        let norm = |dir: &str, spec: &str| normalize_candidate(dir, spec);
        assert_eq!(norm("src/a", "./b").as_deref(), Some("src/a/b"));
        assert_eq!(norm("src/a", "../b/c").as_deref(), Some("src/b/c"));
        assert_eq!(norm("src", "..").as_deref(), Some(""));
        assert_eq!(norm("src/deep", "/lib/y").as_deref(), Some("lib/y"));
        assert_eq!(norm("", "./z/./w").as_deref(), Some("z/w"));
        assert_eq!(norm("src", "./dir/").as_deref(), Some("src/dir"));
    }

    #[test]
    fn test_paths_above_root_do_not_normalize() {
        assert_eq!(normalize_candidate("src", "../../x"), None);
        assert_eq!(normalize_candidate("", "../x"), None);
        assert_eq!(normalize_candidate("src/deep", "/../y"), None);
    }

    #[test]
    fn test_import_escaping_root_is_unresolved() {
        let index = index_of(&["src/a.ts", "x.ts"]);
        let extensions = exts(&["ts"]);
        let resolver = ModuleResolver::new(&index, &extensions);
        let importer = SourceFileId::new("src/a.ts");

        assert!(resolver.candidates(&importer, "../../x").is_empty());
        assert_eq!(resolver.resolve(&importer, "../../x"), None);
        let inside = resolver.resolve(&importer, "../x");
        assert_eq!(resolved(&index, inside).as_deref(), Some("x.ts"));
    }

    #[test]
    fn test_candidate_order() {
        let index = index_of(&[]);
        let extensions = exts(&["ts", "js"]);
        let resolver = ModuleResolver::new(&index, &extensions);
        assert_eq!(
            resolver.candidates(&SourceFileId::new("src/a.ts"), "./b"),
            vec![
                "src/b",
                "src/b.ts",
                "src/b.js",
                "src/b/index.ts",
                "src/b/index.js"
            ]
        );
    }

    #[test]
    fn test_extension_priority_is_deterministic() {
        let index = index_of(&["a.ts", "b.js", "b.ts"]);
        let importer = SourceFileId::new("a.ts");

        let ts_first = exts(&["ts", "js"]);
        let resolver = ModuleResolver::new(&index, &ts_first);
        for _ in 0..3 {
            let pos = resolver.resolve(&importer, "./b");
            assert_eq!(resolved(&index, pos).as_deref(), Some("b.ts"));
        }

        let js_first = exts(&["js", "ts"]);
        let resolver = ModuleResolver::new(&index, &js_first);
        let pos = resolver.resolve(&importer, "./b");
        assert_eq!(resolved(&index, pos).as_deref(), Some("b.js"));
    }

    #[test]
    fn test_exact_then_index_resolution() {
        let index = index_of(&["src/main.ts", "src/util.js", "src/lib/index.tsx"]);
        let extensions = exts(&["ts", "tsx", "js"]);
        let resolver = ModuleResolver::new(&index, &extensions);
        let importer = SourceFileId::new("src/main.ts");

        let exact = resolver.resolve(&importer, "./util.js");
        assert_eq!(resolved(&index, exact).as_deref(), Some("src/util.js"));

        let dir = resolver.resolve(&importer, "./lib");
        assert_eq!(resolved(&index, dir).as_deref(), Some("src/lib/index.tsx"));

        let rooted = resolver.resolve(&importer, "/src/util");
        assert_eq!(resolved(&index, rooted).as_deref(), Some("src/util.js"));

        let query = resolver.resolve(&importer, "./util.js?raw");
        assert_eq!(resolved(&index, query).as_deref(), Some("src/util.js"));
    }

    #[test]
    fn test_unresolved_returns_none() {
        let index = index_of(&["a.ts"]);
        let extensions = exts(&["ts"]);
        let resolver = ModuleResolver::new(&index, &extensions);
        assert_eq!(resolver.resolve(&SourceFileId::new("a.ts"), "./missing"), None);
    }

    #[test]
    fn test_root_directory_import_finds_root_index() {
        let index = index_of(&["index.ts", "src/a.ts"]);
        let extensions = exts(&["ts"]);
        let resolver = ModuleResolver::new(&index, &extensions);
        let pos = resolver.resolve(&SourceFileId::new("src/a.ts"), "..");
        assert_eq!(resolved(&index, pos).as_deref(), Some("index.ts"));
    }
}
