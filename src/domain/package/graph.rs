//! Requirement graph between packages.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Result of walking the graph from one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Walk {
    /// Reached packages in breadth-first discovery order, start excluded.
    pub packages: Vec<String>,
    /// A cycle is reachable from the start package, through the start
    /// itself or further down (`a -> b -> c -> b`).
    pub cyclic: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOrder {
    pub order: Vec<String>,
    /// Packages caught in a requirement cycle, appended to `order` alphabetically.
    pub cyclic: Vec<String>,
}

/// Directed graph: `package -> packages it requires`.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    requires: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_package<I, S>(&mut self, name: impl Into<String>, requirements: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.requires.entry(name.into()).or_default();
        entry.extend(requirements.into_iter().map(Into::into));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.requires.contains_key(name)
    }

    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.requires.keys().map(String::as_str)
    }

    fn direct_requirements(&self, name: &str) -> Vec<String> {
        self.requires
            .get(name)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn direct_dependents(&self, name: &str) -> Vec<String> {
        self.requires
            .iter()
            .filter(|(_, reqs)| reqs.contains(name))
            .map(|(pkg, _)| pkg.clone())
            .collect()
    }

    /// Packages `name` needs. Requirements that are not part of the graph
    /// are still reported; the caller decides whether missing ones matter.
    pub fn requirements(&self, name: &str, recursive: bool) -> Walk {
        self.walk(name, recursive, |g, n| g.direct_requirements(n))
    }

    /// Packages that need `name`.
    pub fn dependents(&self, name: &str, recursive: bool) -> Walk {
        self.walk(name, recursive, |g, n| g.direct_dependents(n))
    }

    fn walk<F>(&self, start: &str, recursive: bool, next: F) -> Walk
    where
        F: Fn(&Self, &str) -> Vec<String>,
    {
        let mut walk = Walk::default();
        let mut seen: HashSet<String> = HashSet::from([start.to_string()]);
        let mut queue: VecDeque<String> = VecDeque::from([start.to_string()]);

        while let Some(current) = queue.pop_front() {
            for neighbour in next(self, &current) {
                if neighbour == start {
                    walk.cyclic = true;
                    continue;
                }
                if !seen.insert(neighbour.clone()) {
                    continue;
                }
                walk.packages.push(neighbour.clone());
                if recursive {
                    queue.push_back(neighbour);
                }
            }
            if !recursive {
                break;
            }
        }
        if recursive && !walk.cyclic {
            let mut reached = walk.packages.clone();
            reached.push(start.to_string());
            walk.cyclic = self.has_cycle(&reached, &next);
        }
        walk
    }

    /// Kahn's algorithm over `nodes`; leftovers mean a cycle. `nodes` must be
    /// closed under `next`, which a recursive walk guarantees.
    fn has_cycle<F>(&self, nodes: &[String], next: &F) -> bool
    where
        F: Fn(&Self, &str) -> Vec<String>,
    {
        let edges: HashMap<&str, Vec<String>> = nodes
            .iter()
            .map(|node| (node.as_str(), next(self, node)))
            .collect();
        let mut incoming: HashMap<&str, usize> = nodes.iter().map(|n| (n.as_str(), 0)).collect();
        for targets in edges.values() {
            for target in targets {
                if let Some(count) = incoming.get_mut(target.as_str()) {
                    *count += 1;
                }
            }
        }

        let mut ready: Vec<&str> = incoming
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(node, _)| *node)
            .collect();
        let mut resolved = 0;
        while let Some(node) = ready.pop() {
            resolved += 1;
            for target in edges.get(node).into_iter().flatten() {
                if let Some(count) = incoming.get_mut(target.as_str()) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push(target.as_str());
                    }
                }
            }
        }
        resolved < incoming.len()
    }

    /// Orders `subset` so every package comes after the packages it requires.
    /// Edges leaving the subset are ignored. Ties break alphabetically.
    pub fn load_order<'a, I>(&self, subset: I) -> LoadOrder
    where
        I: IntoIterator<Item = &'a str>,
    {
        let members: BTreeSet<String> = subset.into_iter().map(str::to_string).collect();
        let mut pending: BTreeMap<String, usize> = BTreeMap::new();
        for name in &members {
            let count = self
                .direct_requirements(name)
                .iter()
                .filter(|req| members.contains(*req) && *req != name)
                .count();
            pending.insert(name.clone(), count);
        }

        let mut ready: BTreeSet<String> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(name, _)| name.clone())
            .collect();
        let mut result = LoadOrder::default();

        while let Some(name) = ready.pop_first() {
            pending.remove(&name);
            for dependent in self.direct_dependents(&name) {
                if let Some(count) = pending.get_mut(&dependent) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(dependent);
                    }
                }
            }
            result.order.push(name);
        }

        result.cyclic = pending.into_keys().collect();
        result.order.extend(result.cyclic.iter().cloned());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DependencyGraph {
        // blog -> comments -> users, blog -> users, gallery -> media
        let mut graph = DependencyGraph::new();
        graph.add_package("acme/blog", ["acme/comments", "acme/users"]);
        graph.add_package("acme/comments", ["acme/users"]);
        graph.add_package("acme/users", Vec::<String>::new());
        graph.add_package("acme/gallery", ["acme/media"]);
        graph.add_package("acme/media", Vec::<String>::new());
        graph
    }

    #[test]
    fn direct_and_recursive_requirements() {
        let graph = sample();
        let direct = graph.requirements("acme/blog", false);
        assert_eq!(direct.packages, vec!["acme/comments", "acme/users"]);

        let deep = graph.requirements("acme/comments", true);
        assert_eq!(deep.packages, vec!["acme/users"]);
        assert!(!deep.cyclic);
    }

    #[test]
    fn dependents_are_reverse_edges() {
        let graph = sample();
        let direct = graph.dependents("acme/users", false);
        assert_eq!(direct.packages, vec!["acme/blog", "acme/comments"]);
        let deep = graph.dependents("acme/media", true);
        assert_eq!(deep.packages, vec!["acme/gallery"]);
    }

    #[test]
    fn recursive_walk_reports_each_package_once() {
        let mut graph = DependencyGraph::new();
        graph.add_package("a/a", ["b/b", "c/c"]);
        graph.add_package("b/b", ["d/d"]);
        graph.add_package("c/c", ["d/d"]);
        graph.add_package("d/d", Vec::<String>::new());
        let walk = graph.requirements("a/a", true);
        assert_eq!(walk.packages, vec!["b/b", "c/c", "d/d"]);
    }

    #[test]
    fn cycles_terminate_and_are_flagged() {
        let mut graph = DependencyGraph::new();
        graph.add_package("a/a", ["b/b"]);
        graph.add_package("b/b", ["c/c"]);
        graph.add_package("c/c", ["a/a"]);
        let walk = graph.requirements("a/a", true);
        assert_eq!(walk.packages, vec!["b/b", "c/c"]);
        assert!(walk.cyclic);

        let order = graph.load_order(["a/a", "b/b", "c/c"]);
        assert_eq!(order.cyclic, vec!["a/a", "b/b", "c/c"]);
        assert_eq!(order.order, vec!["a/a", "b/b", "c/c"]);
    }

    #[test]
    fn cycles_below_the_start_are_flagged() {
        let mut graph = DependencyGraph::new();
        graph.add_package("a/a", ["b/b"]);
        graph.add_package("b/b", ["c/c"]);
        graph.add_package("c/c", ["b/b"]);
        let walk = graph.requirements("a/a", true);
        assert_eq!(walk.packages, vec!["b/b", "c/c"]);
        assert!(walk.cyclic);

        let dependents = graph.dependents("c/c", true);
        assert_eq!(dependents.packages, vec!["b/b", "a/a"]);
        assert!(dependents.cyclic);

        assert!(!sample().requirements("acme/blog", true).cyclic);
    }

    #[test]
    fn load_order_puts_requirements_first() {
        let graph = sample();
        let order = graph.load_order(graph.packages().collect::<Vec<_>>());
        assert!(order.cyclic.is_empty());
        let idx = |name: &str| order.order.iter().position(|n| n == name).unwrap();
        assert!(idx("acme/users") < idx("acme/comments"));
        assert!(idx("acme/comments") < idx("acme/blog"));
        assert!(idx("acme/media") < idx("acme/gallery"));
        assert_eq!(order.order[0], "acme/media");
    }

    #[test]
    fn load_order_ignores_requirements_outside_the_subset() {
        let graph = sample();
        let order = graph.load_order(["acme/blog", "acme/comments"]);
        assert_eq!(order.order, vec!["acme/comments", "acme/blog"]);
    }
}
