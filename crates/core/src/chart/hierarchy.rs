//! One-level parent/children grouping.

use std::collections::HashMap;

/// Attaches each child to its root, preserving the order of both lists.
///
/// Children whose parent is not among `roots` are dropped. Deeper levels
/// are not expanded.
pub fn group_children<R, C, FR, FC>(
    roots: Vec<R>,
    children: Vec<C>,
    root_code: FR,
    parent_of: FC,
) -> Vec<(R, Vec<C>)>
where
    FR: Fn(&R) -> &str,
    FC: Fn(&C) -> Option<&str>,
{
    let index: HashMap<String, usize> = roots
        .iter()
        .enumerate()
        .map(|(i, r)| (root_code(r).to_string(), i))
        .collect();

    let mut buckets: Vec<Vec<C>> = roots.iter().map(|_| Vec::new()).collect();
    for child in children {
        let slot = parent_of(&child).and_then(|p| index.get(p).copied());
        if let Some(i) = slot {
            buckets[i].push(child);
        }
    }

    roots.into_iter().zip(buckets).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Node {
        code: &'static str,
        parent: Option<&'static str>,
    }

    fn node(code: &'static str, parent: Option<&'static str>) -> Node {
        Node { code, parent }
    }

    #[test]
    fn test_groups_children_under_roots() {
        let roots = vec![node("1-0000", None), node("2-0000", None)];
        let children = vec![
            node("1-1001", Some("1-0000")),
            node("2-1001", Some("2-0000")),
            node("1-1002", Some("1-0000")),
        ];

        let grouped = group_children(roots, children, |r| r.code, |c| c.parent);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0.code, "1-0000");
        assert_eq!(
            grouped[0].1.iter().map(|c| c.code).collect::<Vec<_>>(),
            vec!["1-1001", "1-1002"]
        );
        assert_eq!(grouped[1].1.len(), 1);
    }

    #[test]
    fn test_root_without_children_gets_empty_list() {
        let grouped = group_children(vec![node("3-0000", None)], Vec::<Node>::new(), |r| r.code, |c| c.parent);
        assert_eq!(grouped, vec![(node("3-0000", None), vec![])]);
    }

    #[test]
    fn test_grandchildren_are_not_expanded() {
        let roots = vec![node("1-0000", None)];
        let children = vec![node("1-1000", Some("1-0000")), node("1-1001", Some("1-1000"))];

        let grouped = group_children(roots, children, |r| r.code, |c| c.parent);
        assert_eq!(grouped[0].1, vec![node("1-1000", Some("1-0000"))]);
    }
}
