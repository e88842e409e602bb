//! Location tree construction and traversal.
//!
//! The backend serves locations as a flat list with parent pointers; tree-style
//! views rebuild the forest from that list on every refresh. Construction is pure:
//! nodes are built fresh from the input, never mutated in place.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::types::{Location, LocationId};

/// Identifier of a tree node.
///
/// A record keeps its backend id when it is the first to claim it; records with a
/// missing or already-claimed id get a synthetic identifier so a rendered forest
/// never carries two nodes with the same key. Synthetic identifiers are unique
/// within one build, not stable across builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    Location(LocationId),
    Synthetic(Uuid),
}

impl NodeId {
    /// The backend id, when the node kept one.
    pub fn location_id(&self) -> Option<LocationId> {
        match self {
            NodeId::Location(id) => Some(*id),
            NodeId::Synthetic(_) => None,
        }
    }
}

/// A location decorated with its children, in source-sequence order.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationTreeNode {
    pub id: NodeId,
    pub location: Location,
    pub children: Vec<LocationTreeNode>,
}

impl LocationTreeNode {
    /// Total number of nodes in this subtree, itself included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(LocationTreeNode::node_count)
            .sum::<usize>()
    }
}

/// Build the forest of locations whose `parent_id` equals `parent_id`, recursing
/// into each node's children. Pass `None` to root the forest at the top level.
///
/// Every input record lands in exactly one node. Siblings keep the order they had
/// in `locations`. The input must be acyclic; cycles are the caller's concern.
pub fn build_tree(locations: &[Location], parent_id: Option<LocationId>) -> Vec<LocationTreeNode> {
    // Resolve identifiers first so duplicate and missing ids are settled before
    // any grouping happens.
    let mut seen = HashSet::new();
    let resolved: Vec<NodeId> = locations
        .iter()
        .map(|location| match location.id {
            Some(id) if seen.insert(id) => NodeId::Location(id),
            _ => NodeId::Synthetic(Uuid::new_v4()),
        })
        .collect();

    // One pass groups children by parent; sibling lists inherit source order.
    let mut by_parent: HashMap<Option<LocationId>, Vec<usize>> = HashMap::new();
    for (index, location) in locations.iter().enumerate() {
        by_parent.entry(location.parent_id).or_default().push(index);
    }

    assemble(locations, &resolved, &by_parent, parent_id)
}

fn assemble(
    locations: &[Location],
    resolved: &[NodeId],
    by_parent: &HashMap<Option<LocationId>, Vec<usize>>,
    parent_id: Option<LocationId>,
) -> Vec<LocationTreeNode> {
    let indices = match by_parent.get(&parent_id) {
        Some(indices) => indices,
        None => return Vec::new(),
    };

    indices
        .iter()
        .map(|&index| {
            let id = resolved[index];
            // Only the node that kept its backend id can be referenced as a
            // parent; a synthetic node has no addressable children.
            let children = match id {
                NodeId::Location(own_id) => assemble(locations, resolved, by_parent, Some(own_id)),
                NodeId::Synthetic(_) => Vec::new(),
            };
            LocationTreeNode {
                id,
                location: locations[index].clone(),
                children,
            }
        })
        .collect()
}

/// The chain of ancestor ids for `target_id`, ordered from the immediate parent
/// up to the top-level location. Used to decide which nodes must be expanded for
/// the target to be visible. An unknown target yields an empty chain.
pub fn find_ancestor_chain(locations: &[Location], target_id: LocationId) -> Vec<LocationId> {
    let mut by_id: HashMap<LocationId, &Location> = HashMap::new();
    for location in locations {
        if let Some(id) = location.id {
            by_id.entry(id).or_insert(location);
        }
    }

    let mut chain = Vec::new();
    let mut current = match by_id.get(&target_id) {
        Some(location) => *location,
        None => return chain,
    };

    // An acyclic chain visits each record at most once.
    for _ in 0..locations.len() {
        match current.parent_id {
            Some(parent_id) => {
                chain.push(parent_id);
                match by_id.get(&parent_id) {
                    Some(parent) => current = parent,
                    // Dangling parent reference: the chain ends here.
                    None => break,
                }
            }
            None => break,
        }
    }

    chain
}

/// Display name for the location with the given id, if it is in the list.
/// Callers substitute a placeholder when absent.
pub fn find_node_name(locations: &[Location], id: LocationId) -> Option<&str> {
    locations
        .iter()
        .find(|location| location.id == Some(id))
        .map(|location| location.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(id: i64, parent_id: Option<i64>, name: &str) -> Location {
        Location {
            id: Some(LocationId(id)),
            name: name.to_string(),
            description: None,
            parent_id: parent_id.map(LocationId),
            image_url: None,
            owner_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn count_nodes(forest: &[LocationTreeNode]) -> usize {
        forest.iter().map(LocationTreeNode::node_count).sum()
    }

    fn collect_ids(forest: &[LocationTreeNode], into: &mut Vec<NodeId>) {
        for node in forest {
            into.push(node.id);
            collect_ids(&node.children, into);
        }
    }

    #[test]
    fn every_record_lands_in_exactly_one_node() {
        let locations = vec![
            loc(1, None, "Home"),
            loc(2, Some(1), "Kitchen"),
            loc(3, Some(1), "Garage"),
            loc(4, Some(2), "Fridge"),
            loc(5, None, "Office"),
        ];

        let forest = build_tree(&locations, None);

        assert_eq!(count_nodes(&forest), locations.len());
        let mut ids = Vec::new();
        collect_ids(&forest, &mut ids);
        ids.sort_by_key(|id| format!("{id:?}"));
        ids.dedup();
        assert_eq!(ids.len(), locations.len());
    }

    #[test]
    fn children_carry_their_parents_id() {
        let locations = vec![
            loc(1, None, "Home"),
            loc(2, Some(1), "Kitchen"),
            loc(3, Some(1), "Garage"),
            loc(4, Some(2), "Fridge"),
        ];

        fn check(node: &LocationTreeNode) {
            for child in &node.children {
                assert_eq!(child.location.parent_id, node.location.id);
                check(child);
            }
        }

        for root in build_tree(&locations, None) {
            check(&root);
        }
    }

    #[test]
    fn siblings_keep_source_order() {
        let locations = vec![
            loc(1, None, "Home"),
            loc(3, Some(1), "Garage"),
            loc(2, Some(1), "Kitchen"),
        ];

        let forest = build_tree(&locations, None);

        let names: Vec<&str> = forest[0]
            .children
            .iter()
            .map(|child| child.location.name.as_str())
            .collect();
        assert_eq!(names, vec!["Garage", "Kitchen"]);
    }

    #[test]
    fn subtree_can_be_rooted_anywhere() {
        let locations = vec![
            loc(1, None, "Home"),
            loc(2, Some(1), "Kitchen"),
            loc(3, Some(2), "Fridge"),
        ];

        let subtree = build_tree(&locations, Some(LocationId(2)));

        assert_eq!(subtree.len(), 1);
        assert_eq!(subtree[0].location.name, "Fridge");
        assert!(subtree[0].children.is_empty());
    }

    #[test]
    fn three_level_chain_end_to_end() {
        let locations = vec![
            loc(1, None, "Home"),
            loc(2, Some(1), "Kitchen"),
            loc(3, Some(2), "Fridge"),
        ];

        let forest = build_tree(&locations, None);

        assert_eq!(forest.len(), 1);
        let home = &forest[0];
        assert_eq!(home.location.name, "Home");
        assert_eq!(home.children.len(), 1);
        let kitchen = &home.children[0];
        assert_eq!(kitchen.location.name, "Kitchen");
        assert_eq!(kitchen.children.len(), 1);
        let fridge = &kitchen.children[0];
        assert_eq!(fridge.location.name, "Fridge");
        assert!(fridge.children.is_empty());
    }

    #[test]
    fn ancestor_chain_runs_parent_first_up_to_the_top() {
        let locations = vec![
            loc(1, None, "A"),
            loc(2, Some(1), "B"),
            loc(3, Some(2), "C"),
        ];

        let chain = find_ancestor_chain(&locations, LocationId(3));

        assert_eq!(chain, vec![LocationId(2), LocationId(1)]);
    }

    #[test]
    fn ancestor_chain_of_an_unknown_target_is_empty() {
        let locations = vec![loc(1, None, "A")];

        assert!(find_ancestor_chain(&locations, LocationId(99)).is_empty());
    }

    #[test]
    fn duplicate_ids_resolve_to_distinct_node_ids() {
        let locations = vec![
            loc(1, None, "Home"),
            loc(1, None, "Home again"),
            loc(2, Some(1), "Kitchen"),
        ];

        let forest = build_tree(&locations, None);

        let mut ids = Vec::new();
        collect_ids(&forest, &mut ids);
        assert_eq!(ids.len(), 3);
        for (index, id) in ids.iter().enumerate() {
            for other in &ids[index + 1..] {
                assert_ne!(id, other);
            }
        }
        // The first claimant keeps the backend id and therefore the children.
        let first = forest
            .iter()
            .find(|node| node.location.name == "Home")
            .unwrap();
        assert_eq!(first.children.len(), 1);
        let second = forest
            .iter()
            .find(|node| node.location.name == "Home again")
            .unwrap();
        assert!(second.children.is_empty());
        assert!(matches!(second.id, NodeId::Synthetic(_)));
    }

    #[test]
    fn a_record_without_an_id_is_kept_under_a_synthetic_id() {
        let locations = vec![
            loc(1, None, "Home"),
            Location {
                id: None,
                name: "Mystery box".to_string(),
                description: None,
                parent_id: Some(LocationId(1)),
                image_url: None,
                owner_id: None,
                created_at: None,
                updated_at: None,
            },
        ];

        let forest = build_tree(&locations, None);

        assert_eq!(count_nodes(&forest), 2);
        let child = &forest[0].children[0];
        assert_eq!(child.location.name, "Mystery box");
        assert!(matches!(child.id, NodeId::Synthetic(_)));
    }

    #[test]
    fn rebuilding_unchanged_input_gives_the_same_shape() {
        let locations = vec![
            loc(1, None, "Home"),
            loc(2, Some(1), "Kitchen"),
            loc(3, Some(1), "Garage"),
        ];

        fn shape(forest: &[LocationTreeNode]) -> Vec<(Option<LocationId>, Vec<String>)> {
            forest
                .iter()
                .map(|node| {
                    (
                        node.id.location_id(),
                        node.children
                            .iter()
                            .map(|child| child.location.name.clone())
                            .collect(),
                    )
                })
                .collect()
        }

        let first = build_tree(&locations, None);
        let second = build_tree(&locations, None);

        assert_eq!(shape(&first), shape(&second));
    }

    #[test]
    fn node_names_resolve_by_id() {
        let locations = vec![loc(1, None, "Home"), loc(2, Some(1), "Kitchen")];

        assert_eq!(find_node_name(&locations, LocationId(2)), Some("Kitchen"));
        assert_eq!(find_node_name(&locations, LocationId(9)), None);
    }
}
