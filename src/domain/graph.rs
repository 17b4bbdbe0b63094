//! Trade desire graph.
//!
//! Items are nodes, desires are weighted undirected edges. Item indices are
//! assigned in first-seen order and form a bijection onto `0..n`, which keeps
//! QUBO variable numbering reproducible across runs.

use std::collections::{BTreeMap, HashMap};

use petgraph::unionfind::UnionFind;
use serde::Serialize;

use super::error::DomainError;
use super::id::ItemId;

/// Weight given to a desire added without an explicit weight.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A deduplicated trade desire between two item indices.
///
/// Stored under the canonical ordering `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeDesire {
    pub first: usize,
    pub second: usize,
    pub weight: f64,
}

/// Incrementally built trade network.
#[derive(Debug, Clone, Default)]
pub struct TradeGraph {
    items: Vec<ItemId>,
    index: HashMap<ItemId, usize>,
    desires: BTreeMap<(usize, usize), f64>,
    finalized: bool,
}

/// A connected component split off a parent graph.
#[derive(Debug, Clone)]
pub struct Component {
    /// The component as a standalone graph with its own `0..k` indices.
    pub graph: TradeGraph,
    /// `parent_indices[local]` is the item's index in the parent graph.
    pub parent_indices: Vec<usize>,
}

impl TradeGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a unit-weight desire to trade `has` for `wants` (or vice versa).
    ///
    /// Adding the same unordered pair again increments its weight instead of
    /// creating a second edge.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDesire`] for a self-loop and
    /// [`DomainError::GraphFinalized`] if the graph is locked and either item
    /// is new. The graph is unchanged on error.
    pub fn add_trade_desire(
        &mut self,
        has: impl Into<ItemId>,
        wants: impl Into<ItemId>,
    ) -> Result<(), DomainError> {
        self.add_weighted_trade_desire(has, wants, DEFAULT_WEIGHT)
    }

    /// Record a desire with an explicit non-negative weight.
    ///
    /// # Errors
    ///
    /// Same as [`add_trade_desire`](Self::add_trade_desire), plus
    /// [`DomainError::InvalidDesire`] for negative or non-finite weights.
    pub fn add_weighted_trade_desire(
        &mut self,
        has: impl Into<ItemId>,
        wants: impl Into<ItemId>,
        weight: f64,
    ) -> Result<(), DomainError> {
        let has = has.into();
        let wants = wants.into();

        if has == wants {
            return Err(DomainError::InvalidDesire {
                has: has.to_string(),
                wants: wants.to_string(),
                reason: "an item cannot be traded for itself".to_string(),
            });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(DomainError::InvalidDesire {
                has: has.to_string(),
                wants: wants.to_string(),
                reason: format!("weight must be finite and non-negative, got {weight}"),
            });
        }
        if self.finalized {
            for item in [&has, &wants] {
                if !self.index.contains_key(item) {
                    return Err(DomainError::GraphFinalized {
                        item: item.to_string(),
                    });
                }
            }
        }

        let a = self.intern(has);
        let b = self.intern(wants);
        *self.desires.entry((a.min(b), a.max(b))).or_insert(0.0) += weight;
        Ok(())
    }

    /// Lock the item set so the index mapping can no longer grow.
    ///
    /// Desires between known items are still accepted afterwards. Calling
    /// this more than once is a no-op.
    pub fn finalize_indices(&mut self) {
        self.finalized = true;
    }

    /// Return `true` once [`finalize_indices`](Self::finalize_indices) was called.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    #[must_use]
    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn num_desires(&self) -> usize {
        self.desires.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the index assigned to an item.
    #[must_use]
    pub fn index_of(&self, item: &str) -> Option<usize> {
        self.index.get(item).copied()
    }

    /// Look up the item at an index.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&ItemId> {
        self.items.get(index)
    }

    /// Items in index order.
    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Desires in canonical `(first, second)` order.
    pub fn desires(&self) -> impl Iterator<Item = TradeDesire> + '_ {
        self.desires
            .iter()
            .map(|(&(first, second), &weight)| TradeDesire {
                first,
                second,
                weight,
            })
    }

    /// Accumulated weight between two items, if they share a desire.
    #[must_use]
    pub fn weight(&self, a: &str, b: &str) -> Option<f64> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        self.desires.get(&(a.min(b), a.max(b))).copied()
    }

    /// Sum of all desire weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.desires.values().sum()
    }

    /// Split the graph into connected components.
    ///
    /// Components are ordered by their first-seen item, and each keeps the
    /// parent's relative item order. A graph with a single component yields
    /// one component equal to itself.
    #[must_use]
    pub fn components(&self) -> Vec<Component> {
        let n = self.items.len();
        let mut sets = UnionFind::<usize>::new(n);
        for &(a, b) in self.desires.keys() {
            sets.union(a, b);
        }
        let labels = sets.into_labeling();

        let mut slot_of_label: HashMap<usize, usize> = HashMap::new();
        let mut members: Vec<Vec<usize>> = Vec::new();
        for (parent, label) in labels.iter().enumerate() {
            let slot = *slot_of_label.entry(*label).or_insert_with(|| {
                members.push(Vec::new());
                members.len() - 1
            });
            members[slot].push(parent);
        }

        let mut local_of = vec![0usize; n];
        for indices in &members {
            for (local, &parent) in indices.iter().enumerate() {
                local_of[parent] = local;
            }
        }

        let mut components: Vec<Component> = members
            .into_iter()
            .map(|parent_indices| {
                let items: Vec<ItemId> = parent_indices
                    .iter()
                    .map(|&p| self.items[p].clone())
                    .collect();
                let index = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (item.clone(), i))
                    .collect();
                Component {
                    graph: TradeGraph {
                        items,
                        index,
                        desires: BTreeMap::new(),
                        finalized: true,
                    },
                    parent_indices,
                }
            })
            .collect();

        for (&(a, b), &weight) in &self.desires {
            let slot = slot_of_label[&labels[a]];
            let (la, lb) = (local_of[a], local_of[b]);
            components[slot]
                .graph
                .desires
                .insert((la.min(lb), la.max(lb)), weight);
        }

        components
    }

    fn intern(&mut self, item: ItemId) -> usize {
        if let Some(&existing) = self.index.get(&item) {
            return existing;
        }
        let next = self.items.len();
        self.index.insert(item.clone(), next);
        self.items.push(item);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(graph: &mut TradeGraph, a: &str, b: &str, c: &str) {
        graph.add_trade_desire(a, b).unwrap();
        graph.add_trade_desire(b, c).unwrap();
        graph.add_trade_desire(c, a).unwrap();
    }

    #[test]
    fn indices_follow_first_seen_order() {
        let mut graph = TradeGraph::new();
        graph.add_trade_desire("Charlie_Guitar", "Alice_Bike").unwrap();
        graph.add_trade_desire("Bob_Laptop", "Alice_Bike").unwrap();

        assert_eq!(graph.index_of("Charlie_Guitar"), Some(0));
        assert_eq!(graph.index_of("Alice_Bike"), Some(1));
        assert_eq!(graph.index_of("Bob_Laptop"), Some(2));
        assert_eq!(graph.item(2).map(ItemId::as_str), Some("Bob_Laptop"));
    }

    #[test]
    fn repeated_pair_accumulates_weight() {
        let mut graph = TradeGraph::new();
        graph.add_trade_desire("A", "B").unwrap();
        graph.add_trade_desire("B", "A").unwrap();

        assert_eq!(graph.num_desires(), 1);
        assert_eq!(graph.weight("A", "B"), Some(2.0));
        assert_eq!(graph.total_weight(), 2.0);
    }

    #[test]
    fn self_loop_is_rejected_without_mutation() {
        let mut graph = TradeGraph::new();
        let err = graph.add_trade_desire("X", "X").unwrap_err();

        assert!(matches!(err, DomainError::InvalidDesire { ref has, .. } if has == "X"));
        assert!(graph.is_empty());
        assert_eq!(graph.num_desires(), 0);
    }

    #[test]
    fn negative_and_nan_weights_are_rejected() {
        let mut graph = TradeGraph::new();
        assert!(graph.add_weighted_trade_desire("A", "B", -1.0).is_err());
        assert!(graph.add_weighted_trade_desire("A", "B", f64::NAN).is_err());
        assert!(graph.add_weighted_trade_desire("A", "B", f64::INFINITY).is_err());
        assert!(graph.is_empty());

        graph.add_weighted_trade_desire("A", "B", 0.0).unwrap();
        assert_eq!(graph.weight("A", "B"), Some(0.0));
    }

    #[test]
    fn finalized_graph_rejects_new_items_but_accepts_known_pairs() {
        let mut graph = TradeGraph::new();
        graph.add_trade_desire("A", "B").unwrap();
        graph.add_trade_desire("B", "C").unwrap();
        graph.finalize_indices();
        graph.finalize_indices();

        let err = graph.add_trade_desire("A", "Z").unwrap_err();
        assert_eq!(
            err,
            DomainError::GraphFinalized {
                item: "Z".to_string()
            }
        );
        assert_eq!(graph.num_items(), 3);

        graph.add_trade_desire("A", "C").unwrap();
        assert_eq!(graph.num_desires(), 3);
    }

    #[test]
    fn desires_iterate_in_canonical_order() {
        let mut graph = TradeGraph::new();
        graph.add_trade_desire("C", "B").unwrap();
        graph.add_trade_desire("A", "C").unwrap();

        let pairs: Vec<(usize, usize)> = graph.desires().map(|d| (d.first, d.second)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn components_split_disjoint_triangles() {
        let mut graph = TradeGraph::new();
        triangle(&mut graph, "A", "B", "C");
        triangle(&mut graph, "D", "E", "F");
        graph.add_trade_desire("A", "B").unwrap();

        let components = graph.components();
        assert_eq!(components.len(), 2);

        let first = &components[0];
        assert_eq!(first.parent_indices, vec![0, 1, 2]);
        assert_eq!(first.graph.num_desires(), 3);
        assert_eq!(first.graph.weight("A", "B"), Some(2.0));

        let second = &components[1];
        assert_eq!(second.parent_indices, vec![3, 4, 5]);
        assert_eq!(second.graph.index_of("D"), Some(0));
        assert_eq!(second.graph.total_weight(), 3.0);
        assert!(second.graph.is_finalized());
    }

    #[test]
    fn components_of_empty_graph_is_empty() {
        assert!(TradeGraph::new().components().is_empty());
    }
}
