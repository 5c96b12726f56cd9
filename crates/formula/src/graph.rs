// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

/// The dependency graph between formula fields of one table. Nodes are
/// formula fields, an edge `a -> b` means the formula of `a` reads `b`.
///
/// Stored fields never appear: they have no outgoing edges, so they cannot
/// take part in a cycle.
#[derive(Debug, Default)]
pub struct DependencyGraph {
	names: Vec<String>,
	edges: Vec<Vec<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	Unvisited,
	Visiting,
	Done,
}

impl DependencyGraph {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_node(&mut self, name: impl Into<String>) -> usize {
		self.names.push(name.into());
		self.edges.push(Vec::new());
		self.names.len() - 1
	}

	pub fn add_edge(&mut self, from: usize, to: usize) {
		if !self.edges[from].contains(&to) {
			self.edges[from].push(to);
		}
	}

	/// The first cycle in node-insertion order, as the field names along
	/// the cycle, or `None` when the graph is acyclic.
	///
	/// Iterative three-state depth-first search; the stack doubles as the
	/// current path, so the cycle falls out of it directly.
	pub fn find_cycle(&self) -> Option<Vec<String>> {
		let mut state = vec![State::Unvisited; self.names.len()];

		for start in 0..self.names.len() {
			if state[start] != State::Unvisited {
				continue;
			}

			let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
			state[start] = State::Visiting;

			while let Some(frame) = stack.last_mut() {
				let (node, next_child) = *frame;
				match self.edges[node].get(next_child) {
					Some(&child) => {
						frame.1 += 1;
						match state[child] {
							State::Visiting => {
								// The stack from `child` onward is the cycle
								let from = stack
									.iter()
									.position(|&(visited, _)| visited == child)
									.unwrap_or(0);
								return Some(
									stack[from..]
										.iter()
										.map(|&(visited, _)| self.names[visited].clone())
										.collect(),
								);
							}
							State::Unvisited => {
								state[child] = State::Visiting;
								stack.push((child, 0));
							}
							State::Done => {}
						}
					}
					None => {
						state[node] = State::Done;
						stack.pop();
					}
				}
			}
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_graph() {
		assert_eq!(DependencyGraph::new().find_cycle(), None);
	}

	#[test]
	fn test_acyclic_chain() {
		let mut graph = DependencyGraph::new();
		let a = graph.add_node("a");
		let b = graph.add_node("b");
		let c = graph.add_node("c");
		graph.add_edge(a, b);
		graph.add_edge(b, c);
		assert_eq!(graph.find_cycle(), None);
	}

	#[test]
	fn test_diamond_is_acyclic() {
		let mut graph = DependencyGraph::new();
		let a = graph.add_node("a");
		let b = graph.add_node("b");
		let c = graph.add_node("c");
		let d = graph.add_node("d");
		graph.add_edge(a, b);
		graph.add_edge(a, c);
		graph.add_edge(b, d);
		graph.add_edge(c, d);
		assert_eq!(graph.find_cycle(), None);
	}

	#[test]
	fn test_two_node_cycle() {
		let mut graph = DependencyGraph::new();
		let a = graph.add_node("a");
		let b = graph.add_node("b");
		graph.add_edge(a, b);
		graph.add_edge(b, a);
		assert_eq!(graph.find_cycle(), Some(vec!["a".to_string(), "b".to_string()]));
	}

	#[test]
	fn test_self_cycle() {
		let mut graph = DependencyGraph::new();
		let a = graph.add_node("a");
		graph.add_edge(a, a);
		assert_eq!(graph.find_cycle(), Some(vec!["a".to_string()]));
	}

	#[test]
	fn test_cycle_behind_a_tail() {
		// a -> b -> c -> b: the reported cycle starts at b
		let mut graph = DependencyGraph::new();
		let a = graph.add_node("a");
		let b = graph.add_node("b");
		let c = graph.add_node("c");
		graph.add_edge(a, b);
		graph.add_edge(b, c);
		graph.add_edge(c, b);
		assert_eq!(graph.find_cycle(), Some(vec!["b".to_string(), "c".to_string()]));
	}

	#[test]
	fn test_deep_chain_does_not_overflow() {
		let mut graph = DependencyGraph::new();
		let nodes: Vec<usize> = (0..10_000).map(|i| graph.add_node(format!("f{i}"))).collect();
		for pair in nodes.windows(2) {
			graph.add_edge(pair[0], pair[1]);
		}
		assert_eq!(graph.find_cycle(), None);
	}
}
