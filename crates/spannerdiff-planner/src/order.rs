use std::collections::BTreeMap;

use spannerdiff_core::Table;

use crate::error::PlannerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Grey,
    Black,
}

struct Frame<'a> {
    name: &'a str,
    deps: Vec<&'a str>,
    next: usize,
}

/// Orders the given tables so that every table appears after the tables it
/// depends on (interleave parent, foreign-key targets) within the same set.
/// Dependencies outside the set are ignored. Visiting is lexicographic, so
/// the order is stable for a given input set.
///
/// The walk is a three-color depth-first search with an explicit stack;
/// recursion depth is bounded by memory, not the call stack, and a grey
/// re-visit is a cycle, reported with the names still in flight.
pub fn dependency_order<'a>(tables: &[&'a Table]) -> Result<Vec<&'a Table>, PlannerError> {
    let by_name: BTreeMap<&str, &Table> = tables.iter().map(|t| (t.name.as_str(), *t)).collect();
    let mut marks: BTreeMap<&str, Mark> =
        by_name.keys().map(|name| (*name, Mark::White)).collect();
    let mut ordered: Vec<&Table> = Vec::with_capacity(tables.len());

    let deps_of = |name: &str| -> Vec<&'a str> {
        by_name[name]
            .referenced_tables()
            .into_iter()
            .filter(|dep| by_name.contains_key(dep))
            .collect()
    };

    for start in by_name.keys().copied().collect::<Vec<_>>() {
        if marks[start] != Mark::White {
            continue;
        }
        marks.insert(start, Mark::Grey);
        let mut stack = vec![Frame {
            name: start,
            deps: deps_of(start),
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            if frame.next < frame.deps.len() {
                let dep = frame.deps[frame.next];
                frame.next += 1;
                match marks[dep] {
                    Mark::White => {
                        marks.insert(dep, Mark::Grey);
                        stack.push(Frame {
                            name: dep,
                            deps: deps_of(dep),
                            next: 0,
                        });
                    }
                    Mark::Grey => {
                        let names: Vec<String> = marks
                            .iter()
                            .filter(|(_, mark)| **mark == Mark::Grey)
                            .map(|(name, _)| name.to_string())
                            .collect();
                        return Err(PlannerError::CyclicDependency { names });
                    }
                    Mark::Black => {}
                }
            } else {
                let name = frame.name;
                stack.pop();
                marks.insert(name, Mark::Black);
                ordered.push(by_name[name]);
            }
        }
    }

    Ok(ordered)
}
