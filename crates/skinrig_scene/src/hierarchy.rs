//! Parent-pointer graph checks shared by node and bone validation.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Walks every parent chain of a `count`-element parent-pointer graph and
/// returns the first element found to lie on a cycle.
///
/// `parent_of` may return indices outside `0..count`; those are treated as
/// roots, range problems are reported elsewhere.
pub fn find_parent_cycle(count: usize, parent_of: impl Fn(usize) -> Option<usize>) -> Option<usize> {
    let mut marks = vec![Mark::Unvisited; count];
    let mut chain = Vec::new();

    for start in 0..count {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        chain.clear();
        let mut current = Some(start);
        while let Some(index) = current.filter(|&i| i < count) {
            match marks[index] {
                Mark::Done => break,
                Mark::InProgress => return Some(index),
                Mark::Unvisited => {
                    marks[index] = Mark::InProgress;
                    chain.push(index);
                    current = parent_of(index);
                }
            }
        }

        for &index in &chain {
            marks[index] = Mark::Done;
        }
    }

    None
}
