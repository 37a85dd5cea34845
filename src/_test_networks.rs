use crate::{BooleanNetwork, TruthTable, VariableId};

fn names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("X{}", i)).collect()
}

/// `X0' = !X1`, `X1' = !X0`.
///
/// Synchronously, `00` and `11` form a cycle of length two, `01` and `10` are fixed points.
pub(crate) fn mutual_negation() -> BooleanNetwork {
    BooleanNetwork::try_new(
        names(2),
        vec![
            (vec![VariableId(1)], TruthTable::negation()),
            (vec![VariableId(0)], TruthTable::negation()),
        ],
    )
    .unwrap()
}

/// `X0' = X1`, `X1' = X1`, `X2' = X0`.
///
/// Starting in `(0, 1, 0)`, the synchronous trajectory has two transient states and
/// then stays in the fixed point `(1, 1, 1)`.
pub(crate) fn delayed_fixed_point() -> BooleanNetwork {
    BooleanNetwork::try_new(
        names(3),
        vec![
            (vec![VariableId(1)], TruthTable::identity()),
            (vec![VariableId(1)], TruthTable::identity()),
            (vec![VariableId(0)], TruthTable::identity()),
        ],
    )
    .unwrap()
}

/// `X0' = !X0 & !X1`, `X1' = X0 | X1`.
///
/// Asynchronously, `00` and `10` form a cycle which the path leaves through `11` into the
/// fixed point `01`.
pub(crate) fn leaky_cycle() -> BooleanNetwork {
    let parents = vec![VariableId(0), VariableId(1)];
    BooleanNetwork::try_new(
        names(2),
        vec![
            (
                parents.clone(),
                TruthTable::from_fn(2, |x| !x[0] && !x[1]).unwrap(),
            ),
            (parents, TruthTable::from_fn(2, |x| x[0] || x[1]).unwrap()),
        ],
    )
    .unwrap()
}

/// A ring of five variables where `Xi' = X(i-1)` and `X0' = !X4`.
///
/// The synchronous update is a bijection, so every state lies on a cycle (of length two
/// or ten) and there are no transient states.
pub(crate) fn negative_ring() -> BooleanNetwork {
    let mut nodes = vec![(vec![VariableId(4)], TruthTable::negation())];
    for i in 1..5 {
        nodes.push((vec![VariableId(i - 1)], TruthTable::identity()));
    }
    BooleanNetwork::try_new(names(5), nodes).unwrap()
}
