use proptest::prelude::*;
use shared::domain::NodeId;
use storage::NodeStore;

#[derive(Debug, Clone)]
enum Op {
    CreateFolder { parent: usize },
    CreateFile { parent: usize },
    Move { node: usize, target: usize },
    Delete { node: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<usize>().prop_map(|parent| Op::CreateFolder { parent }),
        any::<usize>().prop_map(|parent| Op::CreateFile { parent }),
        (any::<usize>(), any::<usize>()).prop_map(|(node, target)| Op::Move { node, target }),
        any::<usize>().prop_map(|node| Op::Delete { node }),
    ]
}

fn pick(ids: &[NodeId], index: usize) -> NodeId {
    ids[index % ids.len()]
}

proptest! {
    #[test]
    fn parent_chains_always_terminate(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut store = NodeStore::default();

        for op in ops {
            let ids: Vec<NodeId> = store.iter().map(|node| node.id).collect();
            // Rejected operations are fine; only the resulting shape matters.
            match op {
                Op::CreateFolder { parent } => {
                    let _ = store.create_folder(pick(&ids, parent), "folder");
                }
                Op::CreateFile { parent } => {
                    let _ = store.create_file(pick(&ids, parent), "file.txt");
                }
                Op::Move { node, target } => {
                    let _ = store.move_nodes(&[pick(&ids, node)], pick(&ids, target));
                }
                Op::Delete { node } => {
                    let _ = store.soft_delete(&[pick(&ids, node)]);
                }
            }
        }

        let total = store.len();
        for node in store.iter() {
            let mut hops = 0;
            let mut cursor = node.parent_id;
            while let Some(parent_id) = cursor {
                hops += 1;
                prop_assert!(hops <= total, "cycle reached from node {}", node.id);
                let parent = store.get(parent_id);
                prop_assert!(parent.is_some(), "dangling parent {}", parent_id);
                let parent = parent.unwrap();
                prop_assert!(parent.is_folder(), "parent {} is not a folder", parent_id);
                cursor = parent.parent_id;
            }
            prop_assert_eq!(store.depth(node.id), Some(hops));
        }
    }
}
